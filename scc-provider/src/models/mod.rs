//! Typed request and response models of the compliance API
//!
//! Every field is optional: `None` means the service did not send it (or
//! it should not be sent), which is distinct from a present zero value.

pub mod control_library;
pub mod profile;
pub mod provider_type;
pub mod report;
pub mod required_config;
pub mod rule;
pub mod scope;
pub mod settings;

pub use control_library::*;
pub use profile::*;
pub use provider_type::*;
pub use report::*;
pub use required_config::{RequiredConfig, required_config_codec};
pub use rule::*;
pub use scope::{Scope, ScopeExclusion, ScopeProperty, scope_property_codec};
pub use settings::*;
