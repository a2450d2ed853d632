//! Attribute schemas of every resource and data source
//!
//! One module per API area. Resources expose `resource()`; data sources
//! are derived from them where the shapes match.

pub mod common;
pub mod control_library;
pub mod profile;
pub mod provider_type;
pub mod report;
pub mod rule;
pub mod scope;
pub mod settings;
