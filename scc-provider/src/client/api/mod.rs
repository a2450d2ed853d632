//! Remote operations, grouped by resource family
//!
//! Each file adds an `impl SccClient` block. Paths are relative to the
//! service URL and scoped to one service instance.

mod attachments;
mod control_libraries;
mod profiles;
mod provider_types;
mod reports;
mod rules;
mod scopes;
mod settings;

pub use reports::ReportFilter;
