//! SCC Core
//!
//! Framework-neutral building blocks for the Security and Compliance Center
//! provider: attribute values, schemas, model↔map conversion and composite
//! identifiers.

pub mod convert;
pub mod identifier;
pub mod provider;
pub mod resource;
pub mod schema;
