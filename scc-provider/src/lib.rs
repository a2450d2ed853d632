//! IBM Security and Compliance Center provider
//!
//! Manages control libraries, profiles and their attachments, rules,
//! scopes, provider type instances and instance settings, and reads
//! scan reports.
//!
//! ## Module Structure
//!
//! - `client` - API client, HTTP transport and IAM token exchange
//! - `models` - Typed request and response bodies
//! - `schemas` - Attribute schemas of every resource and data source
//! - `resources` - Resource type registrations
//! - `keys` - Composite identifiers
//! - `provider` - SccProvider and its dispatch
//! - `handlers` - Per-type CRUD and data source reads

pub mod client;
pub mod config;
pub mod error;
mod handlers;
pub mod keys;
pub mod models;
pub mod provider;
pub mod resources;
pub mod schemas;
pub mod validation;

// Re-export main types
pub use client::SccClient;
pub use config::SccConfig;
pub use error::{ApiError, ApiResult, ConfigError};
pub use provider::SccProvider;

use scc_core::provider::{BoxFuture, Provider, ProviderResult};
use scc_core::resource::{Resource, ResourceId, State};

use resources::resource_types;

// =============================================================================
// Provider Trait Implementation
// =============================================================================

impl Provider for SccProvider {
    fn name(&self) -> &'static str {
        "scc"
    }

    fn resource_types(&self) -> Vec<Box<dyn scc_core::provider::ResourceType>> {
        resource_types()
    }

    fn read(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.map(|s| s.to_string());
        Box::pin(async move { self.read_resource(&id, identifier.as_deref()).await })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move { self.create_resource(resource).await })
    }

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        let from = from.clone();
        let to = to.clone();
        Box::pin(async move { self.update_resource(id, &identifier, &from, to).await })
    }

    fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        Box::pin(async move { self.delete_resource(&id, &identifier).await })
    }

    fn read_data_source(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move { SccProvider::read_data_source(self, resource).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockTransport;

    #[tokio::test]
    async fn trait_read_without_identifier() {
        let provider: Box<dyn Provider> =
            Box::new(SccProvider::new(MockTransport::new().client()));
        let id = ResourceId::new("scc_scope", "production");

        let state = provider.read(&id, None).await.unwrap();
        assert!(!state.exists);
        assert_eq!(provider.name(), "scc");
        assert_eq!(provider.resource_types().len(), 28);
    }
}
