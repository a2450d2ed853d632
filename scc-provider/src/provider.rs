//! Security and Compliance Center provider
//!
//! Routes lifecycle calls to the handler of each resource type. The
//! handlers themselves live in `crate::handlers`.

use scc_core::provider::{ProviderError, ProviderResult};
use scc_core::resource::{Resource, ResourceId, State};

use crate::client::SccClient;
use crate::config::SccConfig;
use crate::handlers::unknown_type;
use crate::schemas::{control_library, profile, provider_type, report, rule, scope, settings};

/// Security and Compliance Center provider
pub struct SccProvider {
    client: SccClient,
}

impl SccProvider {
    pub fn new(client: SccClient) -> Self {
        Self { client }
    }

    /// Create a provider talking HTTP to the configured endpoint
    pub fn from_config(config: &SccConfig) -> ProviderResult<Self> {
        let client = SccClient::from_config(config).map_err(|e| {
            ProviderError::new(format!("Failed to configure client: {}", e)).with_cause(e)
        })?;
        Ok(Self::new(client))
    }

    pub fn client(&self) -> &SccClient {
        &self.client
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Read a managed resource by its composite identifier
    pub async fn read_resource(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> ProviderResult<State> {
        let Some(identifier) = identifier else {
            return Ok(State::not_found(id.clone()));
        };

        match id.resource_type.as_str() {
            control_library::RESOURCE_TYPE => self.read_control_library(id, identifier).await,
            profile::RESOURCE_TYPE => self.read_profile(id, identifier).await,
            profile::ATTACHMENT_TYPE => self.read_attachment(id, identifier).await,
            provider_type::INSTANCE_TYPE => {
                self.read_provider_type_instance(id, identifier).await
            }
            rule::RESOURCE_TYPE => self.read_rule(id, identifier).await,
            scope::RESOURCE_TYPE => self.read_scope(id, identifier).await,
            settings::RESOURCE_TYPE => self.read_settings(id, identifier).await,
            _ => Err(unknown_type(id)),
        }
    }

    pub async fn create_resource(&self, resource: Resource) -> ProviderResult<State> {
        match resource.id.resource_type.as_str() {
            control_library::RESOURCE_TYPE => self.create_control_library(&resource).await,
            profile::RESOURCE_TYPE => self.create_profile(&resource).await,
            profile::ATTACHMENT_TYPE => self.create_attachment(&resource).await,
            provider_type::INSTANCE_TYPE => self.create_provider_type_instance(&resource).await,
            rule::RESOURCE_TYPE => self.create_rule(&resource).await,
            scope::RESOURCE_TYPE => self.create_scope(&resource).await,
            settings::RESOURCE_TYPE => self.create_settings(&resource).await,
            _ => Err(unknown_type(&resource.id)),
        }
    }

    pub async fn update_resource(
        &self,
        id: ResourceId,
        identifier: &str,
        from: &State,
        to: Resource,
    ) -> ProviderResult<State> {
        match id.resource_type.as_str() {
            control_library::RESOURCE_TYPE => {
                self.update_control_library(&id, identifier, &to).await
            }
            profile::RESOURCE_TYPE => self.update_profile(&id, identifier, &to).await,
            profile::ATTACHMENT_TYPE => self.update_attachment(&id, identifier, &to).await,
            provider_type::INSTANCE_TYPE => {
                self.update_provider_type_instance(&id, identifier, &to)
                    .await
            }
            rule::RESOURCE_TYPE => self.update_rule(&id, identifier, &to).await,
            scope::RESOURCE_TYPE => self.update_scope(&id, identifier, from, &to).await,
            settings::RESOURCE_TYPE => self.update_settings(&id, identifier, &to).await,
            _ => Err(unknown_type(&id)),
        }
    }

    pub async fn delete_resource(&self, id: &ResourceId, identifier: &str) -> ProviderResult<()> {
        match id.resource_type.as_str() {
            control_library::RESOURCE_TYPE => self.delete_control_library(id, identifier).await,
            profile::RESOURCE_TYPE => self.delete_profile(id, identifier).await,
            profile::ATTACHMENT_TYPE => self.delete_attachment(id, identifier).await,
            provider_type::INSTANCE_TYPE => {
                self.delete_provider_type_instance(id, identifier).await
            }
            rule::RESOURCE_TYPE => self.delete_rule(id, identifier).await,
            scope::RESOURCE_TYPE => self.delete_scope(id, identifier).await,
            settings::RESOURCE_TYPE => self.delete_settings(id, identifier).await,
            _ => Err(unknown_type(id)),
        }
    }

    // =========================================================================
    // Data Sources
    // =========================================================================

    /// Read a data source; the resource's attributes are the lookup arguments
    pub async fn read_data_source(&self, resource: Resource) -> ProviderResult<State> {
        let resource = &resource;
        match resource.id.resource_type.as_str() {
            control_library::RESOURCE_TYPE => self.read_control_library_data(resource).await,
            control_library::COLLECTION_TYPE => self.read_control_libraries_data(resource).await,
            profile::RESOURCE_TYPE => self.read_profile_data(resource).await,
            profile::COLLECTION_TYPE => self.read_profiles_data(resource).await,
            profile::ATTACHMENT_TYPE => self.read_attachment_data(resource).await,
            provider_type::PROVIDER_TYPE => self.read_provider_type_data(resource).await,
            provider_type::COLLECTION_TYPE => self.read_provider_types_data(resource).await,
            provider_type::INSTANCE_TYPE => self.read_provider_type_instance_data(resource).await,
            rule::RESOURCE_TYPE => self.read_rule_data(resource).await,
            scope::RESOURCE_TYPE => self.read_scope_data(resource).await,
            scope::COLLECTION_TYPE => self.read_scope_collection_data(resource).await,
            settings::RESOURCE_TYPE => self.read_settings_data(resource).await,
            report::LATEST_TYPE => self.read_latest_reports_data(resource).await,
            report::REPORT_TYPE => self.read_report_data(resource).await,
            report::SUMMARY_TYPE => self.read_report_summary_data(resource).await,
            report::CONTROLS_TYPE => self.read_report_controls_data(resource).await,
            report::EVALUATIONS_TYPE => self.read_report_evaluations_data(resource).await,
            report::RESOURCES_TYPE => self.read_report_resources_data(resource).await,
            report::TAGS_TYPE => self.read_report_tags_data(resource).await,
            report::VIOLATION_DRIFT_TYPE => self.read_report_violation_drift_data(resource).await,
            report::RULE_TYPE => self.read_report_rule_data(resource).await,
            _ => Err(unknown_type(&resource.id)),
        }
    }
}
