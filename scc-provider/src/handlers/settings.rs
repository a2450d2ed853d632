use log::info;
use scc_core::identifier::CompositeKey;
use scc_core::provider::ProviderResult;
use scc_core::resource::{Resource, ResourceId, State};

use super::{api_failure, data_state, decode, expand_model, found, input, into_state, validate};
use crate::keys::SettingsKey;
use crate::models::InstanceSettings;
use crate::provider::SccProvider;
use crate::schemas::settings as schema;

impl SccProvider {
    /// Settings always exist; taking them under management patches them
    pub(crate) async fn create_settings(&self, resource: &Resource) -> ProviderResult<State> {
        let id = &resource.id;
        let settings: InstanceSettings =
            expand_model(id, &schema::resource(), &resource.attributes)?;
        let key = SettingsKey {
            instance_id: input(resource, "instance_id")?.to_string(),
        };

        self.client()
            .update_settings(&key.instance_id, &settings)
            .await
            .map_err(|e| api_failure(id, "update instance settings", e))?;
        info!("Managing settings of instance {}", key.instance_id);

        self.read_settings(id, &key.encode()).await
    }

    pub(crate) async fn read_settings(
        &self,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let key: SettingsKey = decode(id, identifier)?;
        let result = self.client().get_settings(&key.instance_id).await;
        let Some(settings) = found(id, "get instance settings", result)? else {
            return Ok(State::not_found(id.clone()));
        };

        into_state(
            id,
            &schema::resource(),
            &settings,
            identifier.to_string(),
            &[("instance_id", &key.instance_id)],
        )
    }

    pub(crate) async fn update_settings(
        &self,
        id: &ResourceId,
        identifier: &str,
        to: &Resource,
    ) -> ProviderResult<State> {
        let key: SettingsKey = decode(id, identifier)?;
        let settings: InstanceSettings = expand_model(id, &schema::resource(), &to.attributes)?;

        self.client()
            .update_settings(&key.instance_id, &settings)
            .await
            .map_err(|e| api_failure(id, "update instance settings", e))?;

        self.read_settings(id, identifier).await
    }

    /// There is no remote delete; the settings are only forgotten locally
    pub(crate) async fn delete_settings(
        &self,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let key: SettingsKey = decode(id, identifier)?;
        info!(
            "Settings of instance {} are no longer managed; remote values are unchanged",
            key.instance_id
        );
        Ok(())
    }

    pub(crate) async fn read_settings_data(&self, resource: &Resource) -> ProviderResult<State> {
        let schema = schema::data_source();
        validate(&resource.id, &schema, &resource.attributes)?;
        let key = SettingsKey {
            instance_id: input(resource, "instance_id")?.to_string(),
        };

        let settings = self
            .client()
            .get_settings(&key.instance_id)
            .await
            .map_err(|e| api_failure(&resource.id, "get instance settings", e))?;

        data_state(resource, &schema, &settings, key.encode())
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use scc_core::resource::Value;
    use serde_json::json;

    use super::*;
    use crate::client::mock::MockTransport;

    const SETTINGS_PATH: &str = "/instances/inst/v3/settings";

    fn settings_json() -> serde_json::Value {
        json!({
            "event_notifications": {
                "instance_crn": "crn:v1:en",
                "source_id": "crn:v1:source",
                "updated_on": "2024-03-01T10:00:00Z"
            },
            "object_storage": {
                "instance_crn": "crn:v1:cos",
                "bucket": "scc-results",
                "bucket_location": "us-south"
            }
        })
    }

    fn settings_resource() -> Resource {
        Resource::new(schema::RESOURCE_TYPE, "settings")
            .with_attribute("instance_id", "inst")
            .with_attribute(
                "object_storage",
                Value::Map(
                    [
                        ("instance_crn".to_string(), Value::from("crn:v1:cos")),
                        ("bucket".to_string(), Value::from("scc-results")),
                    ]
                    .into(),
                ),
            )
    }

    #[tokio::test]
    async fn create_patches_existing_settings() {
        let mock = MockTransport::new();
        mock.on(Method::PATCH, SETTINGS_PATH, 200, settings_json()).await;
        mock.on(Method::GET, SETTINGS_PATH, 200, settings_json()).await;
        let provider = SccProvider::new(mock.client());

        let state = provider.create_settings(&settings_resource()).await.unwrap();

        assert_eq!(state.identifier.as_deref(), Some("inst"));
        let storage = state.attributes["object_storage"].as_map().unwrap();
        assert_eq!(storage["bucket_location"], Value::from("us-south"));

        let sent = mock.requests_to(Method::PATCH, SETTINGS_PATH).await;
        assert_eq!(
            sent[0].body.as_ref().unwrap(),
            &json!({"object_storage": {"instance_crn": "crn:v1:cos", "bucket": "scc-results"}})
        );
    }

    #[tokio::test]
    async fn delete_leaves_remote_settings_alone() {
        let mock = MockTransport::new();
        let provider = SccProvider::new(mock.client());
        let id = ResourceId::new(schema::RESOURCE_TYPE, "settings");

        provider.delete_settings(&id, "inst").await.unwrap();
        assert!(mock.requests().await.is_empty());
    }

    #[tokio::test]
    async fn settings_data_source() {
        let mock = MockTransport::new();
        mock.on(Method::GET, SETTINGS_PATH, 200, settings_json()).await;
        let provider = SccProvider::new(mock.client());
        let resource = Resource::new(schema::RESOURCE_TYPE, "settings")
            .with_attribute("instance_id", "inst")
            .with_read_only(true);

        let state = provider.read_settings_data(&resource).await.unwrap();
        let notifications = state.attributes["event_notifications"].as_map().unwrap();
        assert_eq!(notifications["source_id"], Value::from("crn:v1:source"));
        assert_eq!(
            notifications["updated_on"],
            Value::from("2024-03-01T10:00:00.000Z")
        );
    }
}
