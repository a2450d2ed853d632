use log::info;
use scc_core::identifier::{CompositeKey, timestamp_identifier};
use scc_core::provider::ProviderResult;
use scc_core::resource::{Resource, ResourceId, State};
use serde_json::json;

use super::{
    api_failure, created_id, data_state, decode, expand_model, found, input, into_state, validate,
};
use crate::keys::ProfileKey;
use crate::models::Profile;
use crate::provider::SccProvider;
use crate::schemas::profile as schema;

impl SccProvider {
    pub(crate) async fn create_profile(&self, resource: &Resource) -> ProviderResult<State> {
        let id = &resource.id;
        let profile: Profile = expand_model(id, &schema::resource(), &resource.attributes)?;
        let instance_id = input(resource, "instance_id")?;

        let created = self
            .client()
            .create_profile(instance_id, &profile)
            .await
            .map_err(|e| api_failure(id, "create profile", e))?;
        let key = ProfileKey {
            instance_id: instance_id.to_string(),
            profile_id: created_id(id, created.id)?,
        };
        info!("Created profile {}", key.profile_id);

        self.read_profile(id, &key.encode()).await
    }

    pub(crate) async fn read_profile(
        &self,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let key: ProfileKey = decode(id, identifier)?;
        let result = self
            .client()
            .get_profile(&key.instance_id, &key.profile_id)
            .await;
        let Some(profile) = found(id, "get profile", result)? else {
            return Ok(State::not_found(id.clone()));
        };

        into_state(
            id,
            &schema::resource(),
            &profile,
            identifier.to_string(),
            &[("instance_id", &key.instance_id)],
        )
    }

    pub(crate) async fn update_profile(
        &self,
        id: &ResourceId,
        identifier: &str,
        to: &Resource,
    ) -> ProviderResult<State> {
        let key: ProfileKey = decode(id, identifier)?;
        let profile: Profile = expand_model(id, &schema::resource(), &to.attributes)?;

        self.client()
            .replace_profile(&key.instance_id, &key.profile_id, &profile)
            .await
            .map_err(|e| api_failure(id, "replace profile", e))?;

        self.read_profile(id, identifier).await
    }

    pub(crate) async fn delete_profile(
        &self,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let key: ProfileKey = decode(id, identifier)?;
        self.client()
            .delete_profile(&key.instance_id, &key.profile_id)
            .await
            .map_err(|e| api_failure(id, "delete profile", e))?;
        info!("Deleted profile {}", key.profile_id);
        Ok(())
    }

    pub(crate) async fn read_profile_data(&self, resource: &Resource) -> ProviderResult<State> {
        let schema = schema::data_source();
        validate(&resource.id, &schema, &resource.attributes)?;
        let key = ProfileKey {
            instance_id: input(resource, "instance_id")?.to_string(),
            profile_id: input(resource, "profile_id")?.to_string(),
        };

        let profile = self
            .client()
            .get_profile(&key.instance_id, &key.profile_id)
            .await
            .map_err(|e| api_failure(&resource.id, "get profile", e))?;

        data_state(resource, &schema, &profile, key.encode())
    }

    pub(crate) async fn read_profiles_data(&self, resource: &Resource) -> ProviderResult<State> {
        let schema = schema::collection_data_source();
        validate(&resource.id, &schema, &resource.attributes)?;
        let instance_id = input(resource, "instance_id")?;

        let profiles = self
            .client()
            .list_profiles(instance_id, resource.get_string("profile_type"))
            .await
            .map_err(|e| api_failure(&resource.id, "list profiles", e))?;

        data_state(
            resource,
            &schema,
            &json!({ "profiles": profiles }),
            timestamp_identifier(),
        )
    }
}
