use log::info;
use scc_core::identifier::{CompositeKey, timestamp_identifier};
use scc_core::provider::ProviderResult;
use scc_core::resource::{Resource, ResourceId, State};
use serde_json::json;

use super::{
    api_failure, created_id, data_state, decode, expand_model, found, input, into_state, validate,
};
use crate::keys::{ProviderTypeInstanceKey, ProviderTypeKey};
use crate::models::ProviderTypeInstance;
use crate::provider::SccProvider;
use crate::schemas::provider_type as schema;

impl SccProvider {
    pub(crate) async fn read_provider_type_data(
        &self,
        resource: &Resource,
    ) -> ProviderResult<State> {
        let schema = schema::data_source();
        validate(&resource.id, &schema, &resource.attributes)?;
        let key = ProviderTypeKey {
            instance_id: input(resource, "instance_id")?.to_string(),
            provider_type_id: input(resource, "provider_type_id")?.to_string(),
        };

        let provider_type = self
            .client()
            .get_provider_type(&key.instance_id, &key.provider_type_id)
            .await
            .map_err(|e| api_failure(&resource.id, "get provider type", e))?;

        data_state(resource, &schema, &provider_type, key.encode())
    }

    pub(crate) async fn read_provider_types_data(
        &self,
        resource: &Resource,
    ) -> ProviderResult<State> {
        let schema = schema::collection_data_source();
        validate(&resource.id, &schema, &resource.attributes)?;
        let instance_id = input(resource, "instance_id")?;

        let provider_types = self
            .client()
            .list_provider_types(instance_id)
            .await
            .map_err(|e| api_failure(&resource.id, "list provider types", e))?;

        data_state(
            resource,
            &schema,
            &json!({ "provider_types": provider_types }),
            timestamp_identifier(),
        )
    }

    // =========================================================================
    // Provider type instances
    // =========================================================================

    pub(crate) async fn create_provider_type_instance(
        &self,
        resource: &Resource,
    ) -> ProviderResult<State> {
        let id = &resource.id;
        let instance: ProviderTypeInstance =
            expand_model(id, &schema::instance_resource(), &resource.attributes)?;
        let instance_id = input(resource, "instance_id")?;
        let provider_type_id = input(resource, "provider_type_id")?;

        let created = self
            .client()
            .create_provider_type_instance(instance_id, provider_type_id, &instance)
            .await
            .map_err(|e| api_failure(id, "create provider type instance", e))?;
        let key = ProviderTypeInstanceKey {
            instance_id: instance_id.to_string(),
            provider_type_id: provider_type_id.to_string(),
            provider_type_instance_id: created_id(id, created.id)?,
        };
        info!(
            "Created provider type instance {}",
            key.provider_type_instance_id
        );

        self.read_provider_type_instance(id, &key.encode()).await
    }

    pub(crate) async fn read_provider_type_instance(
        &self,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let key: ProviderTypeInstanceKey = decode(id, identifier)?;
        let result = self
            .client()
            .get_provider_type_instance(
                &key.instance_id,
                &key.provider_type_id,
                &key.provider_type_instance_id,
            )
            .await;
        let Some(instance) = found(id, "get provider type instance", result)? else {
            return Ok(State::not_found(id.clone()));
        };

        into_state(
            id,
            &schema::instance_resource(),
            &instance,
            identifier.to_string(),
            &[
                ("instance_id", &key.instance_id),
                ("provider_type_id", &key.provider_type_id),
            ],
        )
    }

    pub(crate) async fn update_provider_type_instance(
        &self,
        id: &ResourceId,
        identifier: &str,
        to: &Resource,
    ) -> ProviderResult<State> {
        let key: ProviderTypeInstanceKey = decode(id, identifier)?;
        let instance: ProviderTypeInstance =
            expand_model(id, &schema::instance_resource(), &to.attributes)?;

        self.client()
            .update_provider_type_instance(
                &key.instance_id,
                &key.provider_type_id,
                &key.provider_type_instance_id,
                &instance,
            )
            .await
            .map_err(|e| api_failure(id, "update provider type instance", e))?;

        self.read_provider_type_instance(id, identifier).await
    }

    pub(crate) async fn delete_provider_type_instance(
        &self,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let key: ProviderTypeInstanceKey = decode(id, identifier)?;
        self.client()
            .delete_provider_type_instance(
                &key.instance_id,
                &key.provider_type_id,
                &key.provider_type_instance_id,
            )
            .await
            .map_err(|e| api_failure(id, "delete provider type instance", e))?;
        info!(
            "Deleted provider type instance {}",
            key.provider_type_instance_id
        );
        Ok(())
    }

    pub(crate) async fn read_provider_type_instance_data(
        &self,
        resource: &Resource,
    ) -> ProviderResult<State> {
        let schema = schema::instance_data_source();
        validate(&resource.id, &schema, &resource.attributes)?;
        let key = ProviderTypeInstanceKey {
            instance_id: input(resource, "instance_id")?.to_string(),
            provider_type_id: input(resource, "provider_type_id")?.to_string(),
            provider_type_instance_id: input(resource, "provider_type_instance_id")?.to_string(),
        };

        let instance = self
            .client()
            .get_provider_type_instance(
                &key.instance_id,
                &key.provider_type_id,
                &key.provider_type_instance_id,
            )
            .await
            .map_err(|e| api_failure(&resource.id, "get provider type instance", e))?;

        data_state(resource, &schema, &instance, key.encode())
    }
}
