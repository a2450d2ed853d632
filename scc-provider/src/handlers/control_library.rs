use log::info;
use scc_core::identifier::{CompositeKey, timestamp_identifier};
use scc_core::provider::ProviderResult;
use scc_core::resource::{Resource, ResourceId, State};
use serde_json::json;

use super::{
    api_failure, created_id, data_state, decode, expand_model, found, input, into_state, validate,
};
use crate::keys::ControlLibraryKey;
use crate::models::ControlLibrary;
use crate::provider::SccProvider;
use crate::schemas::control_library as schema;

impl SccProvider {
    pub(crate) async fn create_control_library(
        &self,
        resource: &Resource,
    ) -> ProviderResult<State> {
        let id = &resource.id;
        let library: ControlLibrary = expand_model(id, &schema::resource(), &resource.attributes)?;
        let instance_id = input(resource, "instance_id")?;

        let created = self
            .client()
            .create_control_library(instance_id, &library)
            .await
            .map_err(|e| api_failure(id, "create control library", e))?;
        let key = ControlLibraryKey {
            instance_id: instance_id.to_string(),
            control_library_id: created_id(id, created.id)?,
        };
        info!("Created control library {}", key.control_library_id);

        self.read_control_library(id, &key.encode()).await
    }

    pub(crate) async fn read_control_library(
        &self,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let key: ControlLibraryKey = decode(id, identifier)?;
        let result = self
            .client()
            .get_control_library(&key.instance_id, &key.control_library_id)
            .await;
        let Some(library) = found(id, "get control library", result)? else {
            return Ok(State::not_found(id.clone()));
        };

        into_state(
            id,
            &schema::resource(),
            &library,
            identifier.to_string(),
            &[("instance_id", &key.instance_id)],
        )
    }

    pub(crate) async fn update_control_library(
        &self,
        id: &ResourceId,
        identifier: &str,
        to: &Resource,
    ) -> ProviderResult<State> {
        let key: ControlLibraryKey = decode(id, identifier)?;
        let library: ControlLibrary = expand_model(id, &schema::resource(), &to.attributes)?;

        self.client()
            .replace_control_library(&key.instance_id, &key.control_library_id, &library)
            .await
            .map_err(|e| api_failure(id, "replace control library", e))?;

        self.read_control_library(id, identifier).await
    }

    pub(crate) async fn delete_control_library(
        &self,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let key: ControlLibraryKey = decode(id, identifier)?;
        self.client()
            .delete_control_library(&key.instance_id, &key.control_library_id)
            .await
            .map_err(|e| api_failure(id, "delete control library", e))?;
        info!("Deleted control library {}", key.control_library_id);
        Ok(())
    }

    pub(crate) async fn read_control_library_data(
        &self,
        resource: &Resource,
    ) -> ProviderResult<State> {
        let schema = schema::data_source();
        validate(&resource.id, &schema, &resource.attributes)?;
        let key = ControlLibraryKey {
            instance_id: input(resource, "instance_id")?.to_string(),
            control_library_id: input(resource, "control_library_id")?.to_string(),
        };

        let library = self
            .client()
            .get_control_library(&key.instance_id, &key.control_library_id)
            .await
            .map_err(|e| api_failure(&resource.id, "get control library", e))?;

        data_state(resource, &schema, &library, key.encode())
    }

    pub(crate) async fn read_control_libraries_data(
        &self,
        resource: &Resource,
    ) -> ProviderResult<State> {
        let schema = schema::collection_data_source();
        validate(&resource.id, &schema, &resource.attributes)?;
        let instance_id = input(resource, "instance_id")?;

        let libraries = self
            .client()
            .list_control_libraries(instance_id, resource.get_string("control_library_type"))
            .await
            .map_err(|e| api_failure(&resource.id, "list control libraries", e))?;

        data_state(
            resource,
            &schema,
            &json!({ "control_libraries": libraries }),
            timestamp_identifier(),
        )
    }
}
