use serde::Deserialize;

use crate::client::{ApiRequest, SccClient, instance_path, segment};
use crate::error::ApiResult;
use crate::models::{ProviderType, ProviderTypeInstance};

fn instance_of_type_path(instance_id: &str, provider_type_id: &str, id: &str) -> String {
    instance_path(
        instance_id,
        &format!(
            "/provider_types/{}/provider_type_instances/{}",
            segment(provider_type_id),
            segment(id)
        ),
    )
}

impl SccClient {
    pub async fn list_provider_types(&self, instance_id: &str) -> ApiResult<Vec<ProviderType>> {
        #[derive(Deserialize)]
        struct ProviderTypes {
            #[serde(default)]
            provider_types: Vec<ProviderType>,
        }

        let response: ProviderTypes = self
            .send_json(ApiRequest::get(instance_path(instance_id, "/provider_types")))
            .await?;
        Ok(response.provider_types)
    }

    pub async fn get_provider_type(
        &self,
        instance_id: &str,
        provider_type_id: &str,
    ) -> ApiResult<ProviderType> {
        let path = format!("/provider_types/{}", segment(provider_type_id));
        self.send_json(ApiRequest::get(instance_path(instance_id, &path)))
            .await
    }

    pub async fn create_provider_type_instance(
        &self,
        instance_id: &str,
        provider_type_id: &str,
        instance: &ProviderTypeInstance,
    ) -> ApiResult<ProviderTypeInstance> {
        let path = format!(
            "/provider_types/{}/provider_type_instances",
            segment(provider_type_id)
        );
        let request = ApiRequest::post(instance_path(instance_id, &path)).with_body(instance)?;
        self.send_json(request).await
    }

    pub async fn get_provider_type_instance(
        &self,
        instance_id: &str,
        provider_type_id: &str,
        provider_type_instance_id: &str,
    ) -> ApiResult<ProviderTypeInstance> {
        let path = instance_of_type_path(instance_id, provider_type_id, provider_type_instance_id);
        self.send_json(ApiRequest::get(path)).await
    }

    /// Partial update; only `name` and `attributes` are changeable
    pub async fn update_provider_type_instance(
        &self,
        instance_id: &str,
        provider_type_id: &str,
        provider_type_instance_id: &str,
        instance: &ProviderTypeInstance,
    ) -> ApiResult<ProviderTypeInstance> {
        let path = instance_of_type_path(instance_id, provider_type_id, provider_type_instance_id);
        let patch = ProviderTypeInstance {
            name: instance.name.clone(),
            attributes: instance.attributes.clone(),
            ..Default::default()
        };
        self.send_json(ApiRequest::patch(path).with_body(&patch)?)
            .await
    }

    pub async fn delete_provider_type_instance(
        &self,
        instance_id: &str,
        provider_type_id: &str,
        provider_type_instance_id: &str,
    ) -> ApiResult<()> {
        let path = instance_of_type_path(instance_id, provider_type_id, provider_type_instance_id);
        self.send(ApiRequest::delete(path)).await?;
        Ok(())
    }
}
