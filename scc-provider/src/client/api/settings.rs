use crate::client::{ApiRequest, SccClient, instance_path};
use crate::error::ApiResult;
use crate::models::InstanceSettings;

impl SccClient {
    pub async fn get_settings(&self, instance_id: &str) -> ApiResult<InstanceSettings> {
        self.send_json(ApiRequest::get(instance_path(instance_id, "/settings")))
            .await
    }

    pub async fn update_settings(
        &self,
        instance_id: &str,
        settings: &InstanceSettings,
    ) -> ApiResult<InstanceSettings> {
        let request =
            ApiRequest::patch(instance_path(instance_id, "/settings")).with_body(settings)?;
        self.send_json(request).await
    }
}
