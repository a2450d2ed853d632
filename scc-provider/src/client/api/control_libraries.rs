use crate::client::{ApiRequest, SccClient, instance_path, segment};
use crate::error::ApiResult;
use crate::models::ControlLibrary;

impl SccClient {
    pub async fn list_control_libraries(
        &self,
        instance_id: &str,
        control_library_type: Option<&str>,
    ) -> ApiResult<Vec<ControlLibrary>> {
        let request = ApiRequest::get(instance_path(instance_id, "/control_libraries"))
            .with_optional_query("control_library_type", control_library_type);
        self.collect_pages(request, "control_libraries").await
    }

    pub async fn get_control_library(
        &self,
        instance_id: &str,
        control_library_id: &str,
    ) -> ApiResult<ControlLibrary> {
        let path = format!("/control_libraries/{}", segment(control_library_id));
        self.send_json(ApiRequest::get(instance_path(instance_id, &path)))
            .await
    }

    pub async fn create_control_library(
        &self,
        instance_id: &str,
        library: &ControlLibrary,
    ) -> ApiResult<ControlLibrary> {
        let request =
            ApiRequest::post(instance_path(instance_id, "/control_libraries")).with_body(library)?;
        self.send_json(request).await
    }

    pub async fn replace_control_library(
        &self,
        instance_id: &str,
        control_library_id: &str,
        library: &ControlLibrary,
    ) -> ApiResult<ControlLibrary> {
        let path = format!("/control_libraries/{}", segment(control_library_id));
        let request = ApiRequest::put(instance_path(instance_id, &path)).with_body(library)?;
        self.send_json(request).await
    }

    pub async fn delete_control_library(
        &self,
        instance_id: &str,
        control_library_id: &str,
    ) -> ApiResult<()> {
        let path = format!("/control_libraries/{}", segment(control_library_id));
        self.send(ApiRequest::delete(instance_path(instance_id, &path)))
            .await?;
        Ok(())
    }
}
