use crate::client::{ApiRequest, SccClient, instance_path, segment};
use crate::error::ApiResult;
use crate::models::Profile;

impl SccClient {
    pub async fn list_profiles(
        &self,
        instance_id: &str,
        profile_type: Option<&str>,
    ) -> ApiResult<Vec<Profile>> {
        let request = ApiRequest::get(instance_path(instance_id, "/profiles"))
            .with_optional_query("profile_type", profile_type);
        self.collect_pages(request, "profiles").await
    }

    pub async fn get_profile(&self, instance_id: &str, profile_id: &str) -> ApiResult<Profile> {
        let path = format!("/profiles/{}", segment(profile_id));
        self.send_json(ApiRequest::get(instance_path(instance_id, &path)))
            .await
    }

    pub async fn create_profile(&self, instance_id: &str, profile: &Profile) -> ApiResult<Profile> {
        let request = ApiRequest::post(instance_path(instance_id, "/profiles")).with_body(profile)?;
        self.send_json(request).await
    }

    pub async fn replace_profile(
        &self,
        instance_id: &str,
        profile_id: &str,
        profile: &Profile,
    ) -> ApiResult<Profile> {
        let path = format!("/profiles/{}", segment(profile_id));
        let request = ApiRequest::put(instance_path(instance_id, &path)).with_body(profile)?;
        self.send_json(request).await
    }

    pub async fn delete_profile(&self, instance_id: &str, profile_id: &str) -> ApiResult<()> {
        let path = format!("/profiles/{}", segment(profile_id));
        self.send(ApiRequest::delete(instance_path(instance_id, &path)))
            .await?;
        Ok(())
    }
}
