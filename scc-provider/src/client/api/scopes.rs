use serde::Serialize;

use crate::client::{ApiRequest, SccClient, instance_path, segment};
use crate::error::ApiResult;
use crate::models::Scope;

fn scope_path(instance_id: &str, scope_id: &str) -> String {
    instance_path(instance_id, &format!("/scopes/{}", segment(scope_id)))
}

impl SccClient {
    pub async fn create_scope(&self, instance_id: &str, scope: &Scope) -> ApiResult<Scope> {
        let request = ApiRequest::post(instance_path(instance_id, "/scopes")).with_body(scope)?;
        self.send_json(request).await
    }

    pub async fn list_scopes(&self, instance_id: &str) -> ApiResult<Vec<Scope>> {
        self.collect_pages(ApiRequest::get(instance_path(instance_id, "/scopes")), "scopes")
            .await
    }

    pub async fn get_scope(&self, instance_id: &str, scope_id: &str) -> ApiResult<Scope> {
        self.send_json(ApiRequest::get(scope_path(instance_id, scope_id)))
            .await
    }

    /// Only the name and description of a scope can change
    pub async fn update_scope(
        &self,
        instance_id: &str,
        scope_id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> ApiResult<Scope> {
        #[derive(Serialize)]
        struct ScopePatch<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            description: Option<&'a str>,
        }

        let request = ApiRequest::patch(scope_path(instance_id, scope_id))
            .with_body(&ScopePatch { name, description })?;
        self.send_json(request).await
    }

    pub async fn delete_scope(&self, instance_id: &str, scope_id: &str) -> ApiResult<()> {
        self.send(ApiRequest::delete(scope_path(instance_id, scope_id)))
            .await?;
        Ok(())
    }
}
