use crate::client::{ApiRequest, SccClient, instance_path, segment};
use crate::error::ApiResult;
use crate::models::Rule;

fn rule_path(instance_id: &str, rule_id: &str) -> String {
    instance_path(instance_id, &format!("/rules/{}", segment(rule_id)))
}

impl SccClient {
    pub async fn create_rule(&self, instance_id: &str, rule: &Rule) -> ApiResult<Rule> {
        let request = ApiRequest::post(instance_path(instance_id, "/rules")).with_body(rule)?;
        self.send_json(request).await
    }

    /// Fetch a rule along with its entity tag
    pub async fn get_rule(
        &self,
        instance_id: &str,
        rule_id: &str,
    ) -> ApiResult<(Rule, Option<String>)> {
        let response = self
            .send(ApiRequest::get(rule_path(instance_id, rule_id)))
            .await?;
        let etag = response.header("etag").map(str::to_string);
        Ok((response.json()?, etag))
    }

    /// Replace a rule; `etag` must be the tag of the version being replaced
    pub async fn replace_rule(
        &self,
        instance_id: &str,
        rule_id: &str,
        rule: &Rule,
        etag: &str,
    ) -> ApiResult<Rule> {
        let request = ApiRequest::put(rule_path(instance_id, rule_id))
            .with_header("If-Match", etag)
            .with_body(rule)?;
        self.send_json(request).await
    }

    pub async fn delete_rule(&self, instance_id: &str, rule_id: &str) -> ApiResult<()> {
        self.send(ApiRequest::delete(rule_path(instance_id, rule_id)))
            .await?;
        Ok(())
    }
}
