use log::{debug, info};
use scc_core::identifier::CompositeKey;
use scc_core::provider::{ProviderError, ProviderResult};
use scc_core::resource::{Resource, ResourceId, State};

use super::{
    api_failure, created_id, data_state, decode, expand_model, found, input, into_state, validate,
};
use crate::keys::RuleKey;
use crate::models::Rule;
use crate::provider::SccProvider;
use crate::schemas::rule as schema;

impl SccProvider {
    pub(crate) async fn create_rule(&self, resource: &Resource) -> ProviderResult<State> {
        let id = &resource.id;
        let rule: Rule = expand_model(id, &schema::resource(), &resource.attributes)?;
        let instance_id = input(resource, "instance_id")?;

        let created = self
            .client()
            .create_rule(instance_id, &rule)
            .await
            .map_err(|e| api_failure(id, "create rule", e))?;
        let key = RuleKey {
            instance_id: instance_id.to_string(),
            rule_id: created_id(id, created.id)?,
        };
        info!("Created rule {}", key.rule_id);

        self.read_rule(id, &key.encode()).await
    }

    pub(crate) async fn read_rule(
        &self,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let key: RuleKey = decode(id, identifier)?;
        let result = self.client().get_rule(&key.instance_id, &key.rule_id).await;
        let Some((rule, _)) = found(id, "get rule", result)? else {
            return Ok(State::not_found(id.clone()));
        };

        into_state(
            id,
            &schema::resource(),
            &rule,
            identifier.to_string(),
            &[("instance_id", &key.instance_id)],
        )
    }

    /// Rules are replaced conditionally on the entity tag of the current version
    pub(crate) async fn update_rule(
        &self,
        id: &ResourceId,
        identifier: &str,
        to: &Resource,
    ) -> ProviderResult<State> {
        let key: RuleKey = decode(id, identifier)?;
        let rule: Rule = expand_model(id, &schema::resource(), &to.attributes)?;

        let (_, etag) = self
            .client()
            .get_rule(&key.instance_id, &key.rule_id)
            .await
            .map_err(|e| api_failure(id, "get rule", e))?;
        let etag = etag.ok_or_else(|| {
            ProviderError::new(format!("Rule {} was returned without an ETag", key.rule_id))
                .for_resource(id.clone())
        })?;
        debug!("Replacing rule {} at {}", key.rule_id, etag);

        self.client()
            .replace_rule(&key.instance_id, &key.rule_id, &rule, &etag)
            .await
            .map_err(|e| api_failure(id, "replace rule", e))?;

        self.read_rule(id, identifier).await
    }

    pub(crate) async fn delete_rule(
        &self,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let key: RuleKey = decode(id, identifier)?;
        self.client()
            .delete_rule(&key.instance_id, &key.rule_id)
            .await
            .map_err(|e| api_failure(id, "delete rule", e))?;
        info!("Deleted rule {}", key.rule_id);
        Ok(())
    }

    pub(crate) async fn read_rule_data(&self, resource: &Resource) -> ProviderResult<State> {
        let schema = schema::data_source();
        validate(&resource.id, &schema, &resource.attributes)?;
        let key = RuleKey {
            instance_id: input(resource, "instance_id")?.to_string(),
            rule_id: input(resource, "rule_id")?.to_string(),
        };

        let (rule, _) = self
            .client()
            .get_rule(&key.instance_id, &key.rule_id)
            .await
            .map_err(|e| api_failure(&resource.id, "get rule", e))?;

        data_state(resource, &schema, &rule, key.encode())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use reqwest::Method;
    use scc_core::resource::Value;
    use serde_json::json;

    use super::*;
    use crate::client::mock::MockTransport;

    const RULE_PATH: &str = "/instances/inst/v3/rules/rule-1";

    fn rule_json() -> serde_json::Value {
        json!({
            "id": "rule-1",
            "account_id": "acct",
            "description": "buckets are private",
            "type": "user_defined",
            "version": "1.0.0",
            "target": {
                "service_name": "cloud-object-storage",
                "resource_kind": "bucket",
                "additional_target_attributes": [
                    {"name": "location", "operator": "string_equals", "value": "us-south"}
                ]
            },
            "required_config": {
                "description": "private buckets",
                "and": [
                    {"property": "public_access", "operator": "is_false"},
                    {"property": "firewall.allowed_ip", "operator": "ips_in_range", "value": ["10.0.0.0/8"]}
                ]
            },
            "labels": ["cos"]
        })
    }

    fn map(entries: &[(&str, Value)]) -> Value {
        Value::Map(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<HashMap<_, _>>(),
        )
    }

    fn rule_resource() -> Resource {
        let condition = |property: &str, operator: &str| {
            map(&[
                ("property", Value::from(property)),
                ("operator", Value::from(operator)),
            ])
        };
        Resource::new(schema::RESOURCE_TYPE, "private_buckets")
            .with_attribute("instance_id", "inst")
            .with_attribute("description", "buckets are private")
            .with_attribute(
                "target",
                map(&[
                    ("service_name", Value::from("cloud-object-storage")),
                    ("resource_kind", Value::from("bucket")),
                ]),
            )
            .with_attribute(
                "required_config",
                map(&[
                    ("description", Value::from("private buckets")),
                    (
                        "and",
                        Value::List(vec![condition("public_access", "is_false")]),
                    ),
                ]),
            )
    }

    #[tokio::test]
    async fn create_sends_the_condition_tree() {
        let mock = MockTransport::new();
        mock.on(Method::POST, "/instances/inst/v3/rules", 201, json!({"id": "rule-1"}))
            .await;
        mock.on(Method::GET, RULE_PATH, 200, rule_json()).await;
        let provider = SccProvider::new(mock.client());

        let state = provider.create_rule(&rule_resource()).await.unwrap();

        assert_eq!(state.identifier.as_deref(), Some("inst/rule-1"));
        assert_eq!(state.attributes["type"], Value::from("user_defined"));
        let sent = mock.requests_to(Method::POST, "/instances/inst/v3/rules").await;
        assert_eq!(
            sent[0].body.as_ref().unwrap()["required_config"],
            json!({
                "description": "private buckets",
                "and": [{"property": "public_access", "operator": "is_false"}]
            })
        );
    }

    #[tokio::test]
    async fn read_keeps_structured_values_as_text() {
        let mock = MockTransport::new();
        mock.on(Method::GET, RULE_PATH, 200, rule_json()).await;
        let provider = SccProvider::new(mock.client());
        let id = ResourceId::new(schema::RESOURCE_TYPE, "private_buckets");

        let state = provider.read_rule(&id, "inst/rule-1").await.unwrap();

        let config = state.attributes["required_config"].as_map().unwrap();
        let leaves = config["and"].as_list().unwrap();
        assert_eq!(
            leaves[1].as_map().unwrap()["value"],
            Value::from(r#"["10.0.0.0/8"]"#)
        );
        assert_eq!(state.attributes["labels"], Value::List(vec![Value::from("cos")]));
    }

    #[tokio::test]
    async fn update_sends_the_current_etag() {
        let mock = MockTransport::new();
        mock.on_with_headers(Method::GET, RULE_PATH, 200, rule_json(), &[("ETag", "W/\"abc\"")])
            .await;
        mock.on(Method::PUT, RULE_PATH, 200, rule_json()).await;
        let provider = SccProvider::new(mock.client());
        let resource = rule_resource().with_attribute("description", "all buckets are private");

        provider
            .update_rule(&resource.id, "inst/rule-1", &resource)
            .await
            .unwrap();

        let sent = mock.requests_to(Method::PUT, RULE_PATH).await;
        assert_eq!(
            sent[0].headers,
            vec![("If-Match".to_string(), "W/\"abc\"".to_string())]
        );
        assert_eq!(
            sent[0].body.as_ref().unwrap()["description"],
            "all buckets are private"
        );
    }

    #[tokio::test]
    async fn update_without_etag_fails() {
        let mock = MockTransport::new();
        mock.on(Method::GET, RULE_PATH, 200, rule_json()).await;
        let provider = SccProvider::new(mock.client());
        let resource = rule_resource();

        let err = provider
            .update_rule(&resource.id, "inst/rule-1", &resource)
            .await
            .unwrap_err();
        assert!(err.message.contains("without an ETag"));
        assert!(mock.requests_to(Method::PUT, RULE_PATH).await.is_empty());
    }

    #[tokio::test]
    async fn rule_data_source() {
        let mock = MockTransport::new();
        mock.on(Method::GET, RULE_PATH, 200, rule_json()).await;
        let provider = SccProvider::new(mock.client());
        let resource = Resource::new(schema::RESOURCE_TYPE, "private_buckets")
            .with_attribute("instance_id", "inst")
            .with_attribute("rule_id", "rule-1")
            .with_read_only(true);

        let state = provider.read_rule_data(&resource).await.unwrap();
        let target = state.attributes["target"].as_map().unwrap();
        assert_eq!(target["resource_kind"], Value::from("bucket"));
    }
}
