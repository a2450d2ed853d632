use log::{debug, info};
use scc_core::identifier::{CompositeKey, timestamp_identifier};
use scc_core::provider::{ProviderError, ProviderResult};
use scc_core::resource::{Resource, ResourceId, State};
use serde_json::json;

use super::{
    api_failure, created_id, data_state, decode, expand_model, found, input, into_state, validate,
};
use crate::keys::ScopeKey;
use crate::models::Scope;
use crate::provider::SccProvider;
use crate::schemas::scope as schema;

/// Attributes the service fixes when a scope is created
const FIXED_ATTRIBUTES: &[&str] = &["environment", "properties"];

fn replaced_attribute(from: &State, to: &Resource) -> Option<&'static str> {
    FIXED_ATTRIBUTES.iter().copied().find(|name| {
        let before = from.attributes.get(*name).filter(|v| !v.is_empty());
        let after = to.attributes.get(*name).filter(|v| !v.is_empty());
        before != after
    })
}

impl SccProvider {
    pub(crate) async fn create_scope(&self, resource: &Resource) -> ProviderResult<State> {
        let id = &resource.id;
        let scope: Scope = expand_model(id, &schema::resource(), &resource.attributes)?;
        let instance_id = input(resource, "instance_id")?;

        let created = self
            .client()
            .create_scope(instance_id, &scope)
            .await
            .map_err(|e| api_failure(id, "create scope", e))?;
        let key = ScopeKey {
            instance_id: instance_id.to_string(),
            scope_id: created_id(id, created.id)?,
        };
        info!("Created scope {}", key.scope_id);

        self.read_scope(id, &key.encode()).await
    }

    pub(crate) async fn read_scope(
        &self,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let key: ScopeKey = decode(id, identifier)?;
        let result = self.client().get_scope(&key.instance_id, &key.scope_id).await;
        let Some(scope) = found(id, "get scope", result)? else {
            return Ok(State::not_found(id.clone()));
        };

        into_state(
            id,
            &schema::resource(),
            &scope,
            identifier.to_string(),
            &[("instance_id", &key.instance_id)],
        )
    }

    /// Only the name and description can be patched. A change to the
    /// environment or properties needs the scope to be replaced.
    pub(crate) async fn update_scope(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> ProviderResult<State> {
        let key: ScopeKey = decode(id, identifier)?;
        if let Some(name) = replaced_attribute(from, to) {
            return Err(ProviderError::new(format!(
                "Cannot change {} of scope {} in place; the scope must be replaced",
                name, key.scope_id
            ))
            .for_resource(id.clone()));
        }

        let scope: Scope = expand_model(id, &schema::resource(), &to.attributes)?;
        debug!("Patching name and description of scope {}", key.scope_id);

        self.client()
            .update_scope(
                &key.instance_id,
                &key.scope_id,
                scope.name.as_deref(),
                scope.description.as_deref(),
            )
            .await
            .map_err(|e| api_failure(id, "update scope", e))?;

        self.read_scope(id, identifier).await
    }

    pub(crate) async fn delete_scope(
        &self,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let key: ScopeKey = decode(id, identifier)?;
        self.client()
            .delete_scope(&key.instance_id, &key.scope_id)
            .await
            .map_err(|e| api_failure(id, "delete scope", e))?;
        info!("Deleted scope {}", key.scope_id);
        Ok(())
    }

    pub(crate) async fn read_scope_data(&self, resource: &Resource) -> ProviderResult<State> {
        let schema = schema::data_source();
        validate(&resource.id, &schema, &resource.attributes)?;
        let key = ScopeKey {
            instance_id: input(resource, "instance_id")?.to_string(),
            scope_id: input(resource, "scope_id")?.to_string(),
        };

        let scope = self
            .client()
            .get_scope(&key.instance_id, &key.scope_id)
            .await
            .map_err(|e| api_failure(&resource.id, "get scope", e))?;

        data_state(resource, &schema, &scope, key.encode())
    }

    pub(crate) async fn read_scope_collection_data(
        &self,
        resource: &Resource,
    ) -> ProviderResult<State> {
        let schema = schema::collection_data_source();
        validate(&resource.id, &schema, &resource.attributes)?;
        let instance_id = input(resource, "instance_id")?;

        let scopes = self
            .client()
            .list_scopes(instance_id)
            .await
            .map_err(|e| api_failure(&resource.id, "list scopes", e))?;

        data_state(
            resource,
            &schema,
            &json!({ "scopes": scopes }),
            timestamp_identifier(),
        )
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use scc_core::resource::Value;
    use serde_json::json;

    use super::*;
    use crate::client::mock::MockTransport;

    const SCOPE_PATH: &str = "/instances/inst/v3/scopes/scope-1";

    fn scope_json() -> serde_json::Value {
        json!({
            "id": "scope-1",
            "name": "production",
            "description": "Production accounts",
            "environment": "ibm-cloud",
            "properties": [
                {"name": "scope_id", "value": "acct-1"},
                {"name": "scope_type", "value": "account"},
                {"name": "exclusions", "value": [
                    {"scope_id": "rg-1", "scope_type": "account.resource_group"}
                ]}
            ],
            "attachment_count": 2
        })
    }

    fn property(key: &str, value: Value) -> Value {
        Value::Map([(key.to_string(), value)].into())
    }

    fn scope_resource() -> Resource {
        Resource::new(schema::RESOURCE_TYPE, "production")
            .with_attribute("instance_id", "inst")
            .with_attribute("name", "production")
            .with_attribute("description", "Production accounts")
            .with_attribute("environment", "ibm-cloud")
            .with_attribute(
                "properties",
                Value::List(vec![
                    property("scope_id", Value::from("acct-1")),
                    property("scope_type", Value::from("account")),
                ]),
            )
    }

    #[tokio::test]
    async fn create_encodes_scope_properties() {
        let mock = MockTransport::new();
        mock.on(Method::POST, "/instances/inst/v3/scopes", 201, json!({"id": "scope-1"}))
            .await;
        mock.on(Method::GET, SCOPE_PATH, 200, scope_json()).await;
        let provider = SccProvider::new(mock.client());

        let state = provider.create_scope(&scope_resource()).await.unwrap();

        assert_eq!(state.identifier.as_deref(), Some("inst/scope-1"));
        assert_eq!(state.attributes["attachment_count"], Value::Int(2));
        let sent = mock.requests_to(Method::POST, "/instances/inst/v3/scopes").await;
        assert_eq!(
            sent[0].body.as_ref().unwrap()["properties"],
            json!([
                {"name": "scope_id", "value": "acct-1"},
                {"name": "scope_type", "value": "account"}
            ])
        );
    }

    #[tokio::test]
    async fn read_decodes_exclusions() {
        let mock = MockTransport::new();
        mock.on(Method::GET, SCOPE_PATH, 200, scope_json()).await;
        let provider = SccProvider::new(mock.client());
        let id = ResourceId::new(schema::RESOURCE_TYPE, "production");

        let state = provider.read_scope(&id, "inst/scope-1").await.unwrap();

        let properties = state.attributes["properties"].as_list().unwrap();
        let exclusions = properties[2].as_map().unwrap()["exclusions"].as_list().unwrap();
        assert_eq!(
            exclusions[0].as_map().unwrap()["scope_type"],
            Value::from("account.resource_group")
        );
    }

    #[tokio::test]
    async fn read_keeps_slashes_inside_the_scope_segment() {
        let mock = MockTransport::new();
        let provider = SccProvider::new(mock.client());
        let id = ResourceId::new(schema::RESOURCE_TYPE, "production");

        let state = provider.read_scope(&id, "inst/..%2Frules%2Fx").await.unwrap();

        assert!(!state.exists);
        let sent = mock.requests().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].path, "/instances/inst/v3/scopes/..%2Frules%2Fx");
    }

    #[tokio::test]
    async fn property_with_two_keys_is_rejected() {
        let mock = MockTransport::new();
        let provider = SccProvider::new(mock.client());
        let both = Value::Map(
            [
                ("scope_id".to_string(), Value::from("acct-1")),
                ("scope_type".to_string(), Value::from("account")),
            ]
            .into(),
        );
        let resource = scope_resource().with_attribute("properties", Value::List(vec![both]));

        assert!(provider.create_scope(&resource).await.is_err());
        assert!(mock.requests().await.is_empty());
    }

    fn current_state(resource: &Resource) -> State {
        State::existing(resource.id.clone(), resource.attributes.clone())
            .with_identifier("inst/scope-1")
    }

    #[tokio::test]
    async fn update_patches_name_and_description() {
        let mock = MockTransport::new();
        mock.on(Method::PATCH, SCOPE_PATH, 200, scope_json()).await;
        mock.on(Method::GET, SCOPE_PATH, 200, scope_json()).await;
        let provider = SccProvider::new(mock.client());
        let from = current_state(&scope_resource());
        let resource = scope_resource().with_attribute("name", "prod");

        provider
            .update_scope(&resource.id, "inst/scope-1", &from, &resource)
            .await
            .unwrap();

        let sent = mock.requests_to(Method::PATCH, SCOPE_PATH).await;
        assert_eq!(
            sent[0].body.as_ref().unwrap(),
            &json!({"name": "prod", "description": "Production accounts"})
        );
    }

    #[tokio::test]
    async fn update_of_environment_or_properties_is_rejected() {
        let mock = MockTransport::new();
        mock.on(Method::PATCH, SCOPE_PATH, 200, scope_json()).await;
        mock.on(Method::GET, SCOPE_PATH, 200, scope_json()).await;
        let provider = SccProvider::new(mock.client());
        let from = current_state(&scope_resource());

        let moved = scope_resource().with_attribute("environment", "aws");
        let err = provider
            .update_scope(&moved.id, "inst/scope-1", &from, &moved)
            .await
            .unwrap_err();
        assert!(err.message.starts_with("Cannot change environment of scope scope-1"));
        assert_eq!(err.resource_id, Some(moved.id.clone()));

        let widened = scope_resource().with_attribute(
            "properties",
            Value::List(vec![
                property("scope_id", Value::from("acct-2")),
                property("scope_type", Value::from("account")),
            ]),
        );
        let err = provider
            .update_scope(&widened.id, "inst/scope-1", &from, &widened)
            .await
            .unwrap_err();
        assert!(err.message.starts_with("Cannot change properties of scope scope-1"));

        assert!(mock.requests_to(Method::PATCH, SCOPE_PATH).await.is_empty());
    }

    #[tokio::test]
    async fn update_through_provider_trait_sees_prior_state() {
        use scc_core::provider::Provider;

        let mock = MockTransport::new();
        let provider = SccProvider::new(mock.client());
        let from = current_state(&scope_resource());
        let to = scope_resource().with_attribute("environment", "aws");

        let result = Provider::update(&provider, &to.id, "inst/scope-1", &from, &to).await;

        assert!(result.is_err());
        assert!(mock.requests().await.is_empty());
    }

    #[tokio::test]
    async fn scope_collection_follows_pages() {
        let mock = MockTransport::new();
        mock.on_query(
            Method::GET,
            "/instances/inst/v3/scopes",
            ("start", "page-2"),
            200,
            json!({"scopes": [{"id": "scope-2", "name": "staging"}]}),
        )
        .await;
        mock.on(
            Method::GET,
            "/instances/inst/v3/scopes",
            200,
            json!({"next": {"start": "page-2"}, "scopes": [scope_json()]}),
        )
        .await;
        let provider = SccProvider::new(mock.client());
        let resource = Resource::new(schema::COLLECTION_TYPE, "all")
            .with_attribute("instance_id", "inst")
            .with_read_only(true);

        let state = provider.read_scope_collection_data(&resource).await.unwrap();

        let scopes = state.attributes["scopes"].as_list().unwrap();
        assert_eq!(scopes.len(), 2);
        assert_eq!(scopes[1].as_map().unwrap()["scope_id"], Value::from("scope-2"));
    }
}
