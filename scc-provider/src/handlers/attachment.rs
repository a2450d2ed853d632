use log::info;
use scc_core::identifier::CompositeKey;
use scc_core::provider::ProviderResult;
use scc_core::resource::{Resource, ResourceId, State};

use super::{
    api_failure, created_id, data_state, decode, expand_model, found, input, into_state, validate,
};
use crate::keys::AttachmentKey;
use crate::models::ProfileAttachment;
use crate::provider::SccProvider;
use crate::schemas::profile as schema;

impl SccProvider {
    pub(crate) async fn create_attachment(&self, resource: &Resource) -> ProviderResult<State> {
        let id = &resource.id;
        let attachment: ProfileAttachment =
            expand_model(id, &schema::attachment_resource(), &resource.attributes)?;
        let instance_id = input(resource, "instance_id")?;
        let profile_id = input(resource, "profile_id")?;

        let created = self
            .client()
            .create_profile_attachment(instance_id, profile_id, &attachment)
            .await
            .map_err(|e| api_failure(id, "create profile attachment", e))?;
        let key = AttachmentKey {
            instance_id: instance_id.to_string(),
            profile_id: profile_id.to_string(),
            attachment_id: created_id(id, created.id)?,
        };
        info!(
            "Attached profile {} as {}",
            key.profile_id, key.attachment_id
        );

        self.read_attachment(id, &key.encode()).await
    }

    pub(crate) async fn read_attachment(
        &self,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<State> {
        let key: AttachmentKey = decode(id, identifier)?;
        let result = self
            .client()
            .get_profile_attachment(&key.instance_id, &key.profile_id, &key.attachment_id)
            .await;
        let Some(attachment) = found(id, "get profile attachment", result)? else {
            return Ok(State::not_found(id.clone()));
        };

        into_state(
            id,
            &schema::attachment_resource(),
            &attachment,
            identifier.to_string(),
            &[
                ("instance_id", &key.instance_id),
                ("profile_id", &key.profile_id),
            ],
        )
    }

    pub(crate) async fn update_attachment(
        &self,
        id: &ResourceId,
        identifier: &str,
        to: &Resource,
    ) -> ProviderResult<State> {
        let key: AttachmentKey = decode(id, identifier)?;
        let attachment: ProfileAttachment =
            expand_model(id, &schema::attachment_resource(), &to.attributes)?;

        self.client()
            .replace_profile_attachment(
                &key.instance_id,
                &key.profile_id,
                &key.attachment_id,
                &attachment,
            )
            .await
            .map_err(|e| api_failure(id, "replace profile attachment", e))?;

        self.read_attachment(id, identifier).await
    }

    pub(crate) async fn delete_attachment(
        &self,
        id: &ResourceId,
        identifier: &str,
    ) -> ProviderResult<()> {
        let key: AttachmentKey = decode(id, identifier)?;
        self.client()
            .delete_profile_attachment(&key.instance_id, &key.profile_id, &key.attachment_id)
            .await
            .map_err(|e| api_failure(id, "delete profile attachment", e))?;
        info!("Deleted profile attachment {}", key.attachment_id);
        Ok(())
    }

    pub(crate) async fn read_attachment_data(&self, resource: &Resource) -> ProviderResult<State> {
        let schema = schema::attachment_data_source();
        validate(&resource.id, &schema, &resource.attributes)?;
        let key = AttachmentKey {
            instance_id: input(resource, "instance_id")?.to_string(),
            profile_id: input(resource, "profile_id")?.to_string(),
            attachment_id: input(resource, "profile_attachment_id")?.to_string(),
        };

        let attachment = self
            .client()
            .get_profile_attachment(&key.instance_id, &key.profile_id, &key.attachment_id)
            .await
            .map_err(|e| api_failure(&resource.id, "get profile attachment", e))?;

        data_state(resource, &schema, &attachment, key.encode())
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

    const PROFILE_ID: &str = "a0b1c2d3-e4f5-4a6b-8c7d-9e0f1a2b3c4d";

    fn map(entries: &[(&str, Value)]) -> Value {
        Value::Map(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<HashMap<_, _>>(),
        )
    }

    fn attachment_path() -> String {
        format!("/instances/inst/v3/profiles/{}/attachments/att-1", PROFILE_ID)
    }

    fn attachment_json() -> serde_json::Value {
        json!({
            "id": "att-1",
            "profile_id": PROFILE_ID,
            "account_id": "acct",
            "instance_id": "inst",
            "name": "nightly",
            "status": "enabled",
            "schedule": "daily",
            "scope": [{
                "environment": "ibm-cloud",
                "properties": [
                    {"name": "scope_id", "value": "acct"},
                    {"name": "scope_type", "value": "account"}
                ]
            }],
            "notifications": {
                "enabled": false,
                "controls": {"threshold_limit": 15, "failed_control_ids": []}
            },
            "attachment_parameters": [
                {"assessment_id": "rule-1", "parameter_name": "tls_version",
                 "parameter_value": "['1.2','1.3']", "parameter_type": "string_list",
                 "parameter_display_name": "TLS"},
                {"assessment_id": "rule-1", "parameter_name": "ssl_version",
                 "parameter_value": "1.2", "parameter_type": "string",
                 "parameter_display_name": "SSL"}
            ],
            "last_scan": {"id": "scan-1", "status": "completed", "time": "2024-03-01T10:00:00Z"},
            "next_scan_time": "2024-03-02T10:00:00Z"
        })
    }

    fn attachment_resource() -> Resource {
        let property = |name: &str, value: &str| {
            map(&[("name", Value::from(name)), ("value", Value::from(value))])
        };
        Resource::new(schema::ATTACHMENT_TYPE, "nightly")
            .with_attribute("instance_id", "inst")
            .with_attribute("profile_id", PROFILE_ID)
            .with_attribute("name", "nightly")
            .with_attribute("status", "enabled")
            .with_attribute("schedule", "daily")
            .with_attribute(
                "scope",
                Value::List(vec![map(&[
                    ("environment", Value::from("ibm-cloud")),
                    (
                        "properties",
                        Value::List(vec![
                            property("scope_id", "acct"),
                            property("scope_type", "account"),
                        ]),
                    ),
                ])]),
            )
    }

    #[tokio::test]
    async fn create_wraps_the_attachment_in_a_batch() {
        let mock = MockTransport::new();
        let collection = format!("/instances/inst/v3/profiles/{}/attachments", PROFILE_ID);
        mock.on(
            Method::POST,
            &collection,
            201,
            json!({"profile_id": PROFILE_ID, "attachments": [{"id": "att-1"}]}),
        )
        .await;
        mock.on(Method::GET, &attachment_path(), 200, attachment_json())
            .await;
        let provider = SccProvider::new(mock.client());

        let state = provider.create_attachment(&attachment_resource()).await.unwrap();

        assert_eq!(
            state.identifier,
            Some(format!("inst/{}/att-1", PROFILE_ID))
        );
        assert_eq!(state.attributes["profile_attachment_id"], Value::from("att-1"));
        assert_eq!(state.attributes["next_scan_time"], Value::from("2024-03-02T10:00:00.000Z"));

        let sent = mock.requests_to(Method::POST, &collection).await;
        let body = sent[0].body.as_ref().unwrap();
        assert_eq!(body["profile_id"], PROFILE_ID);
        assert_eq!(body["attachments"][0]["name"], "nightly");
        assert_eq!(
            body["attachments"][0]["scope"][0]["properties"][1],
            json!({"name": "scope_type", "value": "account"})
        );
    }

    #[tokio::test]
    async fn parameters_sharing_an_assessment_are_kept() {
        let mock = MockTransport::new();
        mock.on(Method::GET, &attachment_path(), 200, attachment_json())
            .await;
        let provider = SccProvider::new(mock.client());
        let id = ResourceId::new(schema::ATTACHMENT_TYPE, "nightly");

        let state = provider
            .read_attachment(&id, &format!("inst/{}/att-1", PROFILE_ID))
            .await
            .unwrap();

        let params = state.attributes["attachment_parameters"].as_list().unwrap();
        assert_eq!(params.len(), 2);
        let notifications = state.attributes["notifications"].as_map().unwrap();
        let controls = notifications["controls"].as_map().unwrap();
        assert_eq!(controls["threshold_limit"], Value::Int(15));
        assert_eq!(controls["failed_control_ids"], Value::List(vec![]));
        assert_eq!(notifications["enabled"], Value::Bool(false));
    }

    #[tokio::test]
    async fn update_puts_to_the_decoded_path() {
        let mock = MockTransport::new();
        mock.on(Method::PUT, &attachment_path(), 200, attachment_json())
            .await;
        mock.on(Method::GET, &attachment_path(), 200, attachment_json())
            .await;
        let provider = SccProvider::new(mock.client());
        let resource = attachment_resource().with_attribute("status", "disabled");

        provider
            .update_attachment(&resource.id, &format!("inst/{}/att-1", PROFILE_ID), &resource)
            .await
            .unwrap();

        let sent = mock.requests_to(Method::PUT, &attachment_path()).await;
        assert_eq!(sent[0].body.as_ref().unwrap()["status"], "disabled");
    }

    #[tokio::test]
    async fn profile_id_must_be_a_uuid() {
        let mock = MockTransport::new();
        let provider = SccProvider::new(mock.client());
        let resource = attachment_resource().with_attribute("profile_id", "not-a-uuid");

        assert!(provider.create_attachment(&resource).await.is_err());
        assert!(mock.requests().await.is_empty());
    }

    #[tokio::test]
    async fn deleted_attachment_reads_as_not_found() {
        let mock = MockTransport::new();
        mock.on(Method::DELETE, &attachment_path(), 204, serde_json::Value::Null)
            .await;
        mock.on(
            Method::GET,
            &attachment_path(),
            404,
            json!({"errors": [{"code": "not_found", "message": "Attachment not found"}]}),
        )
        .await;
        let provider = SccProvider::new(mock.client());
        let id = ResourceId::new(schema::ATTACHMENT_TYPE, "nightly");
        let identifier = format!("inst/{}/att-1", PROFILE_ID);

        provider.delete_attachment(&id, &identifier).await.unwrap();
        let state = provider.read_attachment(&id, &identifier).await.unwrap();
        assert!(!state.exists);
    }

    #[tokio::test]
    async fn attachment_data_source() {
        let mock = MockTransport::new();
        mock.on(Method::GET, &attachment_path(), 200, attachment_json())
            .await;
        let provider = SccProvider::new(mock.client());
        let resource = Resource::new(schema::ATTACHMENT_TYPE, "nightly")
            .with_attribute("instance_id", "inst")
            .with_attribute("profile_id", PROFILE_ID)
            .with_attribute("profile_attachment_id", "att-1")
            .with_read_only(true);

        let state = provider.read_attachment_data(&resource).await.unwrap();
        assert_eq!(state.attributes["schedule"], Value::from("daily"));
        assert_eq!(state.attributes["profile_attachment_id"], Value::from("att-1"));
    }
}
