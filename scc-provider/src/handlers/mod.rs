//! Resource and data source handlers
//!
//! Each file adds an `impl SccProvider` block for one family of types.
//! The helpers here turn API, conversion and identifier failures into
//! [`ProviderError`]s that name the resource they happened on.

use std::collections::HashMap;

use log::warn;
use scc_core::convert::{self, ConvertError};
use scc_core::identifier::CompositeKey;
use scc_core::provider::{ProviderError, ProviderResult};
use scc_core::resource::{Resource, ResourceId, State, Value};
use scc_core::schema::ResourceSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult};

mod attachment;
mod control_library;
mod profile;
mod provider_type;
mod report;
mod rule;
mod scope;
mod settings;

pub(crate) fn unknown_type(id: &ResourceId) -> ProviderError {
    ProviderError::new(format!("Unknown resource type: {}", id.resource_type))
        .for_resource(id.clone())
}

pub(crate) fn api_failure(id: &ResourceId, action: &str, err: ApiError) -> ProviderError {
    ProviderError::new(format!("Failed to {}: {}", action, err))
        .for_resource(id.clone())
        .with_cause(err)
}

fn convert_failure(id: &ResourceId, err: ConvertError) -> ProviderError {
    ProviderError::new(err.to_string())
        .for_resource(id.clone())
        .with_cause(err)
}

/// Decode a stored identifier; a malformed one is fatal
pub(crate) fn decode<K: CompositeKey>(id: &ResourceId, identifier: &str) -> ProviderResult<K> {
    K::decode(identifier).map_err(|e| {
        ProviderError::new(format!("Invalid identifier: {}", e))
            .for_resource(id.clone())
            .with_cause(e)
    })
}

pub(crate) fn validate(
    id: &ResourceId,
    schema: &ResourceSchema,
    attributes: &HashMap<String, Value>,
) -> ProviderResult<()> {
    schema.validate(attributes).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        ProviderError::new(format!("Invalid configuration: {}", messages.join("; ")))
            .for_resource(id.clone())
    })
}

/// Validate a configuration and build the request model from it
pub(crate) fn expand_model<T: DeserializeOwned>(
    id: &ResourceId,
    schema: &ResourceSchema,
    attributes: &HashMap<String, Value>,
) -> ProviderResult<T> {
    validate(id, schema, attributes)?;
    convert::from_attributes(&schema.attributes, attributes).map_err(|e| convert_failure(id, e))
}

/// Flatten a remote model into an existing state.
///
/// Path parameters never come back from the service, so they are
/// restored from the decoded identifier.
pub(crate) fn into_state<T: Serialize>(
    id: &ResourceId,
    schema: &ResourceSchema,
    model: &T,
    identifier: String,
    path: &[(&str, &str)],
) -> ProviderResult<State> {
    let mut attributes =
        convert::to_attributes(&schema.attributes, model).map_err(|e| convert_failure(id, e))?;
    for (name, value) in path {
        attributes.insert(name.to_string(), Value::from(*value));
    }
    Ok(State::existing(id.clone(), attributes).with_identifier(identifier))
}

/// A required string argument of a data source
pub(crate) fn input<'a>(resource: &'a Resource, name: &str) -> ProviderResult<&'a str> {
    resource.get_string(name).ok_or_else(|| {
        ProviderError::new(format!("Required attribute '{}' is missing", name))
            .for_resource(resource.id.clone())
    })
}

/// State of a data source: its arguments plus everything the service returned
pub(crate) fn data_state<T: Serialize>(
    resource: &Resource,
    schema: &ResourceSchema,
    model: &T,
    identifier: String,
) -> ProviderResult<State> {
    let id = &resource.id;
    let read =
        convert::to_attributes(&schema.attributes, model).map_err(|e| convert_failure(id, e))?;
    let mut attributes = resource.attributes.clone();
    attributes.extend(read);
    Ok(State::existing(id.clone(), attributes).with_identifier(identifier))
}

/// Collapse a 404 on a managed resource read into `None`
pub(crate) fn found<T>(
    id: &ResourceId,
    action: &str,
    result: ApiResult<T>,
) -> ProviderResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => {
            warn!(
                "{}.{} no longer exists remotely: {}",
                id.resource_type, id.name, err
            );
            Ok(None)
        }
        Err(err) => Err(api_failure(id, action, err)),
    }
}

/// Server-assigned id of a freshly created object
pub(crate) fn created_id(id: &ResourceId, remote: Option<String>) -> ProviderResult<String> {
    remote.filter(|s| !s.is_empty()).ok_or_else(|| {
        ProviderError::new("Create response did not include an id").for_resource(id.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::scope;
    use scc_core::identifier::IdentifierError;

    scc_core::composite_key!(PairKey { first, second });

    #[test]
    fn decode_failure_names_resource() {
        let id = ResourceId::new("scc_scope", "main");
        let err = decode::<PairKey>(&id, "no-separator").unwrap_err();
        assert_eq!(
            err.to_string(),
            "[scc_scope.main] Invalid identifier: Identifier 'no-separator' has no '/' separator"
        );
        let cause = err.cause.unwrap();
        assert_eq!(
            cause.downcast_ref::<IdentifierError>(),
            Some(&IdentifierError::MissingSeparator("no-separator".to_string()))
        );
    }

    #[test]
    fn validation_errors_are_joined() {
        let id = ResourceId::new("scc_scope", "main");
        let attrs: HashMap<String, Value> =
            [("attachment_count".to_string(), Value::Int(1))].into();
        let err = validate(&id, &scope::resource(), &attrs).unwrap_err();
        assert!(err.message.starts_with("Invalid configuration: "));
        assert!(err.message.contains("Required attribute 'name' is missing"));
        assert!(err.message.contains("'attachment_count' is computed"));
        assert!(err.message.contains("; "));
    }

    #[test]
    fn not_found_reads_become_none() {
        let id = ResourceId::new("scc_scope", "main");
        let gone: ApiResult<()> = Err(ApiError::NotFound("gone".to_string()));
        assert!(found(&id, "get scope", gone).unwrap().is_none());

        let denied: ApiResult<()> = Err(ApiError::Forbidden("no".to_string()));
        let err = found(&id, "get scope", denied).unwrap_err();
        assert_eq!(err.message, "Failed to get scope: Access denied: no");
    }

    #[test]
    fn created_id_must_be_present() {
        let id = ResourceId::new("scc_rule", "r");
        assert_eq!(created_id(&id, Some("rule-1".to_string())).unwrap(), "rule-1");
        assert!(created_id(&id, Some(String::new())).is_err());
        assert!(created_id(&id, None).is_err());
    }

    #[test]
    fn data_state_keeps_arguments() {
        let resource = Resource::new("scc_scope", "main")
            .with_attribute("instance_id", "inst")
            .with_attribute("scope_id", "s1")
            .with_read_only(true);
        let model = crate::models::Scope {
            id: Some("s1".to_string()),
            name: Some("prod".to_string()),
            ..Default::default()
        };
        let state = data_state(&resource, &scope::data_source(), &model, "inst/s1".to_string())
            .unwrap();
        assert_eq!(state.attributes["instance_id"], Value::from("inst"));
        assert_eq!(state.attributes["scope_id"], Value::from("s1"));
        assert_eq!(state.attributes["name"], Value::from("prod"));
        assert_eq!(state.identifier.as_deref(), Some("inst/s1"));
    }
}
