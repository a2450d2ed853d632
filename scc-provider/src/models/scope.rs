//! Scope models

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use scc_core::convert::ConvertError;
use scc_core::resource::Value;
use scc_core::schema::UnionCodec;
use serde::{Deserialize, Serialize};

const UNION_NAME: &str = "ScopeProperty";

/// A named grouping of cloud resources that attachments evaluate against
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<ScopeProperty>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_count: Option<i64>,
}

/// One selector of a scope, discriminated by `name` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScopeProperty", into = "RawScopeProperty")]
pub enum ScopeProperty {
    ScopeId(String),
    ScopeType(String),
    Exclusions(Vec<ScopeExclusion>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeExclusion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawScopeProperty {
    name: String,
    value: serde_json::Value,
}

impl TryFrom<RawScopeProperty> for ScopeProperty {
    type Error = ConvertError;

    fn try_from(raw: RawScopeProperty) -> Result<Self, Self::Error> {
        let text = |value: serde_json::Value| match value {
            serde_json::Value::String(s) => Ok(s),
            other => Err(ConvertError::unrecognized(
                UNION_NAME,
                format!("'{}' value must be a string, got {}", raw.name, other),
            )),
        };
        match raw.name.as_str() {
            "scope_id" => text(raw.value.clone()).map(ScopeProperty::ScopeId),
            "scope_type" => text(raw.value.clone()).map(ScopeProperty::ScopeType),
            "exclusions" => serde_json::from_value(raw.value.clone())
                .map(ScopeProperty::Exclusions)
                .map_err(|e| ConvertError::unrecognized(UNION_NAME, e.to_string())),
            other => Err(ConvertError::unrecognized(
                UNION_NAME,
                format!("unknown property '{}'", other),
            )),
        }
    }
}

impl ScopeExclusion {
    fn into_json(self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        if let Some(scope_id) = self.scope_id {
            object.insert("scope_id".to_string(), serde_json::Value::String(scope_id));
        }
        if let Some(scope_type) = self.scope_type {
            object.insert("scope_type".to_string(), serde_json::Value::String(scope_type));
        }
        serde_json::Value::Object(object)
    }
}

impl From<ScopeProperty> for RawScopeProperty {
    fn from(property: ScopeProperty) -> Self {
        let (name, value) = match property {
            ScopeProperty::ScopeId(id) => ("scope_id", serde_json::Value::String(id)),
            ScopeProperty::ScopeType(t) => ("scope_type", serde_json::Value::String(t)),
            ScopeProperty::Exclusions(exclusions) => (
                "exclusions",
                serde_json::Value::Array(
                    exclusions.into_iter().map(ScopeExclusion::into_json).collect(),
                ),
            ),
        };
        RawScopeProperty {
            name: name.to_string(),
            value,
        }
    }
}

impl ScopeProperty {
    /// Local map form: a map with exactly one of
    /// `scope_id`, `scope_type` or `exclusions`
    pub fn to_value(&self) -> Value {
        let (key, value) = match self {
            ScopeProperty::ScopeId(id) => ("scope_id", Value::from(id.as_str())),
            ScopeProperty::ScopeType(t) => ("scope_type", Value::from(t.as_str())),
            ScopeProperty::Exclusions(exclusions) => (
                "exclusions",
                Value::List(
                    exclusions
                        .iter()
                        .map(|e| {
                            let mut map = HashMap::new();
                            if let Some(id) = &e.scope_id {
                                map.insert("scope_id".to_string(), Value::from(id.as_str()));
                            }
                            if let Some(t) = &e.scope_type {
                                map.insert("scope_type".to_string(), Value::from(t.as_str()));
                            }
                            Value::Map(map)
                        })
                        .collect(),
                ),
            ),
        };
        Value::Map([(key.to_string(), value)].into())
    }

    pub fn from_value(value: &Value) -> Result<Self, ConvertError> {
        let map = value
            .as_map()
            .ok_or_else(|| ConvertError::unrecognized(UNION_NAME, "expected a map"))?;
        let set: Vec<(&String, &Value)> = map.iter().filter(|(_, v)| !v.is_empty()).collect();
        let [(key, value)] = set.as_slice() else {
            return Err(ConvertError::unrecognized(
                UNION_NAME,
                format!("expected exactly one property, got {}", set.len()),
            ));
        };
        let text = || {
            value.as_str().map(str::to_string).ok_or_else(|| {
                ConvertError::unrecognized(UNION_NAME, format!("'{}' must be a string", key))
            })
        };
        match key.as_str() {
            "scope_id" => text().map(ScopeProperty::ScopeId),
            "scope_type" => text().map(ScopeProperty::ScopeType),
            "exclusions" => {
                let items = value.as_list().ok_or_else(|| {
                    ConvertError::unrecognized(UNION_NAME, "'exclusions' must be a list")
                })?;
                let exclusions = items
                    .iter()
                    .map(|item| {
                        let entry = item.as_map();
                        let field = |name: &str| {
                            entry
                                .and_then(|m| m.get(name))
                                .and_then(Value::as_str)
                                .filter(|s| !s.is_empty())
                                .map(str::to_string)
                        };
                        ScopeExclusion {
                            scope_id: field("scope_id"),
                            scope_type: field("scope_type"),
                        }
                    })
                    .collect();
                Ok(ScopeProperty::Exclusions(exclusions))
            }
            other => Err(ConvertError::unrecognized(
                UNION_NAME,
                format!("unknown property '{}'", other),
            )),
        }
    }
}

fn flatten_scope_property(json: &serde_json::Value) -> Result<Value, ConvertError> {
    let raw: RawScopeProperty = serde_json::from_value(json.clone())
        .map_err(|e| ConvertError::Serialization(e.to_string()))?;
    Ok(ScopeProperty::try_from(raw)?.to_value())
}

fn expand_scope_property(value: &Value) -> Result<serde_json::Value, ConvertError> {
    let property = ScopeProperty::from_value(value)?;
    serde_json::to_value(&property).map_err(|e| ConvertError::Serialization(e.to_string()))
}

pub fn scope_property_codec() -> UnionCodec {
    UnionCodec {
        name: UNION_NAME,
        flatten: flatten_scope_property,
        expand: expand_scope_property,
    }
}
