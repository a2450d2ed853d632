//! Required configuration expressions
//!
//! A rule's requirement is a boolean tree: leaves compare one property
//! against a value, inner nodes combine children with `and` or `or`.
//! On the wire every node is the same loose object; which variant it is
//! depends on which keys are present.

use std::collections::HashMap;

use scc_core::convert::{ConvertError, json_to_text, value_to_json};
use scc_core::resource::Value;
use scc_core::schema::UnionCodec;
use serde::{Deserialize, Serialize};

const UNION_NAME: &str = "RequiredConfig";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRequiredConfig", into = "RawRequiredConfig")]
pub enum RequiredConfig {
    Condition {
        description: Option<String>,
        property: String,
        operator: Option<String>,
        value: Option<serde_json::Value>,
    },
    And {
        description: Option<String>,
        and: Vec<RequiredConfig>,
    },
    Or {
        description: Option<String>,
        or: Vec<RequiredConfig>,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawRequiredConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    property: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    and: Option<Vec<RawRequiredConfig>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    or: Option<Vec<RawRequiredConfig>>,
}

impl TryFrom<RawRequiredConfig> for RequiredConfig {
    type Error = ConvertError;

    fn try_from(raw: RawRequiredConfig) -> Result<Self, Self::Error> {
        let children = |items: Vec<RawRequiredConfig>| {
            items
                .into_iter()
                .map(RequiredConfig::try_from)
                .collect::<Result<Vec<_>, _>>()
        };
        match (raw.and, raw.or, raw.property) {
            (Some(and), None, _) => Ok(RequiredConfig::And {
                description: raw.description,
                and: children(and)?,
            }),
            (None, Some(or), _) => Ok(RequiredConfig::Or {
                description: raw.description,
                or: children(or)?,
            }),
            (None, None, Some(property)) => Ok(RequiredConfig::Condition {
                description: raw.description,
                property,
                operator: raw.operator,
                value: raw.value,
            }),
            (Some(_), Some(_), _) => Err(ConvertError::unrecognized(
                UNION_NAME,
                "node has both 'and' and 'or'",
            )),
            (None, None, None) => Err(ConvertError::unrecognized(
                UNION_NAME,
                "node has none of 'and', 'or' or 'property'",
            )),
        }
    }
}

impl From<RequiredConfig> for RawRequiredConfig {
    fn from(config: RequiredConfig) -> Self {
        match config {
            RequiredConfig::Condition {
                description,
                property,
                operator,
                value,
            } => RawRequiredConfig {
                description,
                property: Some(property),
                operator,
                value,
                ..Default::default()
            },
            RequiredConfig::And { description, and } => RawRequiredConfig {
                description,
                and: Some(and.into_iter().map(Into::into).collect()),
                ..Default::default()
            },
            RequiredConfig::Or { description, or } => RawRequiredConfig {
                description,
                or: Some(or.into_iter().map(Into::into).collect()),
                ..Default::default()
            },
        }
    }
}

impl RequiredConfig {
    /// Local map form. Leaf values are kept as text.
    pub fn to_value(&self) -> Value {
        let mut map = HashMap::new();
        let description = match self {
            RequiredConfig::Condition {
                description,
                property,
                operator,
                value,
            } => {
                map.insert("property".to_string(), Value::from(property.as_str()));
                if let Some(operator) = operator {
                    map.insert("operator".to_string(), Value::from(operator.as_str()));
                }
                if let Some(value) = value
                    && !value.is_null()
                {
                    map.insert("value".to_string(), Value::String(json_to_text(value)));
                }
                description
            }
            RequiredConfig::And { description, and } => {
                map.insert(
                    "and".to_string(),
                    Value::List(and.iter().map(RequiredConfig::to_value).collect()),
                );
                description
            }
            RequiredConfig::Or { description, or } => {
                map.insert(
                    "or".to_string(),
                    Value::List(or.iter().map(RequiredConfig::to_value).collect()),
                );
                description
            }
        };
        if let Some(description) = description {
            map.insert("description".to_string(), Value::from(description.as_str()));
        }
        Value::Map(map)
    }

    /// Parse the local map form. Empty strings and empty lists count as unset.
    pub fn from_value(value: &Value) -> Result<Self, ConvertError> {
        let map = value
            .as_map()
            .ok_or_else(|| ConvertError::unrecognized(UNION_NAME, "expected a map"))?;
        let text = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let children = |key: &str| -> Result<Option<Vec<RequiredConfig>>, ConvertError> {
            match map.get(key) {
                None => Ok(None),
                Some(v) if v.is_empty() => Ok(None),
                Some(Value::List(items)) => items
                    .iter()
                    .map(RequiredConfig::from_value)
                    .collect::<Result<Vec<_>, _>>()
                    .map(Some),
                Some(_) => Err(ConvertError::unrecognized(
                    UNION_NAME,
                    format!("'{}' must be a list", key),
                )),
            }
        };

        let raw = RawRequiredConfig {
            description: text("description"),
            property: text("property"),
            operator: text("operator"),
            value: map
                .get("value")
                .filter(|v| !v.is_empty())
                .map(value_to_json),
            and: None,
            or: None,
        };
        match (children("and")?, children("or")?) {
            (Some(and), None) => Ok(RequiredConfig::And {
                description: raw.description,
                and,
            }),
            (None, Some(or)) => Ok(RequiredConfig::Or {
                description: raw.description,
                or,
            }),
            (Some(_), Some(_)) => Err(ConvertError::unrecognized(
                UNION_NAME,
                "node has both 'and' and 'or'",
            )),
            (None, None) => RequiredConfig::try_from(raw),
        }
    }
}

fn flatten_required_config(json: &serde_json::Value) -> Result<Value, ConvertError> {
    let raw: RawRequiredConfig = serde_json::from_value(json.clone())
        .map_err(|e| ConvertError::Serialization(e.to_string()))?;
    Ok(RequiredConfig::try_from(raw)?.to_value())
}

fn expand_required_config(value: &Value) -> Result<serde_json::Value, ConvertError> {
    let config = RequiredConfig::from_value(value)?;
    serde_json::to_value(&config).map_err(|e| ConvertError::Serialization(e.to_string()))
}

pub fn required_config_codec() -> UnionCodec {
    UnionCodec {
        name: UNION_NAME,
        flatten: flatten_required_config,
        expand: expand_required_config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn leaf(property: &str, operator: &str, value: Option<serde_json::Value>) -> RequiredConfig {
        RequiredConfig::Condition {
            description: None,
            property: property.to_string(),
            operator: Some(operator.to_string()),
            value,
        }
    }

    #[test]
    fn nested_tree_keeps_structure() {
        let wire = json!({
            "and": [
                {"property": "x", "operator": "is_true"},
                {"or": [{"property": "y", "operator": "eq", "value": "1"}]}
            ]
        });
        let flattened = flatten_required_config(&wire).unwrap();

        let root = flattened.as_map().unwrap();
        assert!(!root.contains_key("or"));
        let and = root["and"].as_list().unwrap();
        assert_eq!(and.len(), 2);

        let first = and[0].as_map().unwrap();
        assert_eq!(first["property"], Value::from("x"));
        assert_eq!(first["operator"], Value::from("is_true"));
        assert!(!first.contains_key("value"));

        let inner = and[1].as_map().unwrap()["or"].as_list().unwrap();
        let leaf = inner[0].as_map().unwrap();
        assert_eq!(leaf["property"], Value::from("y"));
        assert_eq!(leaf["operator"], Value::from("eq"));
        assert_eq!(leaf["value"], Value::from("1"));

        assert_eq!(expand_required_config(&flattened).unwrap(), wire);
    }

    #[test]
    fn typed_tree_deserializes() {
        let wire = json!({
            "description": "tls",
            "or": [{"property": "tls_version", "operator": "string_equals", "value": "1.2"}]
        });
        let config: RequiredConfig = serde_json::from_value(wire).unwrap();
        assert_eq!(
            config,
            RequiredConfig::Or {
                description: Some("tls".to_string()),
                or: vec![leaf("tls_version", "string_equals", Some(json!("1.2")))],
            }
        );
    }

    #[test]
    fn non_string_values_become_text() {
        let wire = json!({"property": "ports", "operator": "ips_in_range", "value": ["10.0.0.0/8"]});
        let flattened = flatten_required_config(&wire).unwrap();
        assert_eq!(
            flattened.as_map().unwrap()["value"],
            Value::from("[\"10.0.0.0/8\"]")
        );
        assert_eq!(expand_required_config(&flattened).unwrap(), wire);

        let wire = json!({"property": "enabled", "operator": "is_true", "value": true});
        let flattened = flatten_required_config(&wire).unwrap();
        assert_eq!(flattened.as_map().unwrap()["value"], Value::from("true"));
    }

    #[test]
    fn ambiguous_nodes_are_rejected() {
        let both = json!({"and": [], "or": []});
        assert!(matches!(
            flatten_required_config(&both),
            Err(ConvertError::UnrecognizedSubtype { .. })
        ));

        let neither = json!({"description": "nothing"});
        assert!(matches!(
            flatten_required_config(&neither),
            Err(ConvertError::UnrecognizedSubtype { .. })
        ));

        let local = Value::Map([("operator".to_string(), Value::from("eq"))].into());
        assert!(matches!(
            RequiredConfig::from_value(&local),
            Err(ConvertError::UnrecognizedSubtype { .. })
        ));
    }

    #[test]
    fn empty_local_strings_are_unset() {
        let local = Value::Map(
            [
                ("property".to_string(), Value::from("x")),
                ("operator".to_string(), Value::from("is_true")),
                ("value".to_string(), Value::from("")),
                ("description".to_string(), Value::from("")),
                ("and".to_string(), Value::List(vec![])),
            ]
            .into(),
        );
        let config = RequiredConfig::from_value(&local).unwrap();
        assert_eq!(config, leaf("x", "is_true", None));
    }

    #[test]
    fn deep_nesting_has_no_limit() {
        let mut config = leaf("p", "is_true", None);
        for depth in 0..16 {
            config = if depth % 2 == 0 {
                RequiredConfig::And {
                    description: None,
                    and: vec![config],
                }
            } else {
                RequiredConfig::Or {
                    description: None,
                    or: vec![config],
                }
            };
        }
        let rebuilt = RequiredConfig::from_value(&config.to_value()).unwrap();
        assert_eq!(rebuilt, config);
    }
}
