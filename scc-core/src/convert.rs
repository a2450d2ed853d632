//! Convert - Translate between remote models and attribute maps
//!
//! Remote models are serde types whose fields are all optional. A field
//! left `None` never produces an attribute; a present field always does,
//! even when it holds a zero value. In the other direction, absent and
//! empty attributes stay unset so the remote service treats them as
//! "not provided" rather than "cleared".

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::resource::Value;
use crate::schema::{AttributeSchema, AttributeType};

/// Conversion error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    #[error("Unrecognized {union} subtype: {detail}")]
    UnrecognizedSubtype { union: String, detail: String },

    #[error("Invalid date-time '{value}' for '{attribute}': {message}")]
    InvalidDateTime {
        attribute: String,
        value: String,
        message: String,
    },

    #[error("Type mismatch for '{attribute}': expected {expected}")]
    TypeMismatch { attribute: String, expected: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ConvertError {
    pub fn unrecognized(union: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::UnrecognizedSubtype {
            union: union.into(),
            detail: detail.into(),
        }
    }

    fn mismatch(attribute: &str, expected: &AttributeType) -> Self {
        Self::TypeMismatch {
            attribute: attribute.to_string(),
            expected: expected.type_name(),
        }
    }
}

/// Canonical string form of a timestamp (e.g., "2024-03-01T10:00:00.000Z")
pub fn format_date_time(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 timestamp
pub fn parse_date_time(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
}

/// Collapse items sharing the same `key` attribute into one entry.
///
/// Later items replace earlier ones; the result is ordered by key, so
/// the order the remote service returned them in doesn't matter.
/// Items without the key are kept, after the keyed ones.
pub fn keyed_set(key: &str, items: Vec<Value>) -> Vec<Value> {
    let mut keyed = BTreeMap::new();
    let mut unkeyed = Vec::new();
    for item in items {
        let slot = item.as_map().and_then(|m| m.get(key)).map(set_key);
        match slot {
            Some(k) => {
                keyed.insert(k, item);
            }
            None => unkeyed.push(item),
        }
    }
    keyed.into_values().chain(unkeyed).collect()
}

fn set_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Int(i) => i.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::List(items) => items.iter().map(set_key).collect::<Vec<_>>().join(","),
        Value::Map(map) => {
            let sorted: BTreeMap<_, _> = map.iter().collect();
            sorted
                .into_iter()
                .map(|(k, v)| format!("{}={}", k, set_key(v)))
                .collect::<Vec<_>>()
                .join(",")
        }
    }
}

// =============================================================================
// Model -> attributes
// =============================================================================

/// Convert a remote model into attributes
pub fn to_attributes<T: Serialize>(
    schema: &HashMap<String, AttributeSchema>,
    model: &T,
) -> Result<HashMap<String, Value>, ConvertError> {
    let json =
        serde_json::to_value(model).map_err(|e| ConvertError::Serialization(e.to_string()))?;
    flatten(schema, &json)
}

/// Convert a remote JSON object into attributes, following `schema`
pub fn flatten(
    schema: &HashMap<String, AttributeSchema>,
    source: &serde_json::Value,
) -> Result<HashMap<String, Value>, ConvertError> {
    let mut attributes = HashMap::new();
    for (name, attr) in schema {
        if attr.path_parameter {
            continue;
        }
        if let Some(value) = source.get(attr.wire_name())
            && !value.is_null()
        {
            let converted = flatten_value(name, &attr.attr_type, value)?;
            attributes.insert(name.clone(), converted);
        }
    }
    Ok(attributes)
}

fn flatten_value(
    name: &str,
    attr_type: &AttributeType,
    value: &serde_json::Value,
) -> Result<Value, ConvertError> {
    match attr_type {
        AttributeType::String | AttributeType::Enum(_) | AttributeType::Json => {
            Ok(Value::String(json_to_text(value)))
        }
        AttributeType::Custom { base, .. } => flatten_value(name, base, value),
        AttributeType::Int => value
            .as_i64()
            .or_else(|| {
                value
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .map(Value::Int)
            .ok_or_else(|| ConvertError::mismatch(name, attr_type)),
        AttributeType::Bool => value
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| ConvertError::mismatch(name, attr_type)),
        AttributeType::DateTime => {
            let text = json_to_text(value);
            // Keep whatever the service sent when it isn't RFC 3339
            Ok(Value::String(match parse_date_time(&text) {
                Ok(dt) => format_date_time(&dt),
                Err(_) => text,
            }))
        }
        AttributeType::List(inner) => {
            let items = value
                .as_array()
                .ok_or_else(|| ConvertError::mismatch(name, attr_type))?;
            Ok(Value::List(flatten_items(name, inner, items)?))
        }
        AttributeType::KeyedSet { key, element } => {
            let items = value
                .as_array()
                .ok_or_else(|| ConvertError::mismatch(name, attr_type))?;
            Ok(Value::List(keyed_set(key, flatten_items(name, element, items)?)))
        }
        AttributeType::Map(inner) => {
            let object = value
                .as_object()
                .ok_or_else(|| ConvertError::mismatch(name, attr_type))?;
            let mut map = HashMap::new();
            for (k, v) in object {
                if !v.is_null() {
                    map.insert(k.clone(), flatten_value(name, inner, v)?);
                }
            }
            Ok(Value::Map(map))
        }
        AttributeType::Block(block) => {
            if !value.is_object() {
                return Err(ConvertError::mismatch(name, attr_type));
            }
            Ok(Value::Map(flatten(&block.attributes, value)?))
        }
        AttributeType::Union(codec) => (codec.flatten)(value),
    }
}

fn flatten_items(
    name: &str,
    inner: &AttributeType,
    items: &[serde_json::Value],
) -> Result<Vec<Value>, ConvertError> {
    items
        .iter()
        .filter(|v| !v.is_null())
        .map(|v| flatten_value(name, inner, v))
        .collect()
}

/// Text form of a scalar; structured values become their JSON text
pub fn json_to_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// Attributes -> model
// =============================================================================

/// Build a remote model from attributes
pub fn from_attributes<T: DeserializeOwned>(
    schema: &HashMap<String, AttributeSchema>,
    attributes: &HashMap<String, Value>,
) -> Result<T, ConvertError> {
    let object = expand(schema, attributes)?;
    serde_json::from_value(serde_json::Value::Object(object))
        .map_err(|e| ConvertError::Serialization(e.to_string()))
}

/// Convert attributes into a remote JSON object, following `schema`.
///
/// Computed-only and path attributes are skipped.
pub fn expand(
    schema: &HashMap<String, AttributeSchema>,
    attributes: &HashMap<String, Value>,
) -> Result<serde_json::Map<String, serde_json::Value>, ConvertError> {
    let mut object = serde_json::Map::new();
    for (name, attr) in schema {
        if attr.is_read_only() || attr.path_parameter {
            continue;
        }
        if let Some(value) = attributes.get(name)
            && let Some(json) = expand_value(name, &attr.attr_type, value)?
        {
            object.insert(attr.wire_name().to_string(), json);
        }
    }
    Ok(object)
}

fn expand_value(
    name: &str,
    attr_type: &AttributeType,
    value: &Value,
) -> Result<Option<serde_json::Value>, ConvertError> {
    if value.is_empty() {
        return Ok(None);
    }
    let json = match (attr_type, value) {
        (AttributeType::String | AttributeType::Enum(_), Value::String(s)) => {
            serde_json::Value::String(s.clone())
        }
        (AttributeType::Custom { base, .. }, v) => return expand_value(name, base, v),
        (AttributeType::Int, Value::Int(i)) => serde_json::Value::from(*i),
        (AttributeType::Bool, Value::Bool(b)) => serde_json::Value::Bool(*b),
        (AttributeType::DateTime, Value::String(s)) => {
            let parsed = parse_date_time(s).map_err(|e| ConvertError::InvalidDateTime {
                attribute: name.to_string(),
                value: s.clone(),
                message: e.to_string(),
            })?;
            serde_json::Value::String(format_date_time(&parsed))
        }
        (AttributeType::Json, v) => value_to_json(v),
        (AttributeType::List(inner), Value::List(items)) => {
            serde_json::Value::Array(expand_items(name, inner, items)?)
        }
        (AttributeType::KeyedSet { key, element }, Value::List(items)) => {
            let deduplicated = keyed_set(key, items.clone());
            serde_json::Value::Array(expand_items(name, element, &deduplicated)?)
        }
        (AttributeType::Map(inner), Value::Map(map)) => {
            let mut object = serde_json::Map::new();
            for (k, v) in map {
                if let Some(json) = expand_value(name, inner, v)? {
                    object.insert(k.clone(), json);
                }
            }
            serde_json::Value::Object(object)
        }
        (AttributeType::Block(block), Value::Map(map)) => {
            let object = expand(&block.attributes, map)?;
            if object.is_empty() {
                return Ok(None);
            }
            serde_json::Value::Object(object)
        }
        (AttributeType::Union(codec), v) => (codec.expand)(v)?,
        _ => return Err(ConvertError::mismatch(name, attr_type)),
    };
    Ok(Some(json))
}

fn expand_items(
    name: &str,
    inner: &AttributeType,
    items: &[Value],
) -> Result<Vec<serde_json::Value>, ConvertError> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if let Some(json) = expand_value(name, inner, item)? {
            out.push(json);
        }
    }
    Ok(out)
}

/// Open value back to JSON. Text that looks like a JSON array or
/// object is parsed; anything else stays a string.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => {
            let trimmed = s.trim_start();
            if (trimmed.starts_with('[') || trimmed.starts_with('{'))
                && let Ok(parsed) = serde_json::from_str(s)
            {
                return parsed;
            }
            serde_json::Value::String(s.clone())
        }
        Value::Int(i) => serde_json::Value::from(*i),
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::List(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
        Value::Map(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BlockSchema, UnionCodec};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Parameter {
        #[serde(skip_serializing_if = "Option::is_none")]
        parameter_name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        parameter_type: Option<String>,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Assessment {
        #[serde(skip_serializing_if = "Option::is_none")]
        assessment_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        assessment_description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        parameters: Option<Vec<Parameter>>,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Library {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        latest: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        controls_count: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        created_on: Option<DateTime<Utc>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        tags: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        assessments: Option<Vec<Assessment>>,
    }

    fn parameter_block() -> AttributeType {
        AttributeType::Block(
            BlockSchema::new()
                .attribute(AttributeSchema::new("parameter_name", AttributeType::String))
                .attribute(AttributeSchema::new("parameter_type", AttributeType::String)),
        )
    }

    fn library_schema() -> HashMap<String, AttributeSchema> {
        let assessment = AttributeType::Block(
            BlockSchema::new()
                .attribute(AttributeSchema::new("assessment_id", AttributeType::String))
                .attribute(AttributeSchema::new(
                    "assessment_description",
                    AttributeType::String,
                ))
                .attribute(AttributeSchema::new(
                    "parameters",
                    AttributeType::list(parameter_block()),
                )),
        );
        [
            AttributeSchema::new("library_id", AttributeType::String)
                .computed()
                .with_provider_name("id"),
            AttributeSchema::new("name", AttributeType::String),
            AttributeSchema::new("latest", AttributeType::Bool),
            AttributeSchema::new("controls_count", AttributeType::Int).computed(),
            AttributeSchema::new("created_on", AttributeType::DateTime),
            AttributeSchema::new("tags", AttributeType::list(AttributeType::String)),
            AttributeSchema::new(
                "assessments",
                AttributeType::keyed_set("assessment_id", assessment),
            ),
            AttributeSchema::new("instance_id", AttributeType::String).path_parameter(),
        ]
        .into_iter()
        .map(|a| (a.name.clone(), a))
        .collect()
    }

    fn assessment(id: &str, description: &str) -> Assessment {
        Assessment {
            assessment_id: Some(id.to_string()),
            assessment_description: Some(description.to_string()),
            parameters: None,
        }
    }

    #[test]
    fn none_fields_never_become_attributes() {
        let library = Library {
            name: Some("lib".to_string()),
            ..Default::default()
        };
        let attrs = to_attributes(&library_schema(), &library).unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs["name"], Value::String("lib".to_string()));
    }

    #[test]
    fn zero_values_are_kept() {
        let library = Library {
            name: Some(String::new()),
            latest: Some(false),
            controls_count: Some(0),
            tags: Some(vec![]),
            ..Default::default()
        };
        let attrs = to_attributes(&library_schema(), &library).unwrap();
        assert_eq!(attrs["name"], Value::String(String::new()));
        assert_eq!(attrs["latest"], Value::Bool(false));
        assert_eq!(attrs["controls_count"], Value::Int(0));
        assert_eq!(attrs["tags"], Value::List(vec![]));
    }

    #[test]
    fn provider_name_maps_wire_key() {
        let library = Library {
            id: Some("lib-1".to_string()),
            ..Default::default()
        };
        let attrs = to_attributes(&library_schema(), &library).unwrap();
        assert_eq!(attrs["library_id"], Value::String("lib-1".to_string()));
        assert!(!attrs.contains_key("id"));
    }

    #[test]
    fn date_time_uses_canonical_form() {
        let source = json!({"created_on": "2024-03-01T10:00:00Z"});
        let attrs = flatten(&library_schema(), &source).unwrap();
        assert_eq!(
            attrs["created_on"],
            Value::String("2024-03-01T10:00:00.000Z".to_string())
        );
    }

    #[test]
    fn lists_preserve_order() {
        let library = Library {
            tags: Some(vec!["b".to_string(), "a".to_string(), "c".to_string()]),
            ..Default::default()
        };
        let attrs = to_attributes(&library_schema(), &library).unwrap();
        assert_eq!(
            attrs["tags"],
            Value::List(vec![
                Value::String("b".to_string()),
                Value::String("a".to_string()),
                Value::String("c".to_string()),
            ])
        );
    }

    #[test]
    fn assessments_with_same_id_collapse() {
        let library = Library {
            assessments: Some(vec![
                assessment("rule-1", "first"),
                assessment("rule-2", "other"),
                assessment("rule-1", "second"),
            ]),
            ..Default::default()
        };
        let attrs = to_attributes(&library_schema(), &library).unwrap();
        let items = attrs["assessments"].as_list().unwrap();
        assert_eq!(items.len(), 2);
        let first = items[0].as_map().unwrap();
        assert_eq!(first["assessment_id"], Value::String("rule-1".to_string()));
        assert_eq!(
            first["assessment_description"],
            Value::String("second".to_string())
        );
    }

    #[test]
    fn assessment_order_is_irrelevant() {
        let forward = Library {
            assessments: Some(vec![assessment("a", "x"), assessment("b", "y")]),
            ..Default::default()
        };
        let backward = Library {
            assessments: Some(vec![assessment("b", "y"), assessment("a", "x")]),
            ..Default::default()
        };
        assert_eq!(
            to_attributes(&library_schema(), &forward).unwrap(),
            to_attributes(&library_schema(), &backward).unwrap()
        );
    }

    #[test]
    fn distinct_keys_never_collapse() {
        let items = vec![
            Value::Map([("assessment_id".to_string(), Value::from("a"))].into()),
            Value::Map([("assessment_id".to_string(), Value::from("b"))].into()),
        ];
        assert_eq!(keyed_set("assessment_id", items).len(), 2);
    }

    #[test]
    fn empty_attributes_stay_unset() {
        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String(String::new()));
        attrs.insert("tags".to_string(), Value::List(vec![]));
        let library: Library = from_attributes(&library_schema(), &attrs).unwrap();
        assert_eq!(library, Library::default());
    }

    #[test]
    fn computed_and_path_attributes_are_not_sent() {
        let mut attrs = HashMap::new();
        attrs.insert("library_id".to_string(), Value::from("lib-1"));
        attrs.insert("controls_count".to_string(), Value::Int(3));
        attrs.insert("instance_id".to_string(), Value::from("inst"));
        attrs.insert("name".to_string(), Value::from("lib"));
        let object = expand(&library_schema(), &attrs).unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["name"], json!("lib"));
    }

    #[test]
    fn invalid_date_time_is_rejected() {
        let mut attrs = HashMap::new();
        attrs.insert("created_on".to_string(), Value::from("not a date"));
        let err = expand(&library_schema(), &attrs).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidDateTime { .. }));
    }

    #[test]
    fn type_mismatch_is_reported() {
        let mut attrs = HashMap::new();
        attrs.insert("latest".to_string(), Value::from("yes"));
        let err = expand(&library_schema(), &attrs).unwrap_err();
        assert!(matches!(err, ConvertError::TypeMismatch { .. }));
    }

    #[test]
    fn fractional_numbers_are_not_integers() {
        let err = flatten(&library_schema(), &json!({"controls_count": 1.5})).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::TypeMismatch { ref attribute, .. } if attribute == "controls_count"
        ));

        let attrs = flatten(&library_schema(), &json!({"controls_count": 2.0})).unwrap();
        assert_eq!(attrs["controls_count"], Value::Int(2));
    }

    #[test]
    fn writable_fields_round_trip() {
        let library = Library {
            id: Some("server-side".to_string()),
            name: Some("lib".to_string()),
            latest: Some(true),
            controls_count: Some(4),
            created_on: Some(parse_date_time("2024-03-01T10:00:00.000Z").unwrap()),
            tags: Some(vec!["t1".to_string()]),
            assessments: Some(vec![Assessment {
                assessment_id: Some("rule-1".to_string()),
                assessment_description: Some("desc".to_string()),
                parameters: Some(vec![Parameter {
                    parameter_name: Some("p".to_string()),
                    parameter_type: Some("numeric".to_string()),
                }]),
            }]),
        };
        let attrs = to_attributes(&library_schema(), &library).unwrap();
        let rebuilt: Library = from_attributes(&library_schema(), &attrs).unwrap();

        let expected = Library {
            id: None,
            controls_count: None,
            ..library
        };
        assert_eq!(rebuilt, expected);
    }

    fn flatten_flag(value: &serde_json::Value) -> Result<Value, ConvertError> {
        match value.get("kind").and_then(|k| k.as_str()) {
            Some("flag") => Ok(Value::Bool(true)),
            other => Err(ConvertError::unrecognized("Flag", format!("{:?}", other))),
        }
    }

    fn expand_flag(_: &Value) -> Result<serde_json::Value, ConvertError> {
        Ok(json!({"kind": "flag"}))
    }

    #[test]
    fn union_errors_propagate() {
        let schema: HashMap<String, AttributeSchema> = [AttributeSchema::new(
            "flag",
            AttributeType::Union(UnionCodec {
                name: "Flag",
                flatten: flatten_flag,
                expand: expand_flag,
            }),
        )]
        .into_iter()
        .map(|a| (a.name.clone(), a))
        .collect();

        let ok = flatten(&schema, &json!({"flag": {"kind": "flag"}})).unwrap();
        assert_eq!(ok["flag"], Value::Bool(true));

        let err = flatten(&schema, &json!({"flag": {"kind": "other"}})).unwrap_err();
        assert!(matches!(err, ConvertError::UnrecognizedSubtype { .. }));
    }

    #[test]
    fn json_text_round_trips_structures() {
        assert_eq!(value_to_json(&Value::from("[1,2]")), json!([1, 2]));
        assert_eq!(value_to_json(&Value::from("1")), json!("1"));
        assert_eq!(value_to_json(&Value::from("[oops")), json!("[oops"));
        assert_eq!(json_to_text(&json!(true)), "true");
        assert_eq!(json_to_text(&json!("x")), "x");
    }
}
