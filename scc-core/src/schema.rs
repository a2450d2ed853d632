//! Schema - Define type schemas for resources
//!
//! Providers define schemas for each resource type and data source.
//! The same declaration drives configuration validation and the
//! model↔map conversion in [`crate::convert`].

use std::collections::HashMap;
use std::fmt;

use crate::convert::{ConvertError, parse_date_time};
use crate::resource::Value;

/// Converter pair for a polymorphic ("one of") attribute.
///
/// `flatten` turns the remote representation into a local value,
/// `expand` goes the other way. Both fail with
/// [`ConvertError::UnrecognizedSubtype`] on shapes they don't know.
#[derive(Debug, Clone, Copy)]
pub struct UnionCodec {
    pub name: &'static str,
    pub flatten: fn(&serde_json::Value) -> Result<Value, ConvertError>,
    pub expand: fn(&Value) -> Result<serde_json::Value, ConvertError>,
}

/// Attribute type
#[derive(Debug, Clone)]
pub enum AttributeType {
    /// String
    String,
    /// Integer
    Int,
    /// Boolean
    Bool,
    /// Enum (list of allowed values)
    Enum(Vec<String>),
    /// Custom type (with validation function)
    Custom {
        name: String,
        base: Box<AttributeType>,
        validate: fn(&Value) -> Result<(), String>,
    },
    /// List
    List(Box<AttributeType>),
    /// Map
    Map(Box<AttributeType>),
    /// Nested object with its own attributes
    Block(BlockSchema),
    /// Unordered collection of blocks, de-duplicated by one key attribute
    KeyedSet {
        key: String,
        element: Box<AttributeType>,
    },
    /// Timestamp, kept locally in canonical string form
    DateTime,
    /// Open value, kept locally as text
    Json,
    /// Polymorphic value with a dedicated codec
    Union(UnionCodec),
}

impl AttributeType {
    pub fn list(inner: AttributeType) -> Self {
        AttributeType::List(Box::new(inner))
    }

    pub fn map(inner: AttributeType) -> Self {
        AttributeType::Map(Box::new(inner))
    }

    pub fn keyed_set(key: impl Into<String>, element: AttributeType) -> Self {
        AttributeType::KeyedSet {
            key: key.into(),
            element: Box::new(element),
        }
    }

    pub fn enumeration(values: &[&str]) -> Self {
        AttributeType::Enum(values.iter().map(|v| v.to_string()).collect())
    }

    /// Check if a value conforms to this type
    pub fn validate(&self, value: &Value) -> Result<(), TypeError> {
        match (self, value) {
            (AttributeType::String, Value::String(_)) => Ok(()),
            (AttributeType::Int, Value::Int(_)) => Ok(()),
            (AttributeType::Bool, Value::Bool(_)) => Ok(()),
            (AttributeType::Json, _) => Ok(()),

            (AttributeType::Enum(variants), Value::String(s)) => {
                if variants.iter().any(|v| v == s) {
                    Ok(())
                } else {
                    Err(TypeError::InvalidEnumVariant {
                        value: s.clone(),
                        expected: variants.clone(),
                    })
                }
            }

            (AttributeType::Custom { validate, base, .. }, v) => {
                base.validate(v)?;
                validate(v).map_err(|msg| TypeError::ValidationFailed { message: msg })
            }

            (AttributeType::List(inner), Value::List(items))
            | (AttributeType::KeyedSet { element: inner, .. }, Value::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    inner.validate(item).map_err(|e| TypeError::ListItemError {
                        index: i,
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }

            (AttributeType::Map(inner), Value::Map(map)) => {
                for (k, v) in map {
                    inner.validate(v).map_err(|e| TypeError::MapValueError {
                        key: k.clone(),
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }

            (AttributeType::Block(block), Value::Map(map)) => match block.validate(map) {
                Ok(()) => Ok(()),
                Err(mut errors) => Err(errors.remove(0)),
            },

            (AttributeType::DateTime, Value::String(s)) => parse_date_time(s)
                .map(|_| ())
                .map_err(|e| TypeError::ValidationFailed {
                    message: format!("'{}' is not a valid date-time: {}", s, e),
                }),

            (AttributeType::Union(codec), v) => (codec.expand)(v)
                .map(|_| ())
                .map_err(|e| TypeError::ValidationFailed {
                    message: e.to_string(),
                }),

            _ => Err(TypeError::TypeMismatch {
                expected: self.type_name(),
                got: value.type_name(),
            }),
        }
    }

    pub(crate) fn type_name(&self) -> String {
        match self {
            AttributeType::String => "String".to_string(),
            AttributeType::Int => "Int".to_string(),
            AttributeType::Bool => "Bool".to_string(),
            AttributeType::Enum(variants) => format!("Enum({})", variants.join(" | ")),
            AttributeType::Custom { name, .. } => name.clone(),
            AttributeType::List(inner) => format!("List<{}>", inner.type_name()),
            AttributeType::Map(inner) => format!("Map<{}>", inner.type_name()),
            AttributeType::Block(_) => "Block".to_string(),
            AttributeType::KeyedSet { key, element } => {
                format!("Set<{}> by {}", element.type_name(), key)
            }
            AttributeType::DateTime => "DateTime".to_string(),
            AttributeType::Json => "Json".to_string(),
            AttributeType::Union(codec) => codec.name.to_string(),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Type error
#[derive(Debug, Clone, thiserror::Error)]
pub enum TypeError {
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Invalid enum variant '{value}', expected one of: {}", expected.join(", "))]
    InvalidEnumVariant {
        value: String,
        expected: Vec<String>,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Required attribute '{name}' is missing")]
    MissingRequired { name: String },

    #[error("Attribute '{name}' is computed and cannot be set")]
    ReadOnly { name: String },

    #[error("Attribute '{name}': {inner}")]
    AttributeError { name: String, inner: Box<TypeError> },

    #[error("List item at index {index}: {inner}")]
    ListItemError { index: usize, inner: Box<TypeError> },

    #[error("Map value for key '{key}': {inner}")]
    MapValueError { key: String, inner: Box<TypeError> },
}

/// Attribute schema
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    pub name: String,
    pub attr_type: AttributeType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub description: Option<String>,
    /// Remote property name when it differs from `name` (e.g., "id")
    pub provider_name: Option<String>,
    /// Sent as part of the request path; never part of a request or response body
    pub path_parameter: bool,
}

impl AttributeSchema {
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attr_type,
            required: false,
            optional: true,
            computed: false,
            description: None,
            provider_name: None,
            path_parameter: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self.optional = false;
        self
    }

    /// Set by the remote service only
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self.required = false;
        self.optional = false;
        self
    }

    /// May be configured; filled in by the remote service when not
    pub fn optional_computed(mut self) -> Self {
        self.computed = true;
        self.required = false;
        self.optional = true;
        self
    }

    pub fn path_parameter(mut self) -> Self {
        self.path_parameter = true;
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = Some(name.into());
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }

    /// Key used for this attribute in the remote model
    pub fn wire_name(&self) -> &str {
        self.provider_name.as_deref().unwrap_or(&self.name)
    }
}

/// Attributes of a nested block
#[derive(Debug, Clone, Default)]
pub struct BlockSchema {
    pub attributes: HashMap<String, AttributeSchema>,
}

impl BlockSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, schema: AttributeSchema) -> Self {
        self.attributes.insert(schema.name.clone(), schema);
        self
    }

    pub fn validate(&self, attributes: &HashMap<String, Value>) -> Result<(), Vec<TypeError>> {
        validate_attributes(&self.attributes, attributes)
    }
}

/// Resource schema
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    pub resource_type: String,
    pub attributes: HashMap<String, AttributeSchema>,
    pub description: Option<String>,
}

impl ResourceSchema {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            attributes: HashMap::new(),
            description: None,
        }
    }

    pub fn attribute(mut self, schema: AttributeSchema) -> Self {
        self.attributes.insert(schema.name.clone(), schema);
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Derive a data source schema: every attribute becomes computed.
    /// Inputs are declared again afterwards with [`ResourceSchema::attribute`].
    pub fn into_data_source(mut self, data_source_type: impl Into<String>) -> Self {
        self.resource_type = data_source_type.into();
        for attr in self.attributes.values_mut() {
            attr.computed = true;
            attr.required = false;
            attr.optional = false;
        }
        self
    }

    /// Validate resource attributes
    pub fn validate(&self, attributes: &HashMap<String, Value>) -> Result<(), Vec<TypeError>> {
        validate_attributes(&self.attributes, attributes)
    }
}

fn validate_attributes(
    schema: &HashMap<String, AttributeSchema>,
    attributes: &HashMap<String, Value>,
) -> Result<(), Vec<TypeError>> {
    let mut errors = Vec::new();

    for (name, attr) in schema {
        let present = attributes.get(name).is_some_and(|v| !v.is_empty());
        if attr.required && !present {
            errors.push(TypeError::MissingRequired { name: name.clone() });
        }
    }

    for (name, value) in attributes {
        // Unknown attributes are allowed (for flexibility)
        let Some(attr) = schema.get(name) else {
            continue;
        };
        if attr.is_read_only() {
            errors.push(TypeError::ReadOnly { name: name.clone() });
            continue;
        }
        if let Err(e) = attr.attr_type.validate(value) {
            errors.push(TypeError::AttributeError {
                name: name.clone(),
                inner: Box::new(e),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Helper functions for common types
pub mod types {
    use super::*;

    /// Positive integer type
    pub fn positive_int() -> AttributeType {
        AttributeType::Custom {
            name: "PositiveInt".to_string(),
            base: Box::new(AttributeType::Int),
            validate: |value| {
                if let Value::Int(n) = value {
                    if *n > 0 {
                        Ok(())
                    } else {
                        Err("Value must be positive".to_string())
                    }
                } else {
                    Err("Expected integer".to_string())
                }
            },
        }
    }

    /// List of strings
    pub fn string_list() -> AttributeType {
        AttributeType::list(AttributeType::String)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_string_type() {
        let t = AttributeType::String;
        assert!(t.validate(&Value::String("hello".to_string())).is_ok());
        assert!(t.validate(&Value::Int(42)).is_err());
    }

    #[test]
    fn validate_enum_type() {
        let t = AttributeType::enumeration(&["custom", "predefined"]);
        assert!(t.validate(&Value::String("custom".to_string())).is_ok());
        assert!(t.validate(&Value::String("other".to_string())).is_err());
    }

    #[test]
    fn validate_positive_int() {
        let t = types::positive_int();
        assert!(t.validate(&Value::Int(1)).is_ok());
        assert!(t.validate(&Value::Int(0)).is_err());
        assert!(t.validate(&Value::Int(-1)).is_err());
        assert!(t.validate(&Value::String("1".to_string())).is_err());
    }

    #[test]
    fn validate_string_list() {
        let t = types::string_list();
        assert!(t.validate(&Value::List(vec![Value::from("a")])).is_ok());
        assert!(t.validate(&Value::List(vec![Value::Int(1)])).is_err());
        assert!(t.validate(&Value::Map(HashMap::new())).is_err());
    }

    #[test]
    fn validate_date_time() {
        let t = AttributeType::DateTime;
        assert!(
            t.validate(&Value::String("2024-03-01T10:00:00.000Z".to_string()))
                .is_ok()
        );
        assert!(t.validate(&Value::String("yesterday".to_string())).is_err());
    }

    fn parameter_block() -> AttributeType {
        AttributeType::Block(
            BlockSchema::new()
                .attribute(AttributeSchema::new("parameter_name", AttributeType::String).required())
                .attribute(AttributeSchema::new("parameter_type", AttributeType::String)),
        )
    }

    #[test]
    fn validate_nested_block() {
        let t = AttributeType::list(parameter_block());

        let ok = Value::List(vec![Value::Map(
            [(
                "parameter_name".to_string(),
                Value::String("session_timeout".to_string()),
            )]
            .into_iter()
            .collect(),
        )]);
        assert!(t.validate(&ok).is_ok());

        let missing = Value::List(vec![Value::Map(
            [(
                "parameter_type".to_string(),
                Value::String("numeric".to_string()),
            )]
            .into_iter()
            .collect(),
        )]);
        let err = t.validate(&missing).unwrap_err();
        assert!(matches!(err, TypeError::ListItemError { index: 0, .. }));
    }

    #[test]
    fn validate_resource_schema() {
        let schema = ResourceSchema::new("resource")
            .attribute(AttributeSchema::new("name", AttributeType::String).required())
            .attribute(AttributeSchema::new("count", types::positive_int()))
            .attribute(AttributeSchema::new("enabled", AttributeType::Bool));

        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String("my-resource".to_string()));
        attrs.insert("count".to_string(), Value::Int(5));
        attrs.insert("enabled".to_string(), Value::Bool(true));

        assert!(schema.validate(&attrs).is_ok());
    }

    #[test]
    fn missing_required_attribute() {
        let schema = ResourceSchema::new("profile")
            .attribute(AttributeSchema::new("name", AttributeType::String).required());

        let attrs = HashMap::new();
        let errors = schema.validate(&attrs).unwrap_err();
        assert!(matches!(errors[0], TypeError::MissingRequired { .. }));

        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String(String::new()));
        assert!(schema.validate(&attrs).is_err());
    }

    #[test]
    fn computed_attribute_cannot_be_set() {
        let schema = ResourceSchema::new("profile")
            .attribute(AttributeSchema::new("created_on", AttributeType::DateTime).computed())
            .attribute(AttributeSchema::new("version", AttributeType::String).optional_computed());

        let mut attrs = HashMap::new();
        attrs.insert("version".to_string(), Value::String("1.0.0".to_string()));
        assert!(schema.validate(&attrs).is_ok());

        attrs.insert(
            "created_on".to_string(),
            Value::String("2024-03-01T10:00:00.000Z".to_string()),
        );
        let errors = schema.validate(&attrs).unwrap_err();
        assert!(matches!(errors[0], TypeError::ReadOnly { .. }));
    }

    #[test]
    fn data_source_marks_everything_computed() {
        let schema = ResourceSchema::new("scc_profile")
            .attribute(AttributeSchema::new("profile_name", AttributeType::String).required())
            .into_data_source("scc_profile")
            .attribute(AttributeSchema::new("profile_id", AttributeType::String).required());

        assert!(schema.attributes["profile_name"].is_read_only());
        assert!(schema.attributes["profile_id"].required);
    }

    #[test]
    fn wire_name_defaults_to_name() {
        let plain = AttributeSchema::new("profile_name", AttributeType::String);
        assert_eq!(plain.wire_name(), "profile_name");
        let renamed = AttributeSchema::new("profile_id", AttributeType::String)
            .with_provider_name("id");
        assert_eq!(renamed.wire_name(), "id");
    }
}
