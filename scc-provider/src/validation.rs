//! Attribute types with service-side constraints
//!
//! Names, versions and ids are checked locally so a bad value fails
//! validation instead of a remote call.

use std::sync::LazyLock;

use regex::Regex;
use scc_core::resource::Value;
use scc_core::schema::AttributeType;
use uuid::Uuid;

pub const CONTROL_LIBRARY_TYPES: &[&str] = &["custom", "predefined"];
pub const PROFILE_TYPES: &[&str] = &["custom", "predefined"];
pub const ATTACHMENT_STATUSES: &[&str] = &["enabled", "disabled"];
pub const ATTACHMENT_SCHEDULES: &[&str] = &["daily", "every_7_days", "every_30_days"];
pub const RULE_TYPES: &[&str] = &["user_defined", "system_defined"];

/// Compiled on first use
type Pattern = LazyLock<Result<Regex, regex::Error>>;

static LIBRARY_NAME_PATTERN: Pattern = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_\s\-]*$"));
static DESCRIPTION_PATTERN: Pattern = LazyLock::new(|| Regex::new(r"[A-Za-z0-9]+"));
static VERSION_PATTERN: Pattern = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_\-.]*$"));

/// Control library name: letters, digits, `_`, `-` and whitespace
pub fn library_name() -> AttributeType {
    AttributeType::Custom {
        name: "LibraryName".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            let s = expect_string(value)?;
            check_length(s, 2, 64)?;
            check_pattern(s, &LIBRARY_NAME_PATTERN)
        },
    }
}

/// Free-text description, 2 to 256 characters with at least one alphanumeric
pub fn description() -> AttributeType {
    AttributeType::Custom {
        name: "Description".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            let s = expect_string(value)?;
            check_length(s, 2, 256)?;
            check_pattern(s, &DESCRIPTION_PATTERN)
        },
    }
}

/// Version string such as "1.0.0"
pub fn version() -> AttributeType {
    AttributeType::Custom {
        name: "Version".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            let s = expect_string(value)?;
            check_length(s, 5, 64)?;
            check_pattern(s, &VERSION_PATTERN)
        },
    }
}

/// Lower-case hyphenated UUID
pub fn uuid() -> AttributeType {
    AttributeType::Custom {
        name: "Uuid".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            let s = expect_string(value)?;
            let parsed = Uuid::parse_str(s).map_err(|e| format!("'{}' is not a UUID: {}", s, e))?;
            // parse_str also accepts simple, braced and urn forms
            if parsed.hyphenated().to_string() != *s {
                return Err(format!(
                    "'{}' must be a lower-case hyphenated UUID",
                    s
                ));
            }
            Ok(())
        },
    }
}

fn expect_string(value: &Value) -> Result<&str, String> {
    value
        .as_str()
        .ok_or_else(|| "Expected string".to_string())
}

fn check_length(s: &str, min: usize, max: usize) -> Result<(), String> {
    let len = s.chars().count();
    if len < min || len > max {
        Err(format!(
            "'{}' must be between {} and {} characters, got {}",
            s, min, max, len
        ))
    } else {
        Ok(())
    }
}

fn check_pattern(s: &str, pattern: &Pattern) -> Result<(), String> {
    let re = LazyLock::force(pattern).as_ref().map_err(|e| e.to_string())?;
    if re.is_match(s) {
        Ok(())
    } else {
        Err(format!("'{}' does not match {}", s, re.as_str()))
    }
}
