//! Control library models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A versioned collection of controls
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlLibrary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_library_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_library_description: Option<String>,
    /// `custom` or `predefined`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_library_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_group_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_library_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hierarchy_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controls_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_parents_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controls: Option<Vec<LibraryControl>>,
}

/// A control as it appears inside a control library
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryControl {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_specifications: Option<Vec<ControlSpecification>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_docs: Option<ControlDocs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_requirement: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlSpecification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_specification_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_specification_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessments_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessments: Option<Vec<Assessment>>,
}

/// An automated or manual check implementing a control specification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ParameterInfo>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlDocs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_docs_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_docs_type: Option<String>,
}
