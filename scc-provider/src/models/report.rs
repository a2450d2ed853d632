//! Report models
//!
//! Read-only aggregates describing the results of one scan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::profile::MultiCloudScope;
use super::rule::RuleTarget;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: Option<String>,
    pub group_id: Option<String>,
    pub created_on: Option<DateTime<Utc>>,
    pub scan_time: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub cos_object: Option<String>,
    pub instance_id: Option<String>,
    pub account: Option<Account>,
    pub profile: Option<ProfileInfo>,
    pub attachment: Option<AttachmentInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileInfo {
    pub id: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachmentInfo {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub schedule: Option<String>,
    pub scope: Option<Vec<MultiCloudScope>>,
}

/// Control counts by outcome
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceStats {
    pub status: Option<String>,
    pub total_count: Option<i64>,
    pub compliant_count: Option<i64>,
    pub not_compliant_count: Option<i64>,
    pub unable_to_perform_count: Option<i64>,
    pub user_evaluation_required_count: Option<i64>,
}

/// Evaluation counts by outcome
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalStats {
    pub status: Option<String>,
    pub total_count: Option<i64>,
    pub pass_count: Option<i64>,
    pub failure_count: Option<i64>,
    pub error_count: Option<i64>,
    pub completed_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceScore {
    pub passed: Option<i64>,
    pub total_count: Option<i64>,
    pub percent: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub status: Option<String>,
    pub total_count: Option<i64>,
    pub compliant_count: Option<i64>,
    pub not_compliant_count: Option<i64>,
    pub unable_to_perform_count: Option<i64>,
    pub user_evaluation_required_count: Option<i64>,
    pub top_failed: Option<Vec<ResourceSummaryItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummaryItem {
    pub name: Option<String>,
    pub id: Option<String>,
    pub service: Option<String>,
    pub tags: Option<Tags>,
    pub account: Option<String>,
    pub status: Option<String>,
    pub total_count: Option<i64>,
    pub pass_count: Option<i64>,
    pub failure_count: Option<i64>,
    pub error_count: Option<i64>,
    pub completed_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tags {
    pub user: Option<Vec<String>>,
    pub access: Option<Vec<String>>,
    pub service: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub report_id: Option<String>,
    /// Misspelled on the wire
    #[serde(rename = "isntance_id")]
    pub instance_id: Option<String>,
    pub account: Option<Account>,
    pub score: Option<ComplianceScore>,
    pub controls: Option<ComplianceStats>,
    pub evaluations: Option<EvalStats>,
    pub resources: Option<ResourceSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatestReports {
    pub home_account_id: Option<String>,
    pub controls_summary: Option<ComplianceStats>,
    pub evaluations_summary: Option<EvalStats>,
    pub score: Option<ComplianceScore>,
    pub reports: Option<Vec<Report>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportControls {
    pub report_id: Option<String>,
    pub home_account_id: Option<String>,
    pub controls: Option<Vec<ControlWithStats>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlWithStats {
    pub id: Option<String>,
    pub control_library_id: Option<String>,
    pub control_library_version: Option<String>,
    pub control_name: Option<String>,
    pub control_description: Option<String>,
    pub control_category: Option<String>,
    pub control_specifications: Option<Vec<ControlSpecificationWithStats>>,
    pub status: Option<String>,
    pub total_count: Option<i64>,
    pub compliant_count: Option<i64>,
    pub not_compliant_count: Option<i64>,
    pub unable_to_perform_count: Option<i64>,
    pub user_evaluation_required_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlSpecificationWithStats {
    pub control_specification_id: Option<String>,
    pub control_specification_description: Option<String>,
    pub component_id: Option<String>,
    pub component_name: Option<String>,
    pub environment: Option<String>,
    pub responsibility: Option<String>,
    pub assessments: Option<Vec<AssessmentWithStats>>,
    pub status: Option<String>,
    pub total_count: Option<i64>,
    pub compliant_count: Option<i64>,
    pub not_compliant_count: Option<i64>,
    pub unable_to_perform_count: Option<i64>,
    pub user_evaluation_required_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentWithStats {
    pub assessment_id: Option<String>,
    pub assessment_type: Option<String>,
    pub assessment_method: Option<String>,
    pub assessment_description: Option<String>,
    pub parameter_count: Option<i64>,
    pub parameters: Option<Vec<ReportParameter>>,
    pub total_count: Option<i64>,
    pub pass_count: Option<i64>,
    pub failure_count: Option<i64>,
    pub error_count: Option<i64>,
    pub completed_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportParameter {
    pub parameter_name: Option<String>,
    pub parameter_display_name: Option<String>,
    pub parameter_type: Option<String>,
    pub parameter_value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportEvaluation {
    pub home_account_id: Option<String>,
    pub report_id: Option<String>,
    pub control_id: Option<String>,
    pub component_id: Option<String>,
    pub assessment: Option<EvaluatedAssessment>,
    pub evaluate_time: Option<DateTime<Utc>>,
    pub target: Option<TargetInfo>,
    pub status: Option<String>,
    pub reason: Option<String>,
    pub details: Option<EvalDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedAssessment {
    pub assessment_id: Option<String>,
    pub assessment_type: Option<String>,
    pub assessment_method: Option<String>,
    pub assessment_description: Option<String>,
    pub parameter_count: Option<i64>,
    pub parameters: Option<Vec<ReportParameter>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetInfo {
    pub id: Option<String>,
    pub account_id: Option<String>,
    pub resource_crn: Option<String>,
    pub resource_name: Option<String>,
    pub service_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalDetails {
    pub properties: Option<Vec<EvalProperty>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalProperty {
    pub property: Option<String>,
    pub property_description: Option<String>,
    pub operator: Option<String>,
    pub expected_value: Option<serde_json::Value>,
    pub found_value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportResource {
    pub report_id: Option<String>,
    pub id: Option<String>,
    pub resource_name: Option<String>,
    pub component_id: Option<String>,
    pub environment: Option<String>,
    pub account: Option<Account>,
    pub status: Option<String>,
    pub total_count: Option<i64>,
    pub pass_count: Option<i64>,
    pub failure_count: Option<i64>,
    pub error_count: Option<i64>,
    pub completed_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportTags {
    pub report_id: Option<String>,
    pub tags: Option<Tags>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportViolationDrift {
    pub home_account_id: Option<String>,
    pub report_id: Option<String>,
    pub data_points: Option<Vec<ReportDataPoint>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportDataPoint {
    pub report_id: Option<String>,
    pub report_group_id: Option<String>,
    pub scan_time: Option<DateTime<Utc>>,
    pub controls: Option<ComplianceStats>,
}

/// A rule as it was evaluated in one report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportRule {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub account_id: Option<String>,
    pub created_on: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub updated_on: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
    pub labels: Option<Vec<String>>,
    pub target: Option<RuleTarget>,
}
