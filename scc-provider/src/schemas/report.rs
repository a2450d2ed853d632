//! Report data source schemas
//!
//! Reports are produced by scans and can only be read.

use scc_core::schema::{AttributeSchema, AttributeType, BlockSchema, ResourceSchema, types};

use super::common;

pub const LATEST_TYPE: &str = "scc_latest_reports";
pub const REPORT_TYPE: &str = "scc_report";
pub const SUMMARY_TYPE: &str = "scc_report_summary";
pub const CONTROLS_TYPE: &str = "scc_report_controls";
pub const EVALUATIONS_TYPE: &str = "scc_report_evaluations";
pub const RESOURCES_TYPE: &str = "scc_report_resources";
pub const TAGS_TYPE: &str = "scc_report_tags";
pub const VIOLATION_DRIFT_TYPE: &str = "scc_report_violation_drift";
pub const RULE_TYPE: &str = "scc_report_rule";

fn computed(name: &str, attr_type: AttributeType) -> AttributeSchema {
    AttributeSchema::new(name, attr_type).computed()
}

fn text(name: &str) -> AttributeSchema {
    AttributeSchema::new(name, AttributeType::String)
}

/// `instance_id` plus a required `report_id`
fn report_inputs(schema: ResourceSchema) -> ResourceSchema {
    schema
        .attribute(common::instance_id())
        .attribute(text("report_id").required().with_description("The ID of the scan report."))
}

fn report_attributes() -> Vec<AttributeSchema> {
    vec![
        text("group_id"),
        AttributeSchema::new("created_on", AttributeType::DateTime),
        AttributeSchema::new("scan_time", AttributeType::DateTime),
        text("type"),
        text("cos_object"),
        AttributeSchema::new("account", common::account()),
        AttributeSchema::new("profile", profile_info()),
        AttributeSchema::new("attachment", attachment_info()),
    ]
}

fn report_block() -> AttributeType {
    let block = BlockSchema::new()
        .attribute(text("id"))
        .attribute(text("instance_id"));
    AttributeType::Block(report_attributes().into_iter().fold(block, BlockSchema::attribute))
}

fn profile_info() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(text("id"))
            .attribute(text("name"))
            .attribute(text("version")),
    )
}

fn attachment_info() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(text("id"))
            .attribute(text("name"))
            .attribute(text("description"))
            .attribute(text("schedule"))
            .attribute(AttributeSchema::new(
                "scope",
                AttributeType::list(common::multi_cloud_scope()),
            )),
    )
}

pub fn latest_reports() -> ResourceSchema {
    ResourceSchema::new(LATEST_TYPE)
        .with_description("The most recent report of every attachment.")
        .attribute(common::instance_id())
        .attribute(text("sort").with_description("Field to sort the reports by."))
        .attribute(computed("home_account_id", AttributeType::String))
        .attribute(computed("controls_summary", common::compliance_stats()))
        .attribute(computed("evaluations_summary", common::eval_stats()))
        .attribute(computed("score", common::compliance_score()))
        .attribute(computed("reports", AttributeType::list(report_block())))
}

pub fn report() -> ResourceSchema {
    report_attributes()
        .into_iter()
        .fold(
            ResourceSchema::new(REPORT_TYPE).with_description("One scan report."),
            |schema, attr| schema.attribute(attr.computed()),
        )
        .attribute(common::instance_id())
        .attribute(text("report_id").required().with_provider_name("id"))
}

pub fn summary() -> ResourceSchema {
    let top_failed = AttributeType::Block(common::eval_counts(
        BlockSchema::new()
            .attribute(text("name"))
            .attribute(text("id"))
            .attribute(text("service"))
            .attribute(AttributeSchema::new("tags", common::tags()))
            .attribute(text("account"))
            .attribute(text("status")),
    ));
    let resource_summary = AttributeType::Block(
        common::compliance_counts(BlockSchema::new())
            .attribute(AttributeSchema::new("top_failed", AttributeType::list(top_failed))),
    );

    report_inputs(ResourceSchema::new(SUMMARY_TYPE))
        .with_description("Compliance totals of a report.")
        .attribute(computed("account", common::account()))
        .attribute(computed("score", common::compliance_score()))
        .attribute(computed("controls", common::compliance_stats()))
        .attribute(computed("evaluations", common::eval_stats()))
        .attribute(computed("resources", resource_summary))
}

fn assessment_with_stats() -> AttributeType {
    AttributeType::Block(common::eval_counts(
        BlockSchema::new()
            .attribute(text("assessment_id"))
            .attribute(text("assessment_type"))
            .attribute(text("assessment_method"))
            .attribute(text("assessment_description"))
            .attribute(AttributeSchema::new("parameter_count", AttributeType::Int))
            .attribute(AttributeSchema::new(
                "parameters",
                AttributeType::list(common::report_parameter()),
            )),
    ))
}

pub fn controls() -> ResourceSchema {
    let specification = AttributeType::Block(common::compliance_counts(
        BlockSchema::new()
            .attribute(text("control_specification_id"))
            .attribute(text("control_specification_description"))
            .attribute(text("component_id"))
            .attribute(text("component_name"))
            .attribute(text("environment"))
            .attribute(text("responsibility"))
            .attribute(AttributeSchema::new(
                "assessments",
                AttributeType::keyed_set("assessment_id", assessment_with_stats()),
            )),
    ));
    let control = AttributeType::Block(common::compliance_counts(
        BlockSchema::new()
            .attribute(text("id"))
            .attribute(text("control_library_id"))
            .attribute(text("control_library_version"))
            .attribute(text("control_name"))
            .attribute(text("control_description"))
            .attribute(text("control_category"))
            .attribute(AttributeSchema::new(
                "control_specifications",
                AttributeType::list(specification),
            )),
    ));

    report_inputs(ResourceSchema::new(CONTROLS_TYPE))
        .with_description("Per-control results of a report.")
        .attribute(text("control_id"))
        .attribute(text("control_name"))
        .attribute(text("control_description"))
        .attribute(text("control_category"))
        .attribute(text("status"))
        .attribute(text("sort"))
        .attribute(computed("home_account_id", AttributeType::String))
        .attribute(computed("controls", AttributeType::list(control)))
}

pub fn evaluations() -> ResourceSchema {
    let evaluation = AttributeType::Block(
        BlockSchema::new()
            .attribute(text("home_account_id"))
            .attribute(text("report_id"))
            .attribute(text("control_id"))
            .attribute(text("component_id"))
            .attribute(AttributeSchema::new(
                "assessment",
                AttributeType::Block(
                    BlockSchema::new()
                        .attribute(text("assessment_id"))
                        .attribute(text("assessment_type"))
                        .attribute(text("assessment_method"))
                        .attribute(text("assessment_description"))
                        .attribute(AttributeSchema::new("parameter_count", AttributeType::Int))
                        .attribute(AttributeSchema::new(
                            "parameters",
                            AttributeType::list(common::report_parameter()),
                        )),
                ),
            ))
            .attribute(AttributeSchema::new("evaluate_time", AttributeType::DateTime))
            .attribute(AttributeSchema::new(
                "target",
                AttributeType::Block(
                    BlockSchema::new()
                        .attribute(text("id"))
                        .attribute(text("account_id"))
                        .attribute(text("resource_crn"))
                        .attribute(text("resource_name"))
                        .attribute(text("service_name")),
                ),
            ))
            .attribute(text("status"))
            .attribute(text("reason"))
            .attribute(AttributeSchema::new(
                "details",
                AttributeType::Block(BlockSchema::new().attribute(AttributeSchema::new(
                    "properties",
                    AttributeType::list(AttributeType::Block(
                        BlockSchema::new()
                            .attribute(text("property"))
                            .attribute(text("property_description"))
                            .attribute(text("operator"))
                            .attribute(AttributeSchema::new("expected_value", AttributeType::Json))
                            .attribute(AttributeSchema::new("found_value", AttributeType::Json)),
                    )),
                ))),
            )),
    );

    report_inputs(ResourceSchema::new(EVALUATIONS_TYPE))
        .with_description("Every evaluation recorded in a report.")
        .attribute(text("assessment_id"))
        .attribute(text("component_id"))
        .attribute(text("target_id"))
        .attribute(text("target_name"))
        .attribute(text("status"))
        .attribute(computed("evaluations", AttributeType::list(evaluation)))
}

pub fn resources() -> ResourceSchema {
    let resource = AttributeType::Block(common::eval_counts(
        BlockSchema::new()
            .attribute(text("report_id"))
            .attribute(text("id"))
            .attribute(text("resource_name"))
            .attribute(text("component_id"))
            .attribute(text("environment"))
            .attribute(AttributeSchema::new("account", common::account()))
            .attribute(text("status")),
    ));

    report_inputs(ResourceSchema::new(RESOURCES_TYPE))
        .with_description("Every resource evaluated in a report.")
        .attribute(text("id").with_description("Only the resource with this ID."))
        .attribute(text("resource_name"))
        .attribute(text("account_id"))
        .attribute(text("component_id"))
        .attribute(text("status"))
        .attribute(text("sort"))
        .attribute(computed("resources", AttributeType::list(resource)))
}

pub fn tags() -> ResourceSchema {
    report_inputs(ResourceSchema::new(TAGS_TYPE))
        .with_description("Tags of the resources in a report.")
        .attribute(computed("tags", common::tags()))
}

pub fn violation_drift() -> ResourceSchema {
    let data_point = AttributeType::Block(
        BlockSchema::new()
            .attribute(text("report_id"))
            .attribute(text("report_group_id"))
            .attribute(AttributeSchema::new("scan_time", AttributeType::DateTime))
            .attribute(AttributeSchema::new("controls", common::compliance_stats())),
    );

    report_inputs(ResourceSchema::new(VIOLATION_DRIFT_TYPE))
        .with_description("Compliance over time up to a report.")
        .attribute(
            AttributeSchema::new("scan_time_duration", types::positive_int())
                .with_description("How many days of history to include."),
        )
        .attribute(computed("home_account_id", AttributeType::String))
        .attribute(computed("data_points", AttributeType::list(data_point)))
}

pub fn rule() -> ResourceSchema {
    report_inputs(ResourceSchema::new(RULE_TYPE))
        .with_description("A rule as evaluated in a report.")
        .attribute(text("rule_id").required().with_provider_name("id"))
        .attribute(computed("type", AttributeType::String))
        .attribute(computed("description", AttributeType::String))
        .attribute(computed("version", AttributeType::String))
        .attribute(computed("account_id", AttributeType::String))
        .attribute(computed("created_on", AttributeType::DateTime))
        .attribute(computed("created_by", AttributeType::String))
        .attribute(computed("updated_on", AttributeType::DateTime))
        .attribute(computed("updated_by", AttributeType::String))
        .attribute(computed("labels", types::string_list()))
        .attribute(super::rule::target_attribute().computed())
}
