//! Nested blocks shared by several schemas

use scc_core::schema::{AttributeSchema, AttributeType, BlockSchema, ResourceSchema, types};

/// Service instance the resource lives in; travels in the request path
pub fn instance_id() -> AttributeSchema {
    AttributeSchema::new("instance_id", AttributeType::String)
        .required()
        .path_parameter()
        .with_description("The ID of the Security and Compliance Center instance.")
}

/// Server-assigned id exposed under a descriptive local name
pub fn remote_id(name: &str) -> AttributeSchema {
    AttributeSchema::new(name, AttributeType::String)
        .computed()
        .with_provider_name("id")
}

/// The usual created/updated audit attributes
pub fn audit_attributes(schema: ResourceSchema) -> ResourceSchema {
    schema
        .attribute(AttributeSchema::new("created_on", AttributeType::DateTime).computed())
        .attribute(AttributeSchema::new("created_by", AttributeType::String).computed())
        .attribute(AttributeSchema::new("updated_on", AttributeType::DateTime).computed())
        .attribute(AttributeSchema::new("updated_by", AttributeType::String).computed())
}

/// Turn a resource schema into the element block of a collection,
/// dropping path parameters
pub fn block_of(schema: ResourceSchema) -> AttributeType {
    let mut block = BlockSchema::new();
    for attr in schema.attributes.into_values() {
        if !attr.path_parameter {
            block = block.attribute(attr);
        }
    }
    AttributeType::Block(block)
}

// =============================================================================
// Controls
// =============================================================================

pub fn parameter_info() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(AttributeSchema::new("parameter_name", AttributeType::String))
            .attribute(AttributeSchema::new("parameter_display_name", AttributeType::String))
            .attribute(AttributeSchema::new("parameter_type", AttributeType::String)),
    )
}

pub fn assessment() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(
                AttributeSchema::new("assessment_id", AttributeType::String)
                    .with_description("The ID of the assessment."),
            )
            .attribute(AttributeSchema::new("assessment_method", AttributeType::String))
            .attribute(AttributeSchema::new("assessment_type", AttributeType::String))
            .attribute(AttributeSchema::new("assessment_description", AttributeType::String))
            .attribute(AttributeSchema::new("parameter_count", AttributeType::Int).computed())
            .attribute(AttributeSchema::new(
                "parameters",
                AttributeType::list(parameter_info()),
            )),
    )
}

/// Assessments are unordered on the remote side; one entry per assessment id
pub fn assessments() -> AttributeType {
    AttributeType::keyed_set("assessment_id", assessment())
}

pub fn control_specification() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(AttributeSchema::new("control_specification_id", AttributeType::String))
            .attribute(AttributeSchema::new("responsibility", AttributeType::String))
            .attribute(AttributeSchema::new("component_id", AttributeType::String))
            .attribute(AttributeSchema::new("component_name", AttributeType::String))
            .attribute(AttributeSchema::new("environment", AttributeType::String))
            .attribute(AttributeSchema::new(
                "control_specification_description",
                AttributeType::String,
            ))
            .attribute(AttributeSchema::new("assessments_count", AttributeType::Int).computed())
            .attribute(AttributeSchema::new("assessments", assessments())),
    )
}

pub fn control_docs() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(AttributeSchema::new("control_docs_id", AttributeType::String))
            .attribute(AttributeSchema::new("control_docs_type", AttributeType::String)),
    )
}

// =============================================================================
// Scopes
// =============================================================================

/// Scope of a profile attachment
pub fn multi_cloud_scope() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(AttributeSchema::new("environment", AttributeType::String))
            .attribute(AttributeSchema::new(
                "properties",
                AttributeType::list(AttributeType::Block(
                    BlockSchema::new()
                        .attribute(AttributeSchema::new("name", AttributeType::String))
                        .attribute(AttributeSchema::new("value", AttributeType::Json)),
                )),
            )),
    )
}

// =============================================================================
// Reports
// =============================================================================

pub fn account() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(AttributeSchema::new("id", AttributeType::String))
            .attribute(AttributeSchema::new("name", AttributeType::String))
            .attribute(AttributeSchema::new("type", AttributeType::String)),
    )
}

fn count(name: &str) -> AttributeSchema {
    AttributeSchema::new(name, AttributeType::Int)
}

/// Control-level compliance counters
pub fn compliance_stats() -> AttributeType {
    AttributeType::Block(compliance_counts(BlockSchema::new()))
}

pub fn compliance_counts(block: BlockSchema) -> BlockSchema {
    block
        .attribute(AttributeSchema::new("status", AttributeType::String))
        .attribute(count("total_count"))
        .attribute(count("compliant_count"))
        .attribute(count("not_compliant_count"))
        .attribute(count("unable_to_perform_count"))
        .attribute(count("user_evaluation_required_count"))
}

/// Evaluation counters
pub fn eval_stats() -> AttributeType {
    AttributeType::Block(eval_counts(
        BlockSchema::new().attribute(AttributeSchema::new("status", AttributeType::String)),
    ))
}

pub fn eval_counts(block: BlockSchema) -> BlockSchema {
    block
        .attribute(count("total_count"))
        .attribute(count("pass_count"))
        .attribute(count("failure_count"))
        .attribute(count("error_count"))
        .attribute(count("completed_count"))
}

pub fn compliance_score() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(count("passed"))
            .attribute(count("total_count"))
            .attribute(count("percent")),
    )
}

pub fn tags() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(AttributeSchema::new("user", types::string_list()))
            .attribute(AttributeSchema::new("access", types::string_list()))
            .attribute(AttributeSchema::new("service", types::string_list())),
    )
}

pub fn report_parameter() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(AttributeSchema::new("parameter_name", AttributeType::String))
            .attribute(AttributeSchema::new("parameter_display_name", AttributeType::String))
            .attribute(AttributeSchema::new("parameter_type", AttributeType::String))
            .attribute(AttributeSchema::new("parameter_value", AttributeType::Json)),
    )
}
