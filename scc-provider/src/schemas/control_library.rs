//! Control library schemas

use scc_core::schema::{AttributeSchema, AttributeType, BlockSchema, ResourceSchema, types};

use super::common;
use crate::validation;

pub const RESOURCE_TYPE: &str = "scc_control_library";
pub const COLLECTION_TYPE: &str = "scc_control_libraries";

fn library_control() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(AttributeSchema::new("control_name", AttributeType::String).required())
            .attribute(AttributeSchema::new("control_id", AttributeType::String).optional_computed())
            .attribute(AttributeSchema::new("control_description", AttributeType::String))
            .attribute(AttributeSchema::new("control_category", AttributeType::String))
            .attribute(AttributeSchema::new("control_parent", AttributeType::String))
            .attribute(AttributeSchema::new("control_tags", types::string_list()))
            .attribute(AttributeSchema::new(
                "control_specifications",
                AttributeType::list(common::control_specification()),
            ))
            .attribute(AttributeSchema::new("control_docs", common::control_docs()))
            .attribute(AttributeSchema::new("control_requirement", AttributeType::Bool))
            .attribute(AttributeSchema::new("status", AttributeType::String)),
    )
}

pub fn resource() -> ResourceSchema {
    let schema = ResourceSchema::new(RESOURCE_TYPE)
        .with_description("A versioned collection of compliance controls.")
        .attribute(common::instance_id())
        .attribute(common::remote_id("control_library_id"))
        .attribute(AttributeSchema::new("account_id", AttributeType::String).computed())
        .attribute(
            AttributeSchema::new("control_library_name", validation::library_name())
                .required()
                .with_description("The control library name."),
        )
        .attribute(
            AttributeSchema::new("control_library_description", validation::description())
                .required(),
        )
        .attribute(
            AttributeSchema::new(
                "control_library_type",
                AttributeType::enumeration(validation::CONTROL_LIBRARY_TYPES),
            )
            .required(),
        )
        .attribute(
            AttributeSchema::new("version_group_label", validation::uuid()).optional_computed(),
        )
        .attribute(
            AttributeSchema::new("control_library_version", validation::version())
                .optional_computed(),
        )
        .attribute(AttributeSchema::new("latest", AttributeType::Bool).computed())
        .attribute(AttributeSchema::new("hierarchy_enabled", AttributeType::Bool).computed())
        .attribute(AttributeSchema::new("controls_count", AttributeType::Int).computed())
        .attribute(AttributeSchema::new("control_parents_count", AttributeType::Int).computed())
        .attribute(
            AttributeSchema::new("controls", AttributeType::list(library_control()))
                .required()
                .with_description("The list of controls in the library."),
        );
    common::audit_attributes(schema)
}

pub fn data_source() -> ResourceSchema {
    resource()
        .into_data_source(RESOURCE_TYPE)
        .attribute(common::instance_id())
        .attribute(
            AttributeSchema::new("control_library_id", AttributeType::String)
                .required()
                .with_provider_name("id"),
        )
}

pub fn collection_data_source() -> ResourceSchema {
    ResourceSchema::new(COLLECTION_TYPE)
        .with_description("Every control library of an instance.")
        .attribute(common::instance_id())
        .attribute(AttributeSchema::new(
            "control_library_type",
            AttributeType::enumeration(validation::CONTROL_LIBRARY_TYPES),
        ))
        .attribute(
            AttributeSchema::new(
                "control_libraries",
                AttributeType::list(common::block_of(resource())),
            )
            .computed(),
        )
}
