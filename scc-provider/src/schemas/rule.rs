//! Rule schemas

use scc_core::schema::{AttributeSchema, AttributeType, BlockSchema, ResourceSchema, types};

use super::common;
use crate::models::required_config_codec;
use crate::validation;

pub const RESOURCE_TYPE: &str = "scc_rule";

fn target() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(AttributeSchema::new("service_name", AttributeType::String).required())
            .attribute(
                AttributeSchema::new("service_display_name", AttributeType::String)
                    .optional_computed(),
            )
            .attribute(AttributeSchema::new("resource_kind", AttributeType::String).required())
            .attribute(AttributeSchema::new(
                "additional_target_attributes",
                AttributeType::list(AttributeType::Block(
                    BlockSchema::new()
                        .attribute(AttributeSchema::new("name", AttributeType::String))
                        .attribute(AttributeSchema::new("operator", AttributeType::String))
                        .attribute(AttributeSchema::new("value", AttributeType::String)),
                )),
            )),
    )
}

/// Target of a rule; shared with report rules
pub fn target_attribute() -> AttributeSchema {
    AttributeSchema::new("target", target())
}

fn import() -> AttributeType {
    AttributeType::Block(BlockSchema::new().attribute(AttributeSchema::new(
        "parameters",
        AttributeType::list(AttributeType::Block(
            BlockSchema::new()
                .attribute(AttributeSchema::new("name", AttributeType::String))
                .attribute(AttributeSchema::new("display_name", AttributeType::String))
                .attribute(AttributeSchema::new("description", AttributeType::String))
                .attribute(AttributeSchema::new("type", AttributeType::String)),
        )),
    )))
}

pub fn resource() -> ResourceSchema {
    let schema = ResourceSchema::new(RESOURCE_TYPE)
        .with_description("A custom rule evaluated against resource configuration.")
        .attribute(common::instance_id())
        .attribute(common::remote_id("rule_id"))
        .attribute(AttributeSchema::new("account_id", AttributeType::String).computed())
        .attribute(AttributeSchema::new("description", AttributeType::String).required())
        .attribute(
            AttributeSchema::new("type", AttributeType::enumeration(validation::RULE_TYPES))
                .computed(),
        )
        .attribute(AttributeSchema::new("version", AttributeType::String).optional_computed())
        .attribute(AttributeSchema::new("import", import()))
        .attribute(target_attribute().required())
        .attribute(
            AttributeSchema::new(
                "required_config",
                AttributeType::Union(required_config_codec()),
            )
            .required()
            .with_description("Condition tree the target's configuration must satisfy."),
        )
        .attribute(AttributeSchema::new("labels", types::string_list()).optional_computed());
    common::audit_attributes(schema)
}

pub fn data_source() -> ResourceSchema {
    resource()
        .into_data_source(RESOURCE_TYPE)
        .attribute(common::instance_id())
        .attribute(
            AttributeSchema::new("rule_id", AttributeType::String)
                .required()
                .with_provider_name("id"),
        )
}
