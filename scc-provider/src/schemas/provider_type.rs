//! Provider type and provider type instance schemas

use scc_core::schema::{AttributeSchema, AttributeType, BlockSchema, ResourceSchema};

use super::common;

pub const PROVIDER_TYPE: &str = "scc_provider_type";
pub const COLLECTION_TYPE: &str = "scc_provider_types";
pub const INSTANCE_TYPE: &str = "scc_provider_type_instance";

fn json_map() -> AttributeType {
    AttributeType::map(AttributeType::Json)
}

fn provider_type() -> ResourceSchema {
    ResourceSchema::new(PROVIDER_TYPE)
        .with_description("A pluggable source of compliance data.")
        .attribute(common::instance_id())
        .attribute(common::remote_id("provider_type_id"))
        .attribute(AttributeSchema::new("type", AttributeType::String).computed())
        .attribute(AttributeSchema::new("name", AttributeType::String).computed())
        .attribute(AttributeSchema::new("description", AttributeType::String).computed())
        .attribute(AttributeSchema::new("s2s_enabled", AttributeType::Bool).computed())
        .attribute(AttributeSchema::new("instance_limit", AttributeType::Int).computed())
        .attribute(AttributeSchema::new("mode", AttributeType::String).computed())
        .attribute(AttributeSchema::new("data_type", AttributeType::String).computed())
        .attribute(AttributeSchema::new("icon", AttributeType::String).computed())
        .attribute(
            AttributeSchema::new(
                "label",
                AttributeType::Block(
                    BlockSchema::new()
                        .attribute(AttributeSchema::new("text", AttributeType::String))
                        .attribute(AttributeSchema::new("tip", AttributeType::String)),
                ),
            )
            .computed(),
        )
        .attribute(
            AttributeSchema::new("attributes", json_map())
                .computed()
                .with_description("Attribute definitions, each rendered as JSON text."),
        )
        .attribute(AttributeSchema::new("created_at", AttributeType::DateTime).computed())
        .attribute(AttributeSchema::new("updated_at", AttributeType::DateTime).computed())
}

pub fn data_source() -> ResourceSchema {
    provider_type().attribute(
        AttributeSchema::new("provider_type_id", AttributeType::String)
            .required()
            .with_provider_name("id"),
    )
}

pub fn collection_data_source() -> ResourceSchema {
    ResourceSchema::new(COLLECTION_TYPE)
        .with_description("Every provider type available to an instance.")
        .attribute(common::instance_id())
        .attribute(
            AttributeSchema::new(
                "provider_types",
                AttributeType::list(common::block_of(provider_type())),
            )
            .computed(),
        )
}

pub fn instance_resource() -> ResourceSchema {
    ResourceSchema::new(INSTANCE_TYPE)
        .with_description("A configured instance of a provider type.")
        .attribute(common::instance_id())
        .attribute(
            AttributeSchema::new("provider_type_id", AttributeType::String)
                .required()
                .path_parameter(),
        )
        .attribute(common::remote_id("provider_type_instance_id"))
        .attribute(AttributeSchema::new("type", AttributeType::String).computed())
        .attribute(AttributeSchema::new("name", AttributeType::String).required())
        .attribute(
            AttributeSchema::new("attributes", json_map())
                .with_description("Provider-type specific settings."),
        )
        .attribute(AttributeSchema::new("created_at", AttributeType::DateTime).computed())
        .attribute(AttributeSchema::new("updated_at", AttributeType::DateTime).computed())
}

pub fn instance_data_source() -> ResourceSchema {
    instance_resource()
        .into_data_source(INSTANCE_TYPE)
        .attribute(common::instance_id())
        .attribute(
            AttributeSchema::new("provider_type_id", AttributeType::String)
                .required()
                .path_parameter(),
        )
        .attribute(
            AttributeSchema::new("provider_type_instance_id", AttributeType::String)
                .required()
                .with_provider_name("id"),
        )
}
