//! Scope schemas

use scc_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use super::common;
use crate::models::scope_property_codec;

pub const RESOURCE_TYPE: &str = "scc_scope";
pub const COLLECTION_TYPE: &str = "scc_scope_collection";

pub fn resource() -> ResourceSchema {
    let schema = ResourceSchema::new(RESOURCE_TYPE)
        .with_description("A set of accounts or resource groups that profiles evaluate.")
        .attribute(common::instance_id())
        .attribute(common::remote_id("scope_id"))
        .attribute(AttributeSchema::new("name", AttributeType::String).required())
        .attribute(AttributeSchema::new("description", AttributeType::String))
        .attribute(
            AttributeSchema::new("environment", AttributeType::String)
                .required()
                .with_description("The cloud environment of the scope, e.g. ibm-cloud."),
        )
        .attribute(
            AttributeSchema::new(
                "properties",
                AttributeType::list(AttributeType::Union(scope_property_codec())),
            )
            .required()
            .with_description(
                "Each entry sets exactly one of scope_id, scope_type or exclusions.",
            ),
        )
        .attribute(AttributeSchema::new("account_id", AttributeType::String).computed())
        .attribute(AttributeSchema::new("attachment_count", AttributeType::Int).computed());
    common::audit_attributes(schema)
}

pub fn data_source() -> ResourceSchema {
    resource()
        .into_data_source(RESOURCE_TYPE)
        .attribute(common::instance_id())
        .attribute(
            AttributeSchema::new("scope_id", AttributeType::String)
                .required()
                .with_provider_name("id"),
        )
}

pub fn collection_data_source() -> ResourceSchema {
    ResourceSchema::new(COLLECTION_TYPE)
        .with_description("Every scope of an instance.")
        .attribute(common::instance_id())
        .attribute(
            AttributeSchema::new("scopes", AttributeType::list(common::block_of(resource())))
                .computed(),
        )
}
