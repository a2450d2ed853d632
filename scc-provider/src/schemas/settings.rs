//! Instance settings schemas

use scc_core::schema::{AttributeSchema, AttributeType, BlockSchema, ResourceSchema};

use super::common;

pub const RESOURCE_TYPE: &str = "scc_instance_settings";

fn event_notifications() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(
                AttributeSchema::new("instance_crn", AttributeType::String)
                    .with_description("CRN of the Event Notifications instance."),
            )
            .attribute(AttributeSchema::new("updated_on", AttributeType::DateTime).computed())
            .attribute(AttributeSchema::new("source_id", AttributeType::String).computed())
            .attribute(AttributeSchema::new("source_description", AttributeType::String))
            .attribute(AttributeSchema::new("source_name", AttributeType::String)),
    )
}

fn object_storage() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(AttributeSchema::new("instance_crn", AttributeType::String))
            .attribute(AttributeSchema::new("bucket", AttributeType::String))
            .attribute(AttributeSchema::new("bucket_location", AttributeType::String).computed())
            .attribute(AttributeSchema::new("bucket_endpoint", AttributeType::String).computed())
            .attribute(AttributeSchema::new("updated_on", AttributeType::DateTime).computed()),
    )
}

pub fn resource() -> ResourceSchema {
    ResourceSchema::new(RESOURCE_TYPE)
        .with_description("Event Notifications and Object Storage integrations of an instance.")
        .attribute(common::instance_id())
        .attribute(AttributeSchema::new("event_notifications", event_notifications()))
        .attribute(AttributeSchema::new("object_storage", object_storage()))
}

pub fn data_source() -> ResourceSchema {
    resource()
        .into_data_source(RESOURCE_TYPE)
        .attribute(common::instance_id())
}
