//! Profile and profile attachment schemas

use scc_core::schema::{AttributeSchema, AttributeType, BlockSchema, ResourceSchema, types};

use super::common;
use crate::validation;

pub const RESOURCE_TYPE: &str = "scc_profile";
pub const COLLECTION_TYPE: &str = "scc_profiles";
pub const ATTACHMENT_TYPE: &str = "scc_profile_attachment";

fn profile_control() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(AttributeSchema::new("control_library_id", AttributeType::String).required())
            .attribute(AttributeSchema::new("control_id", AttributeType::String).required())
            .attribute(AttributeSchema::new("control_library_version", AttributeType::String).computed())
            .attribute(AttributeSchema::new("control_name", AttributeType::String).computed())
            .attribute(AttributeSchema::new("control_description", AttributeType::String).computed())
            .attribute(AttributeSchema::new("control_category", AttributeType::String).computed())
            .attribute(AttributeSchema::new("control_parent", AttributeType::String).computed())
            .attribute(AttributeSchema::new("control_requirement", AttributeType::Bool).computed())
            .attribute(AttributeSchema::new("control_docs", common::control_docs()).computed())
            .attribute(
                AttributeSchema::new("control_specifications_count", AttributeType::Int).computed(),
            )
            .attribute(
                AttributeSchema::new(
                    "control_specifications",
                    AttributeType::list(common::control_specification()),
                )
                .computed(),
            ),
    )
}

fn default_parameter() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(AttributeSchema::new("assessment_type", AttributeType::String))
            .attribute(AttributeSchema::new("assessment_id", AttributeType::String))
            .attribute(AttributeSchema::new("parameter_name", AttributeType::String))
            .attribute(AttributeSchema::new("parameter_default_value", AttributeType::String))
            .attribute(AttributeSchema::new("parameter_display_name", AttributeType::String))
            .attribute(AttributeSchema::new("parameter_type", AttributeType::String)),
    )
}

pub fn resource() -> ResourceSchema {
    let schema = ResourceSchema::new(RESOURCE_TYPE)
        .with_description("A set of controls that resources are evaluated against.")
        .attribute(common::instance_id())
        .attribute(common::remote_id("profile_id"))
        .attribute(AttributeSchema::new("profile_name", AttributeType::String).required())
        .attribute(
            AttributeSchema::new("profile_description", validation::description()).required(),
        )
        .attribute(
            AttributeSchema::new(
                "profile_type",
                AttributeType::enumeration(validation::PROFILE_TYPES),
            )
            .required(),
        )
        .attribute(
            AttributeSchema::new("profile_version", validation::version()).optional_computed(),
        )
        .attribute(AttributeSchema::new("version_group_label", AttributeType::String).computed())
        .attribute(AttributeSchema::new("latest", AttributeType::Bool).computed())
        .attribute(AttributeSchema::new("hierarchy_enabled", AttributeType::Bool).computed())
        .attribute(AttributeSchema::new("controls_count", AttributeType::Int).computed())
        .attribute(AttributeSchema::new("control_parents_count", AttributeType::Int).computed())
        .attribute(AttributeSchema::new("attachments_count", AttributeType::Int).computed())
        .attribute(
            AttributeSchema::new("controls", AttributeType::list(profile_control())).required(),
        )
        .attribute(
            AttributeSchema::new("default_parameters", AttributeType::list(default_parameter()))
                .optional_computed(),
        );
    common::audit_attributes(schema)
}

pub fn data_source() -> ResourceSchema {
    resource()
        .into_data_source(RESOURCE_TYPE)
        .attribute(common::instance_id())
        .attribute(
            AttributeSchema::new("profile_id", AttributeType::String)
                .required()
                .with_provider_name("id"),
        )
}

pub fn collection_data_source() -> ResourceSchema {
    ResourceSchema::new(COLLECTION_TYPE)
        .with_description("Every profile of an instance.")
        .attribute(common::instance_id())
        .attribute(AttributeSchema::new(
            "profile_type",
            AttributeType::enumeration(validation::PROFILE_TYPES),
        ))
        .attribute(
            AttributeSchema::new("profiles", AttributeType::list(common::block_of(resource())))
                .computed(),
        )
}

// =============================================================================
// Attachments
// =============================================================================

fn notifications() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(AttributeSchema::new("enabled", AttributeType::Bool))
            .attribute(AttributeSchema::new(
                "controls",
                AttributeType::Block(
                    BlockSchema::new()
                        .attribute(AttributeSchema::new("threshold_limit", AttributeType::Int))
                        .attribute(AttributeSchema::new("failed_control_ids", types::string_list())),
                ),
            )),
    )
}

fn attachment_parameter() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(AttributeSchema::new("assessment_id", AttributeType::String).required())
            .attribute(AttributeSchema::new("assessment_type", AttributeType::String))
            .attribute(AttributeSchema::new("parameter_name", AttributeType::String).required())
            .attribute(
                AttributeSchema::new("parameter_display_name", AttributeType::String).required(),
            )
            .attribute(AttributeSchema::new("parameter_type", AttributeType::String).required())
            .attribute(AttributeSchema::new("parameter_value", AttributeType::String).required()),
    )
}

fn last_scan() -> AttributeType {
    AttributeType::Block(
        BlockSchema::new()
            .attribute(AttributeSchema::new("id", AttributeType::String))
            .attribute(AttributeSchema::new("status", AttributeType::String))
            .attribute(AttributeSchema::new("time", AttributeType::DateTime)),
    )
}

pub fn attachment_resource() -> ResourceSchema {
    let schema = ResourceSchema::new(ATTACHMENT_TYPE)
        .with_description("Binds a profile to a scope and a scan schedule.")
        .attribute(common::instance_id())
        .attribute(
            AttributeSchema::new("profile_id", validation::uuid())
                .required()
                .with_description("The ID of the profile to attach."),
        )
        .attribute(common::remote_id("profile_attachment_id"))
        .attribute(AttributeSchema::new("account_id", AttributeType::String).computed())
        .attribute(AttributeSchema::new("name", AttributeType::String).required())
        .attribute(AttributeSchema::new("description", AttributeType::String))
        .attribute(
            AttributeSchema::new("scope", AttributeType::list(common::multi_cloud_scope()))
                .optional_computed(),
        )
        .attribute(
            AttributeSchema::new(
                "status",
                AttributeType::enumeration(validation::ATTACHMENT_STATUSES),
            )
            .required(),
        )
        .attribute(
            AttributeSchema::new(
                "schedule",
                AttributeType::enumeration(validation::ATTACHMENT_SCHEDULES),
            )
            .required(),
        )
        .attribute(AttributeSchema::new("notifications", notifications()))
        .attribute(AttributeSchema::new(
            "attachment_parameters",
            AttributeType::list(attachment_parameter()),
        ))
        .attribute(AttributeSchema::new("last_scan", last_scan()).computed())
        .attribute(AttributeSchema::new("next_scan_time", AttributeType::DateTime).computed());
    common::audit_attributes(schema)
}

pub fn attachment_data_source() -> ResourceSchema {
    attachment_resource()
        .into_data_source(ATTACHMENT_TYPE)
        .attribute(common::instance_id())
        .attribute(AttributeSchema::new("profile_id", validation::uuid()).required())
        .attribute(
            AttributeSchema::new("profile_attachment_id", AttributeType::String)
                .required()
                .with_provider_name("id"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use scc_core::resource::Value;
    use std::collections::HashMap;

    #[test]
    fn attachment_rejects_unknown_schedule() {
        let mut attrs: HashMap<String, Value> = [
            ("instance_id", "inst"),
            ("profile_id", "a0b1c2d3-e4f5-4a6b-8c7d-9e0f1a2b3c4d"),
            ("name", "nightly"),
            ("status", "enabled"),
            ("schedule", "daily"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::from(v)))
        .collect();
        assert!(attachment_resource().validate(&attrs).is_ok());

        attrs.insert("schedule".to_string(), Value::from("hourly"));
        assert!(attachment_resource().validate(&attrs).is_err());
    }

    #[test]
    fn profile_controls_only_send_references() {
        let schema = resource();
        let AttributeType::List(inner) = &schema.attributes["controls"].attr_type else {
            panic!("expected a list");
        };
        let AttributeType::Block(block) = inner.as_ref() else {
            panic!("expected a block");
        };
        assert!(block.attributes["control_id"].required);
        assert!(block.attributes["control_name"].is_read_only());
    }
}
