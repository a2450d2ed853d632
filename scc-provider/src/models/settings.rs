//! Instance settings models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-instance integrations. There is exactly one per service instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_notifications: Option<EventNotifications>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_storage: Option<ObjectStorage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventNotifications {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_crn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectStorage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_crn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<DateTime<Utc>>,
}
