//! Resource type definitions
//!
//! Every managed resource and data source the provider serves, with the
//! schema each one is validated and converted with.

use scc_core::provider::{ResourceKind, ResourceType};
use scc_core::schema::ResourceSchema;

use crate::schemas::{
    control_library, profile, provider_type, report, rule, scope, settings,
};

// =============================================================================
// Resource Type Definitions
// =============================================================================

macro_rules! define_resource_type {
    ($name:ident, $type_name:expr, $kind:ident, $schema:path $(,)?) => {
        pub struct $name;
        impl ResourceType for $name {
            fn name(&self) -> &'static str {
                $type_name
            }
            fn kind(&self) -> ResourceKind {
                ResourceKind::$kind
            }
            fn schema(&self) -> ResourceSchema {
                $schema()
            }
        }
    };
}

define_resource_type!(
    ControlLibraryType,
    control_library::RESOURCE_TYPE,
    Managed,
    control_library::resource,
);
define_resource_type!(ProfileType, profile::RESOURCE_TYPE, Managed, profile::resource);
define_resource_type!(
    ProfileAttachmentType,
    profile::ATTACHMENT_TYPE,
    Managed,
    profile::attachment_resource,
);
define_resource_type!(
    ProviderTypeInstanceType,
    provider_type::INSTANCE_TYPE,
    Managed,
    provider_type::instance_resource,
);
define_resource_type!(RuleType, rule::RESOURCE_TYPE, Managed, rule::resource);
define_resource_type!(ScopeType, scope::RESOURCE_TYPE, Managed, scope::resource);
define_resource_type!(InstanceSettingsType, settings::RESOURCE_TYPE, Managed, settings::resource);

// =============================================================================
// Data Source Definitions
// =============================================================================

define_resource_type!(
    ControlLibraryData,
    control_library::RESOURCE_TYPE,
    DataSource,
    control_library::data_source,
);
define_resource_type!(
    ControlLibrariesData,
    control_library::COLLECTION_TYPE,
    DataSource,
    control_library::collection_data_source,
);
define_resource_type!(ProfileData, profile::RESOURCE_TYPE, DataSource, profile::data_source);
define_resource_type!(
    ProfilesData,
    profile::COLLECTION_TYPE,
    DataSource,
    profile::collection_data_source,
);
define_resource_type!(
    ProfileAttachmentData,
    profile::ATTACHMENT_TYPE,
    DataSource,
    profile::attachment_data_source,
);
define_resource_type!(
    ProviderTypeData,
    provider_type::PROVIDER_TYPE,
    DataSource,
    provider_type::data_source,
);
define_resource_type!(
    ProviderTypesData,
    provider_type::COLLECTION_TYPE,
    DataSource,
    provider_type::collection_data_source,
);
define_resource_type!(
    ProviderTypeInstanceData,
    provider_type::INSTANCE_TYPE,
    DataSource,
    provider_type::instance_data_source,
);
define_resource_type!(RuleData, rule::RESOURCE_TYPE, DataSource, rule::data_source);
define_resource_type!(ScopeData, scope::RESOURCE_TYPE, DataSource, scope::data_source);
define_resource_type!(
    ScopeCollectionData,
    scope::COLLECTION_TYPE,
    DataSource,
    scope::collection_data_source,
);
define_resource_type!(
    InstanceSettingsData,
    settings::RESOURCE_TYPE,
    DataSource,
    settings::data_source,
);
define_resource_type!(LatestReportsData, report::LATEST_TYPE, DataSource, report::latest_reports);
define_resource_type!(ReportData, report::REPORT_TYPE, DataSource, report::report);
define_resource_type!(ReportSummaryData, report::SUMMARY_TYPE, DataSource, report::summary);
define_resource_type!(ReportControlsData, report::CONTROLS_TYPE, DataSource, report::controls);
define_resource_type!(
    ReportEvaluationsData,
    report::EVALUATIONS_TYPE,
    DataSource,
    report::evaluations,
);
define_resource_type!(ReportResourcesData, report::RESOURCES_TYPE, DataSource, report::resources);
define_resource_type!(ReportTagsData, report::TAGS_TYPE, DataSource, report::tags);
define_resource_type!(
    ReportViolationDriftData,
    report::VIOLATION_DRIFT_TYPE,
    DataSource,
    report::violation_drift,
);
define_resource_type!(ReportRuleData, report::RULE_TYPE, DataSource, report::rule);

/// Returns all resource types and data sources supported by this provider
pub fn resource_types() -> Vec<Box<dyn ResourceType>> {
    vec![
        Box::new(ControlLibraryType),
        Box::new(ProfileType),
        Box::new(ProfileAttachmentType),
        Box::new(ProviderTypeInstanceType),
        Box::new(RuleType),
        Box::new(ScopeType),
        Box::new(InstanceSettingsType),
        Box::new(ControlLibraryData),
        Box::new(ControlLibrariesData),
        Box::new(ProfileData),
        Box::new(ProfilesData),
        Box::new(ProfileAttachmentData),
        Box::new(ProviderTypeData),
        Box::new(ProviderTypesData),
        Box::new(ProviderTypeInstanceData),
        Box::new(RuleData),
        Box::new(ScopeData),
        Box::new(ScopeCollectionData),
        Box::new(InstanceSettingsData),
        Box::new(LatestReportsData),
        Box::new(ReportData),
        Box::new(ReportSummaryData),
        Box::new(ReportControlsData),
        Box::new(ReportEvaluationsData),
        Box::new(ReportResourcesData),
        Box::new(ReportTagsData),
        Box::new(ReportViolationDriftData),
        Box::new(ReportRuleData),
    ]
}

/// Schema of a resource type or data source
pub fn schema_for(name: &str, kind: ResourceKind) -> Option<ResourceSchema> {
    resource_types()
        .into_iter()
        .find(|t| t.name() == name && t.kind() == kind)
        .map(|t| t.schema())
}
