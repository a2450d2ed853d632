//! Composite identifiers of the provider's resources
//!
//! Every remote object lives inside a service instance, so the instance id
//! always comes first.

use scc_core::composite_key;

composite_key!(ControlLibraryKey {
    instance_id,
    control_library_id,
});

composite_key!(ProfileKey {
    instance_id,
    profile_id,
});

composite_key!(AttachmentKey {
    instance_id,
    profile_id,
    attachment_id,
});

composite_key!(ProviderTypeKey {
    instance_id,
    provider_type_id,
});

composite_key!(ProviderTypeInstanceKey {
    instance_id,
    provider_type_id,
    provider_type_instance_id,
});

composite_key!(RuleKey { instance_id, rule_id });

composite_key!(ScopeKey {
    instance_id,
    scope_id,
});

composite_key!(
    /// Settings exist once per instance
    SettingsKey { instance_id }
);

composite_key!(ReportKey {
    instance_id,
    report_id,
});

composite_key!(ReportRuleKey {
    instance_id,
    report_id,
    rule_id,
});
