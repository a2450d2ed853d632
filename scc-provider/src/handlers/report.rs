//! Report data sources
//!
//! Single reports and their rules are addressed by composite keys. The
//! drill-downs that filter or sort change with every scan, so they get a
//! fresh timestamp identifier on each read.

use scc_core::identifier::{CompositeKey, timestamp_identifier};
use scc_core::provider::ProviderResult;
use scc_core::resource::{Resource, State, Value};
use serde_json::json;

use super::{api_failure, data_state, input, validate};
use crate::client::api::ReportFilter;
use crate::keys::{ReportKey, ReportRuleKey};
use crate::provider::SccProvider;
use crate::schemas::report as schema;

fn report_key(resource: &Resource) -> ProviderResult<ReportKey> {
    Ok(ReportKey {
        instance_id: input(resource, "instance_id")?.to_string(),
        report_id: input(resource, "report_id")?.to_string(),
    })
}

/// Query filters taken from the same-named arguments
fn filter(resource: &Resource, names: &[&str]) -> ReportFilter {
    names.iter().fold(ReportFilter::new(), |filter, name| {
        filter.with(name, resource.get_string(name))
    })
}

impl SccProvider {
    pub(crate) async fn read_latest_reports_data(
        &self,
        resource: &Resource,
    ) -> ProviderResult<State> {
        let schema = schema::latest_reports();
        validate(&resource.id, &schema, &resource.attributes)?;
        let instance_id = input(resource, "instance_id")?;

        let latest = self
            .client()
            .get_latest_reports(instance_id, resource.get_string("sort"))
            .await
            .map_err(|e| api_failure(&resource.id, "get latest reports", e))?;

        data_state(resource, &schema, &latest, timestamp_identifier())
    }

    pub(crate) async fn read_report_data(&self, resource: &Resource) -> ProviderResult<State> {
        let schema = schema::report();
        validate(&resource.id, &schema, &resource.attributes)?;
        let key = report_key(resource)?;

        let report = self
            .client()
            .get_report(&key.instance_id, &key.report_id)
            .await
            .map_err(|e| api_failure(&resource.id, "get report", e))?;

        data_state(resource, &schema, &report, key.encode())
    }

    pub(crate) async fn read_report_summary_data(
        &self,
        resource: &Resource,
    ) -> ProviderResult<State> {
        let schema = schema::summary();
        validate(&resource.id, &schema, &resource.attributes)?;
        let key = report_key(resource)?;

        let summary = self
            .client()
            .get_report_summary(&key.instance_id, &key.report_id)
            .await
            .map_err(|e| api_failure(&resource.id, "get report summary", e))?;

        data_state(resource, &schema, &summary, key.encode())
    }

    pub(crate) async fn read_report_controls_data(
        &self,
        resource: &Resource,
    ) -> ProviderResult<State> {
        let schema = schema::controls();
        validate(&resource.id, &schema, &resource.attributes)?;
        let key = report_key(resource)?;
        let filter = filter(
            resource,
            &[
                "control_id",
                "control_name",
                "control_description",
                "control_category",
                "status",
                "sort",
            ],
        );

        let controls = self
            .client()
            .get_report_controls(&key.instance_id, &key.report_id, &filter)
            .await
            .map_err(|e| api_failure(&resource.id, "get report controls", e))?;

        data_state(resource, &schema, &controls, timestamp_identifier())
    }

    pub(crate) async fn read_report_evaluations_data(
        &self,
        resource: &Resource,
    ) -> ProviderResult<State> {
        let schema = schema::evaluations();
        validate(&resource.id, &schema, &resource.attributes)?;
        let key = report_key(resource)?;
        let filter = filter(
            resource,
            &[
                "assessment_id",
                "component_id",
                "target_id",
                "target_name",
                "status",
            ],
        );

        let evaluations = self
            .client()
            .list_report_evaluations(&key.instance_id, &key.report_id, &filter)
            .await
            .map_err(|e| api_failure(&resource.id, "list report evaluations", e))?;

        data_state(
            resource,
            &schema,
            &json!({ "evaluations": evaluations }),
            timestamp_identifier(),
        )
    }

    pub(crate) async fn read_report_resources_data(
        &self,
        resource: &Resource,
    ) -> ProviderResult<State> {
        let schema = schema::resources();
        validate(&resource.id, &schema, &resource.attributes)?;
        let key = report_key(resource)?;
        let filter = filter(
            resource,
            &[
                "id",
                "resource_name",
                "account_id",
                "component_id",
                "status",
                "sort",
            ],
        );

        let resources = self
            .client()
            .list_report_resources(&key.instance_id, &key.report_id, &filter)
            .await
            .map_err(|e| api_failure(&resource.id, "list report resources", e))?;

        data_state(
            resource,
            &schema,
            &json!({ "resources": resources }),
            timestamp_identifier(),
        )
    }

    pub(crate) async fn read_report_tags_data(&self, resource: &Resource) -> ProviderResult<State> {
        let schema = schema::tags();
        validate(&resource.id, &schema, &resource.attributes)?;
        let key = report_key(resource)?;

        let tags = self
            .client()
            .get_report_tags(&key.instance_id, &key.report_id)
            .await
            .map_err(|e| api_failure(&resource.id, "get report tags", e))?;

        data_state(resource, &schema, &tags, key.encode())
    }

    pub(crate) async fn read_report_violation_drift_data(
        &self,
        resource: &Resource,
    ) -> ProviderResult<State> {
        let schema = schema::violation_drift();
        validate(&resource.id, &schema, &resource.attributes)?;
        let key = report_key(resource)?;
        let duration = resource
            .attributes
            .get("scan_time_duration")
            .and_then(Value::as_int);

        let drift = self
            .client()
            .get_report_violation_drift(&key.instance_id, &key.report_id, duration)
            .await
            .map_err(|e| api_failure(&resource.id, "get report violation drift", e))?;

        data_state(resource, &schema, &drift, timestamp_identifier())
    }

    pub(crate) async fn read_report_rule_data(&self, resource: &Resource) -> ProviderResult<State> {
        let schema = schema::rule();
        validate(&resource.id, &schema, &resource.attributes)?;
        let key = ReportRuleKey {
            instance_id: input(resource, "instance_id")?.to_string(),
            report_id: input(resource, "report_id")?.to_string(),
            rule_id: input(resource, "rule_id")?.to_string(),
        };

        let rule = self
            .client()
            .get_report_rule(&key.instance_id, &key.report_id, &key.rule_id)
            .await
            .map_err(|e| api_failure(&resource.id, "get report rule", e))?;

        data_state(resource, &schema, &rule, key.encode())
    }
}
