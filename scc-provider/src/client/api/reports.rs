use crate::client::{ApiRequest, SccClient, instance_path, segment};
use crate::error::ApiResult;
use crate::models::{
    LatestReports, Report, ReportControls, ReportEvaluation, ReportResource, ReportRule,
    ReportSummary, ReportTags, ReportViolationDrift,
};

/// Optional query filters of the report drill-down operations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportFilter {
    params: Vec<(String, String)>,
}

impl ReportFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key=value` when a non-empty value is given
    pub fn with(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.params.push((key.to_string(), v.to_string()));
        }
        self
    }

    fn apply(&self, mut request: ApiRequest) -> ApiRequest {
        request.query.extend(self.params.iter().cloned());
        request
    }
}

fn report_path(instance_id: &str, report_id: &str, rest: &str) -> String {
    instance_path(instance_id, &format!("/reports/{}{}", segment(report_id), rest))
}

impl SccClient {
    pub async fn get_latest_reports(
        &self,
        instance_id: &str,
        sort: Option<&str>,
    ) -> ApiResult<LatestReports> {
        let request = ApiRequest::get(instance_path(instance_id, "/reports/latest"))
            .with_optional_query("sort", sort);
        self.send_json(request).await
    }

    pub async fn get_report(&self, instance_id: &str, report_id: &str) -> ApiResult<Report> {
        self.send_json(ApiRequest::get(report_path(instance_id, report_id, "")))
            .await
    }

    pub async fn get_report_summary(
        &self,
        instance_id: &str,
        report_id: &str,
    ) -> ApiResult<ReportSummary> {
        self.send_json(ApiRequest::get(report_path(instance_id, report_id, "/summary")))
            .await
    }

    pub async fn get_report_controls(
        &self,
        instance_id: &str,
        report_id: &str,
        filter: &ReportFilter,
    ) -> ApiResult<ReportControls> {
        let request = filter.apply(ApiRequest::get(report_path(
            instance_id,
            report_id,
            "/controls",
        )));
        self.send_json(request).await
    }

    pub async fn list_report_evaluations(
        &self,
        instance_id: &str,
        report_id: &str,
        filter: &ReportFilter,
    ) -> ApiResult<Vec<ReportEvaluation>> {
        let request = filter.apply(ApiRequest::get(report_path(
            instance_id,
            report_id,
            "/evaluations",
        )));
        self.collect_pages(request, "evaluations").await
    }

    pub async fn list_report_resources(
        &self,
        instance_id: &str,
        report_id: &str,
        filter: &ReportFilter,
    ) -> ApiResult<Vec<ReportResource>> {
        let request = filter.apply(ApiRequest::get(report_path(
            instance_id,
            report_id,
            "/resources",
        )));
        self.collect_pages(request, "resources").await
    }

    pub async fn get_report_tags(
        &self,
        instance_id: &str,
        report_id: &str,
    ) -> ApiResult<ReportTags> {
        self.send_json(ApiRequest::get(report_path(instance_id, report_id, "/tags")))
            .await
    }

    pub async fn get_report_violation_drift(
        &self,
        instance_id: &str,
        report_id: &str,
        scan_time_duration: Option<i64>,
    ) -> ApiResult<ReportViolationDrift> {
        let mut request = ApiRequest::get(report_path(instance_id, report_id, "/violations_drift"));
        if let Some(duration) = scan_time_duration {
            request = request.with_query("scan_time_duration", duration);
        }
        self.send_json(request).await
    }

    pub async fn get_report_rule(
        &self,
        instance_id: &str,
        report_id: &str,
        rule_id: &str,
    ) -> ApiResult<ReportRule> {
        let rest = format!("/rules/{}", segment(rule_id));
        self.send_json(ApiRequest::get(report_path(instance_id, report_id, &rest)))
            .await
    }
}
