//! In-memory transport for tests
//!
//! Routes are matched by method and path (and optionally one query
//! parameter). Each route answers with its queued responses in order; the
//! last one repeats. Unrouted requests get a 404.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use tokio::sync::Mutex;

use super::{ApiRequest, ApiResponse, SccClient, Transport};
use crate::error::ApiResult;

struct Route {
    method: Method,
    path: String,
    query: Option<(String, String)>,
    responses: VecDeque<ApiResponse>,
}

impl Route {
    fn matches(&self, request: &ApiRequest) -> bool {
        self.method == request.method
            && self.path == request.path
            && self
                .query
                .as_ref()
                .is_none_or(|(k, v)| request.query.iter().any(|(qk, qv)| qk == k && qv == v))
    }
}

#[derive(Clone, Default)]
pub struct MockTransport {
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with a JSON body
    pub async fn on(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: serde_json::Value,
    ) -> &Self {
        self.push(method, path, None, response(status, body, &[])).await
    }

    /// Answer `method path` with a JSON body and response headers
    pub async fn on_with_headers(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: serde_json::Value,
        headers: &[(&str, &str)],
    ) -> &Self {
        self.push(method, path, None, response(status, body, headers))
            .await
    }

    /// Answer only requests carrying `key=value` in their query
    pub async fn on_query(
        &self,
        method: Method,
        path: &str,
        query: (&str, &str),
        status: u16,
        body: serde_json::Value,
    ) -> &Self {
        let query = Some((query.0.to_string(), query.1.to_string()));
        self.push(method, path, query, response(status, body, &[]))
            .await
    }

    async fn push(
        &self,
        method: Method,
        path: &str,
        query: Option<(String, String)>,
        response: ApiResponse,
    ) -> &Self {
        let mut routes = self.routes.lock().await;
        if let Some(route) = routes
            .iter_mut()
            .find(|r| r.method == method && r.path == path && r.query == query)
        {
            route.responses.push_back(response);
        } else {
            routes.push(Route {
                method,
                path: path.to_string(),
                query,
                responses: VecDeque::from([response]),
            });
        }
        self
    }

    /// Every request executed so far
    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().await.clone()
    }

    /// Requests executed with the given method and path
    pub async fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    pub fn client(&self) -> SccClient {
        SccClient::new(Arc::new(self.clone()))
    }
}

fn response(status: u16, body: serde_json::Value, headers: &[(&str, &str)]) -> ApiResponse {
    ApiResponse {
        status,
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
            .collect(),
        body: if body.is_null() {
            String::new()
        } else {
            body.to_string()
        },
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        self.requests.lock().await.push(request.clone());

        let mut routes = self.routes.lock().await;
        // Query-specific routes win over plain ones
        let index = routes
            .iter()
            .position(|r| r.query.is_some() && r.matches(&request))
            .or_else(|| routes.iter().position(|r| r.matches(&request)));

        let Some(index) = index else {
            return Ok(response(
                404,
                serde_json::json!({
                    "errors": [{"code": "not_found", "message": format!("no route for {} {}", request.method, request.path)}]
                }),
                &[],
            ));
        };
        let route = &mut routes[index];
        let next = if route.responses.len() > 1 {
            route.responses.pop_front()
        } else {
            route.responses.front().cloned()
        };
        Ok(next.unwrap_or_default())
    }
}
