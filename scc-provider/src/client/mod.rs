//! Compliance API client
//!
//! [`SccClient`] exposes one async method per remote operation. The wire
//! is behind the [`Transport`] trait so tests can swap in
//! [`mock::MockTransport`] instead of an HTTP server.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::SccConfig;
use crate::error::{ApiError, ApiResult};

pub mod api;
pub mod http;
#[cfg(test)]
pub mod mock;
pub mod pagination;

pub use http::{HttpTransport, IamAuthenticator};

/// One request against the compliance API; `path` is relative to the service URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a query parameter only when a value is given
    pub fn with_optional_query(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.with_query(key, v),
            _ => self,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body<T: Serialize>(mut self, body: &T) -> ApiResult<Self> {
        let json = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to encode body: {}", e)))?;
        self.body = Some(json);
        Ok(self)
    }
}

/// Raw response; header names are lower-case
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
        })
    }
}

/// Sends requests to the service
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one request. Non-success statuses are returned, not raised.
    async fn execute(&self, request: ApiRequest) -> ApiResult<ApiResponse>;
}

/// Typed client for the compliance API
#[derive(Clone)]
pub struct SccClient {
    transport: Arc<dyn Transport>,
}

impl SccClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Build an HTTP client from provider configuration
    pub fn from_config(config: &SccConfig) -> ApiResult<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Send a request, turning non-success statuses into errors
    pub async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let method = request.method.clone();
        let path = request.path.clone();
        debug!("{} {}", method, path);

        let response = self.transport.execute(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            debug!("{} {} returned {}", method, path, response.status);
            Err(ApiError::from_status(response.status, &response.body))
        }
    }

    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        self.send(request).await?.json()
    }
}

/// Percent-encode one path segment, including any `/` it carries
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Path of an instance-scoped operation; `rest` must be encoded already
pub(crate) fn instance_path(instance_id: &str, rest: &str) -> String {
    format!("/instances/{}/v3{}", segment(instance_id), rest)
}
