//! Provider configuration
//!
//! Built from the provider block's attributes, falling back to the
//! usual IBM Cloud environment variables.

use std::collections::HashMap;
use std::time::Duration;

use scc_core::resource::Value;

use crate::error::ConfigError;

pub const DEFAULT_REGION: &str = "us-south";
pub const DEFAULT_IAM_ENDPOINT: &str = "https://iam.cloud.ibm.com";
const DEFAULT_TIMEOUT_SECS: i64 = 60;

/// How requests are authenticated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Exchanged for a short-lived token at the IAM endpoint
    ApiKey(String),
    /// Used as is
    BearerToken(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SccConfig {
    pub credentials: Credentials,
    pub region: String,
    /// Overrides the regional service URL
    pub endpoint: Option<String>,
    pub iam_endpoint: String,
    pub timeout: Duration,
}

impl SccConfig {
    /// Read configuration from provider attributes and the process environment
    pub fn from_attributes(attributes: &HashMap<String, Value>) -> Result<Self, ConfigError> {
        Self::from_sources(attributes, |key| std::env::var(key).ok())
    }

    /// Read configuration with an explicit environment lookup
    pub fn from_sources(
        attributes: &HashMap<String, Value>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let attr = |key: &str| -> Result<Option<String>, ConfigError> {
            match attributes.get(key) {
                None => Ok(None),
                Some(Value::String(s)) if s.is_empty() => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(_) => Err(ConfigError::InvalidAttribute {
                    name: key.to_string(),
                    expected: "a string".to_string(),
                }),
            }
        };
        let env = |keys: &[&str]| keys.iter().find_map(|k| env(*k).filter(|v| !v.is_empty()));

        let credentials = match (attr("bearer_token")?, attr("api_key")?) {
            (Some(token), _) => Credentials::BearerToken(token),
            (None, Some(key)) => Credentials::ApiKey(key),
            (None, None) => env(&["IC_API_KEY", "IBMCLOUD_API_KEY"])
                .map(Credentials::ApiKey)
                .ok_or(ConfigError::MissingCredentials)?,
        };

        let region = attr("region")?
            .or_else(|| env(&["IC_REGION", "IBMCLOUD_REGION"]))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        let endpoint = attr("endpoint")?.or_else(|| env(&["IBMCLOUD_SCC_API_ENDPOINT"]));
        let iam_endpoint = attr("iam_endpoint")?
            .or_else(|| env(&["IBMCLOUD_IAM_API_ENDPOINT"]))
            .unwrap_or_else(|| DEFAULT_IAM_ENDPOINT.to_string());

        let timeout_secs = match attributes.get("timeout") {
            None => DEFAULT_TIMEOUT_SECS,
            Some(Value::Int(n)) if *n > 0 => *n,
            Some(_) => {
                return Err(ConfigError::InvalidAttribute {
                    name: "timeout".to_string(),
                    expected: "a positive number of seconds".to_string(),
                });
            }
        };

        Ok(Self {
            credentials,
            region,
            endpoint,
            iam_endpoint: iam_endpoint.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs as u64),
        })
    }

    /// Base URL of the compliance API
    pub fn service_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.compliance.cloud.ibm.com", self.region),
        }
    }
}
