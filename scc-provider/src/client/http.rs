//! HTTP transport and IAM authentication

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{ApiRequest, ApiResponse, Transport};
use crate::config::{Credentials, SccConfig};
use crate::error::{ApiError, ApiResult};

const USER_AGENT: &str = concat!("scc-provider/", env!("CARGO_PKG_VERSION"));

/// Tokens are refreshed this long before they expire
const EXPIRY_BUFFER_MINUTES: i64 = 5;

const APIKEY_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Exchanges an API key for short-lived IAM access tokens
pub struct IamAuthenticator {
    http: HttpClient,
    token_url: String,
    api_key: String,
    token: Arc<RwLock<Option<IamToken>>>,
}

#[derive(Debug, Clone)]
struct IamToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl IamToken {
    fn is_fresh(&self) -> bool {
        self.expires_at - chrono::Duration::minutes(EXPIRY_BUFFER_MINUTES) > Utc::now()
    }
}

impl IamAuthenticator {
    pub fn new(http: HttpClient, iam_endpoint: &str, api_key: impl Into<String>) -> Self {
        Self {
            http,
            token_url: format!("{}/identity/token", iam_endpoint.trim_end_matches('/')),
            api_key: api_key.into(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Current access token, exchanging the API key when needed
    pub async fn access_token(&self) -> ApiResult<String> {
        {
            let cached = self.token.read().await;
            if let Some(token) = cached.as_ref()
                && token.is_fresh()
            {
                return Ok(token.access_token.clone());
            }
        }

        let mut cached = self.token.write().await;
        // Another task may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref()
            && token.is_fresh()
        {
            return Ok(token.access_token.clone());
        }
        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    async fn request_token(&self) -> ApiResult<IamToken> {
        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
            /// Unix timestamp
            expiration: Option<i64>,
            /// Seconds
            expires_in: Option<i64>,
        }

        debug!("POST {}", self.token_url);
        let response = self
            .http
            .post(&self.token_url)
            .header("Accept", "application/json")
            .form(&[
                ("grant_type", APIKEY_GRANT_TYPE),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Auth(format!("Failed to read token response: {}", e)))?;
        if !status.is_success() {
            return Err(ApiError::Auth(format!(
                "IAM returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::Auth(format!("Failed to parse token response: {}", e)))?;
        let expires_at = match (parsed.expiration, parsed.expires_in) {
            (Some(at), _) => DateTime::from_timestamp(at, 0),
            (None, Some(secs)) => Some(Utc::now() + chrono::Duration::seconds(secs)),
            (None, None) => None,
        }
        .ok_or_else(|| ApiError::Auth("Token response has no expiry".to_string()))?;

        Ok(IamToken {
            access_token: parsed.access_token,
            expires_at,
        })
    }
}

enum Authenticator {
    Bearer(String),
    Iam(IamAuthenticator),
}

impl Authenticator {
    async fn token(&self) -> ApiResult<String> {
        match self {
            Authenticator::Bearer(token) => Ok(token.clone()),
            Authenticator::Iam(iam) => iam.access_token().await,
        }
    }
}

/// [`Transport`] over HTTPS
pub struct HttpTransport {
    http: HttpClient,
    base_url: String,
    auth: Authenticator,
}

impl HttpTransport {
    pub fn new(config: &SccConfig) -> ApiResult<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let auth = match &config.credentials {
            Credentials::BearerToken(token) => Authenticator::Bearer(token.clone()),
            Credentials::ApiKey(key) => {
                Authenticator::Iam(IamAuthenticator::new(http.clone(), &config.iam_endpoint, key))
            }
        };

        Ok(Self {
            http,
            base_url: config.service_url(),
            auth,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let token = self.auth.token().await?;

        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self
            .http
            .request(request.method, &url)
            .bearer_auth(token)
            .header("Accept", "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ApiError::from)?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read response: {}", e)))?;

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}
