//! Error types for the compliance provider

use thiserror::Error;

/// Result type alias for API calls
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// API-related errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed. Check the API key or bearer token.")]
    Unauthorized,

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Token exchange failed: {0}")]
    Auth(String),
}

impl ApiError {
    /// Map a non-success status and its body to an error
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = error_message(body);
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            _ => ApiError::Status { status, message },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Pull the human readable part out of an error body.
///
/// The service answers `{"errors":[{"code":..,"message":..}],"trace":..}`;
/// anything else is returned as is.
fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|json| {
        json.pointer("/errors/0/message")
            .or_else(|| json.get("message"))
            .or_else(|| json.get("errorMessage"))
            .and_then(|m| m.as_str())
    });
    match message {
        Some(m) => m.to_string(),
        None if body.is_empty() => "no response body".to_string(),
        None => body.to_string(),
    }
}

/// Provider configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No credentials: set 'api_key', 'bearer_token', IC_API_KEY or IBMCLOUD_API_KEY")]
    MissingCredentials,

    #[error("Attribute '{name}' must be {expected}")]
    InvalidAttribute { name: String, expected: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}
