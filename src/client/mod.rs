//! HTTP transport seam
//!
//! Every outbound call goes through [`HttpTransport::send`], which folds any
//! failure mode (timeout, refused connection, broken transfer) into a typed
//! [`CallError`]. Scenario checks consume `Result<ApiResponse, CallError>`.

pub mod http;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::utils::json_path;

pub use http::ApiClient;

/// Failure to obtain or decode a response
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CallError {
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    #[error("connection error: {0}")]
    Connect(String),

    #[error("request error: {0}")]
    Transport(String),

    #[error("invalid JSON body: {0}")]
    InvalidJson(String),
}

/// One outbound request, relative to the transport's base URL
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestSpec {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Path plus the raw, unencoded query string, e.g. `/posts?status=published`.
    /// Used for display and logging; the HTTP client encodes the real request.
    pub fn target(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

impl fmt::Display for RequestSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.target())
    }
}

/// A fully received HTTP response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, content_type: Option<&str>, body: &str) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.to_string(),
        }
    }

    /// Shorthand for a JSON response
    pub fn json_body(status: u16, body: &Value) -> Self {
        Self::new(status, Some("application/json"), &body.to_string())
    }

    pub fn json(&self) -> Result<Value, CallError> {
        serde_json::from_str(&self.body).map_err(|e| CallError::InvalidJson(e.to_string()))
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map_or(false, |ct| ct.trim().to_ascii_lowercase().starts_with("application/json"))
    }

    /// Short excerpt of the body for failure details
    pub fn snippet(&self) -> String {
        json_path::snippet(&self.body, 200)
    }
}

/// Anything that can carry a [`RequestSpec`] to the service under test
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send one request. Never panics; every failure is a `CallError`.
    async fn send(&self, request: &RequestSpec) -> Result<ApiResponse, CallError>;

    /// Base URL requests are resolved against
    fn base_url(&self) -> &str;
}
