use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::error::Error as StdError;
use std::time::Duration;

use super::{ApiResponse, CallError, HttpTransport, RequestSpec};

/// reqwest-backed transport with a fixed per-request timeout
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn classify(&self, err: reqwest::Error) -> CallError {
        if err.is_timeout() {
            CallError::Timeout(self.timeout.as_millis() as u64)
        } else if err.is_connect() {
            CallError::Connect(error_chain(&err))
        } else {
            CallError::Transport(error_chain(&err))
        }
    }
}

#[async_trait]
impl HttpTransport for ApiClient {
    async fn send(&self, request: &RequestSpec) -> Result<ApiResponse, CallError> {
        let url = self.url_for(&request.path);
        log::debug!("{} {} query={:?}", request.method, url, request.query);

        let mut req = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let res = req.send().await.map_err(|e| {
            let err = self.classify(e);
            log::warn!("{} failed: {}", request, err);
            err
        })?;

        let status = res.status().as_u16();
        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = res.text().await.map_err(|e| {
            let err = self.classify(e);
            log::warn!("{} body read failed: {}", request, err);
            err
        })?;

        log::debug!("{} -> {} ({} bytes)", request, status, body.len());

        Ok(ApiResponse {
            status,
            content_type,
            body,
        })
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// reqwest's top-level message omits the root cause; append the source chain
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
