//! HTTP transport abstraction.
//!
//! The client talks to the service through [`Transport`] so the retry logic
//! can be exercised without a network. [`ReqwestTransport`] is the real
//! implementation, built on the blocking `reqwest` client.

use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        HttpResponse {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 5xx, or the 0 status some proxies report for dropped connections
    pub fn is_server_error(&self) -> bool {
        self.status == 0 || self.status >= 500
    }
}

/// Failure before any response arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The per-call deadline passed
    Timeout,
    /// Connection, DNS or TLS failure
    Network(String),
}

/// One HTTP round trip with a deadline.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError>;

    fn post_json(
        &self,
        url: &str,
        body: &Value,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError>;
}

/// Bearer-authenticated transport over `reqwest`.
pub struct ReqwestTransport {
    client: Client,
    api_key: String,
}

impl ReqwestTransport {
    pub fn new(api_key: impl Into<String>) -> Self {
        ReqwestTransport {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    fn finish(
        result: reqwest::Result<reqwest::blocking::Response>,
    ) -> Result<HttpResponse, TransportError> {
        let response = result.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(classify)?;
        Ok(HttpResponse { status, body })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        Self::finish(
            self.client
                .get(url)
                .bearer_auth(&self.api_key)
                .timeout(timeout)
                .send(),
        )
    }

    fn post_json(
        &self,
        url: &str,
        body: &Value,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        Self::finish(
            self.client
                .post(url)
                .bearer_auth(&self.api_key)
                .json(body)
                .timeout(timeout)
                .send(),
        )
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(err.to_string())
    }
}
