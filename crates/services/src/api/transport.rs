use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde_json::Value;

use crate::error::TransportError;

/// A single outgoing API call, fully described before it hits the wire.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

/// Status and decoded JSON body of a completed exchange.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Seam between the request pipeline and the actual HTTP stack. Tests script
/// responses through this trait instead of standing up a server.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Production transport backed by `reqwest`, with a bounded per-request wait.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns an error when the underlying client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut builder = self.client.request(request.method, request.url);
        if let Some(token) = request.bearer.as_deref() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|err| {
            if err.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Http(err)
            }
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(TransportError::Http)?;

        // Empty 204s and non-JSON error pages decode to Null; callers that
        // care only about the status still get a well-formed response.
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        Ok(ApiResponse { status, body })
    }
}
