use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use services::error::TransportError;
use services::{ApiClient, ApiConfig, ApiRequest, ApiResponse, HttpTransport, SessionManager};

/// Transport that replays scripted responses in order and records every
/// request, so tests can assert on the exact wire traffic.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn push(&self, status: StatusCode, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse { status, body }));
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.calls.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted request")
    }
}

pub fn scripted_client(transport: Arc<ScriptedTransport>) -> Arc<ApiClient> {
    let config = ApiConfig::new(reqwest::Url::parse("http://backend.test/api/").unwrap());
    let session = Arc::new(SessionManager::in_memory());
    Arc::new(ApiClient::new(config, session, transport).unwrap())
}
