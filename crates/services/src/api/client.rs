use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::SessionManager;
use crate::error::ApiError;

use super::transport::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const TOKEN_PATH: &str = "token/";
const TOKEN_REFRESH_PATH: &str = "token/refresh/";
const PASSWORD_RESET_PATH: &str = "user/password-reset/";

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Reads `QUIZDESK_API_BASE_URL`, falling back to the local development
    /// backend. A missing trailing slash is added so path joins behave.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured URL does not parse.
    pub fn from_env() -> Result<Self, ApiError> {
        let mut raw = env::var("QUIZDESK_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Ok(Self::new(Url::parse(&raw)?))
    }
}

/// HTTP client with the authentication pipeline every backend call goes
/// through:
///
/// 1. requests to the API (except the auth endpoints themselves) carry the
///    current access token as a bearer header;
/// 2. a 401 on such a request triggers at most one token refresh, then at
///    most one retry with the new token;
/// 3. a missing refresh token or a failed refresh clears the session, after
///    which the caller must sign in again.
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    session: Arc<SessionManager>,
    config: ApiConfig,
    token_endpoint: Url,
    refresh_endpoint: Url,
    password_reset_endpoint: Url,
}

#[derive(serde::Deserialize)]
struct RefreshedAccess {
    access: String,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error when the auth endpoints cannot be derived from the
    /// configured base URL.
    pub fn new(
        config: ApiConfig,
        session: Arc<SessionManager>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ApiError> {
        let token_endpoint = config.base_url.join(TOKEN_PATH)?;
        let refresh_endpoint = config.base_url.join(TOKEN_REFRESH_PATH)?;
        let password_reset_endpoint = config.base_url.join(PASSWORD_RESET_PATH)?;
        Ok(Self {
            transport,
            session,
            config,
            token_endpoint,
            refresh_endpoint,
            password_reset_endpoint,
        })
    }

    /// Client backed by the production `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed or the
    /// base URL is unusable.
    pub fn with_default_transport(
        config: ApiConfig,
        session: Arc<SessionManager>,
    ) -> Result<Self, ApiError> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout)?);
        Self::new(config, session, transport)
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    #[must_use]
    pub fn token_endpoint(&self) -> &Url {
        &self.token_endpoint
    }

    #[must_use]
    pub fn password_reset_endpoint(&self) -> &Url {
        &self.password_reset_endpoint
    }

    /// Resolves a path relative to the API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the joined URL does not parse.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.config.base_url.join(path)?)
    }

    fn is_api_url(&self, url: &Url) -> bool {
        url.as_str().starts_with(self.config.base_url.as_str())
    }

    fn is_auth_url(&self, url: &Url) -> bool {
        *url == self.token_endpoint
            || *url == self.refresh_endpoint
            || *url == self.password_reset_endpoint
    }

    /// Executes a request through the authentication pipeline. Non-API URLs
    /// and the auth endpoints pass through untouched.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend is unreachable or a token refresh
    /// fails. Non-success statuses other than a handled 401 are returned as
    /// part of the response, not as errors.
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<ApiResponse, ApiError> {
        let protected = self.is_api_url(&url) && !self.is_auth_url(&url);
        let bearer = if protected {
            self.session.access_token()
        } else {
            None
        };

        let response = self
            .transport
            .execute(ApiRequest {
                method: method.clone(),
                url: url.clone(),
                body: body.clone(),
                bearer,
            })
            .await?;

        if response.status != StatusCode::UNAUTHORIZED || !protected {
            return Ok(response);
        }

        // 401 on a protected call: at most one refresh, at most one retry.
        let Some(refresh) = self.session.refresh_token() else {
            tracing::debug!(%url, "401 with no refresh token; clearing session");
            self.session.clear().await;
            return Ok(response);
        };

        match self.refresh_access(refresh).await {
            Ok(()) => {
                tracing::debug!(%url, "access token refreshed; retrying request");
                let retry = ApiRequest {
                    method,
                    url,
                    body,
                    bearer: self.session.access_token(),
                };
                Ok(self.transport.execute(retry).await?)
            }
            Err(err) => {
                tracing::info!(%url, error = %err, "token refresh failed; clearing session");
                self.session.clear().await;
                Err(ApiError::SessionExpired(Box::new(err)))
            }
        }
    }

    async fn refresh_access(&self, refresh: String) -> Result<(), ApiError> {
        let response = self
            .transport
            .execute(ApiRequest {
                method: Method::POST,
                url: self.refresh_endpoint.clone(),
                body: Some(serde_json::json!({ "refresh": refresh })),
                bearer: None,
            })
            .await?;

        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
                detail: detail_from(&response.body),
            });
        }

        let refreshed: RefreshedAccess = serde_json::from_value(response.body)?;
        self.session.rotate_access(refreshed.access).await;
        Ok(())
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let response = self.send(method, url, body).await?;
        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
                detail: detail_from(&response.body),
            });
        }
        Ok(serde_json::from_value(response.body)?)
    }

    /// GET a JSON resource at a path under the API base.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or a body
    /// that does not match `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        self.get_json_at(url).await
    }

    /// GET a JSON resource at an already-built URL (for query parameters).
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::get_json`].
    pub async fn get_json_at<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        self.request_json(Method::GET, url, None).await
    }

    /// POST a JSON body and decode the JSON reply.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::get_json`].
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        self.request_json(Method::POST, url, Some(serde_json::to_value(body)?))
            .await
    }

    /// PUT a JSON body and decode the JSON reply.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::get_json`].
    pub async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        self.request_json(Method::PUT, url, Some(serde_json::to_value(body)?))
            .await
    }

    /// PATCH a JSON body and decode the JSON reply.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::get_json`].
    pub async fn patch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        self.request_json(Method::PATCH, url, Some(serde_json::to_value(body)?))
            .await
    }

    /// DELETE a resource, expecting an empty success reply.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.endpoint(path)?;
        let response = self.send(Method::DELETE, url, None).await?;
        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
                detail: detail_from(&response.body),
            });
        }
        Ok(())
    }
}

/// Pulls the human-readable `detail` field DRF-style backends put in error
/// bodies.
fn detail_from(body: &Value) -> Option<String> {
    body.get("detail")
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

// ─── TESTS ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::auth::TokenPair;
    use crate::error::TransportError;

    use super::*;

    /// Transport that replays a scripted list of responses and records every
    /// request it saw.
    #[derive(Default)]
    struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
        calls: Mutex<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        fn push_status(&self, status: StatusCode, body: Value) {
            self.responses
                .lock()
                .unwrap()
                .push_back(Ok(ApiResponse { status, body }));
        }

        fn push_failure(&self, failure: TransportError) {
            self.responses.lock().unwrap().push_back(Err(failure));
        }

        fn calls(&self) -> Vec<ApiRequest> {
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

    fn base_url() -> Url {
        Url::parse("http://backend.test/api/").unwrap()
    }

    async fn client_with_session(
        transport: Arc<ScriptedTransport>,
        tokens: Option<(&str, &str)>,
    ) -> ApiClient {
        let session = Arc::new(SessionManager::in_memory());
        if let Some((access, refresh)) = tokens {
            session
                .log_in(
                    TokenPair {
                        access: access.to_string(),
                        refresh: refresh.to_string(),
                    },
                    "alex",
                    false,
                )
                .await
                .unwrap();
        }
        ApiClient::new(ApiConfig::new(base_url()), session, transport).unwrap()
    }

    #[tokio::test]
    async fn protected_request_carries_bearer_token() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_status(StatusCode::OK, serde_json::json!({"ok": true}));
        let client = client_with_session(transport.clone(), Some(("a1", "r1"))).await;

        let url = client.endpoint("quiz/").unwrap();
        client.send(Method::GET, url, None).await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].bearer.as_deref(), Some("a1"));
    }

    #[tokio::test]
    async fn auth_endpoint_request_carries_no_bearer() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_status(StatusCode::OK, serde_json::json!({}));
        let client = client_with_session(transport.clone(), Some(("a1", "r1"))).await;

        let url = client.token_endpoint().clone();
        client.send(Method::POST, url, None).await.unwrap();

        assert_eq!(transport.calls()[0].bearer, None);
    }

    #[tokio::test]
    async fn non_api_request_passes_through_unchanged() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_status(StatusCode::UNAUTHORIZED, Value::Null);
        let client = client_with_session(transport.clone(), Some(("a1", "r1"))).await;

        let url = Url::parse("http://elsewhere.test/resource").unwrap();
        let response = client.send(Method::GET, url, None).await.unwrap();

        // No bearer, no refresh attempt; the 401 comes straight back.
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].bearer, None);
        assert!(client.session().is_logged_in());
    }

    #[tokio::test]
    async fn unauthorized_triggers_single_refresh_and_single_retry() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_status(StatusCode::UNAUTHORIZED, Value::Null);
        transport.push_status(StatusCode::OK, serde_json::json!({"access": "a2"}));
        transport.push_status(StatusCode::OK, serde_json::json!({"ok": true}));
        let client = client_with_session(transport.clone(), Some(("a1", "r1"))).await;

        let url = client.endpoint("quiz/").unwrap();
        let response = client.send(Method::GET, url.clone(), None).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        let calls = transport.calls();
        assert_eq!(calls.len(), 3);

        // Refresh call goes to the refresh endpoint with the refresh token.
        assert_eq!(calls[1].method, Method::POST);
        assert!(calls[1].url.as_str().ends_with("token/refresh/"));
        assert_eq!(calls[1].body, Some(serde_json::json!({"refresh": "r1"})));
        assert_eq!(calls[1].bearer, None);

        // Retry repeats the original request with the new access token.
        assert_eq!(calls[2].url, url);
        assert_eq!(calls[2].bearer.as_deref(), Some("a2"));
        assert_eq!(client.session().access_token().as_deref(), Some("a2"));
        assert_eq!(client.session().refresh_token().as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn retry_that_fails_again_is_not_retried_twice() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_status(StatusCode::UNAUTHORIZED, Value::Null);
        transport.push_status(StatusCode::OK, serde_json::json!({"access": "a2"}));
        transport.push_status(StatusCode::UNAUTHORIZED, Value::Null);
        let client = client_with_session(transport.clone(), Some(("a1", "r1"))).await;

        let url = client.endpoint("quiz/").unwrap();
        let response = client.send(Method::GET, url, None).await.unwrap();

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn unauthorized_without_refresh_token_clears_session() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_status(StatusCode::UNAUTHORIZED, Value::Null);
        let client = client_with_session(transport.clone(), None).await;

        let url = client.endpoint("quiz/").unwrap();
        let response = client.send(Method::GET, url, None).await.unwrap();

        // The original 401 propagates; no refresh or retry happened.
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(transport.calls().len(), 1);
        assert!(!client.session().is_logged_in());
    }

    #[tokio::test]
    async fn rejected_refresh_clears_session_and_propagates() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_status(StatusCode::UNAUTHORIZED, Value::Null);
        transport.push_status(
            StatusCode::UNAUTHORIZED,
            serde_json::json!({"detail": "Token is invalid or expired"}),
        );
        let client = client_with_session(transport.clone(), Some(("a1", "r1"))).await;

        let url = client.endpoint("quiz/").unwrap();
        let err = client.send(Method::GET, url, None).await.unwrap_err();

        assert!(matches!(err, ApiError::SessionExpired(_)));
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(transport.calls().len(), 2);
        assert!(!client.session().is_logged_in());
        assert!(client.session().access_token().is_none());
    }

    #[tokio::test]
    async fn unreachable_refresh_clears_session_and_propagates() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_status(StatusCode::UNAUTHORIZED, Value::Null);
        transport.push_failure(TransportError::Timeout);
        let client = client_with_session(transport.clone(), Some(("a1", "r1"))).await;

        let url = client.endpoint("quiz/").unwrap();
        let err = client.send(Method::GET, url, None).await.unwrap_err();

        match err {
            ApiError::SessionExpired(inner) => {
                assert!(matches!(*inner, ApiError::Unreachable(TransportError::Timeout)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!client.session().is_logged_in());
    }

    #[tokio::test]
    async fn request_json_maps_error_statuses() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push_status(
            StatusCode::NOT_FOUND,
            serde_json::json!({"detail": "Not found."}),
        );
        let client = client_with_session(transport.clone(), Some(("a1", "r1"))).await;

        let err = client
            .get_json::<Value>("quiz/99/summary/")
            .await
            .unwrap_err();

        match err {
            ApiError::Status { status, detail } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(detail.as_deref(), Some("Not found."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
