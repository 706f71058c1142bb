use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;

use quizdesk_core::model::{LangCode, Me};

use crate::api::ApiClient;
use crate::auth::TokenPair;
use crate::error::{ApiError, AuthError};
use crate::user_service::UserService;

const USER_PATH: &str = "user/";
const PASSWORD_CHANGE_PATH: &str = "user/password-change/";

/// New-account payload for the registration endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub language: LangCode,
    pub password: String,
}

#[derive(serde::Deserialize)]
struct IssuedTokens {
    access: String,
    refresh: String,
}

/// Sign-in, sign-out and the account endpoints around them.
pub struct AuthService {
    api: Arc<ApiClient>,
    users: Arc<UserService>,
}

impl AuthService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>, users: Arc<UserService>) -> Self {
        Self { api, users }
    }

    /// Exchanges credentials for a token pair, installs the session in the
    /// scope matching `remember`, and loads the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error on bad credentials, an unreachable backend, or a
    /// credential store that cannot be written.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        remember: bool,
    ) -> Result<Me, AuthError> {
        let response = self
            .api
            .send(
                Method::POST,
                self.api.token_endpoint().clone(),
                Some(serde_json::json!({
                    "username": username,
                    "password": password,
                })),
            )
            .await?;

        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
                detail: response
                    .body
                    .get("detail")
                    .and_then(serde_json::Value::as_str)
                    .map(ToString::to_string),
            }
            .into());
        }

        let issued: IssuedTokens =
            serde_json::from_value(response.body).map_err(ApiError::Decode)?;
        self.api
            .session()
            .log_in(
                TokenPair {
                    access: issued.access,
                    refresh: issued.refresh,
                },
                username,
                remember,
            )
            .await?;

        let me = self.users.get_me().await?;
        Ok(me)
    }

    /// Drops the local session and both persistence scopes. Purely local;
    /// the backend keeps no server-side session to end.
    pub async fn logout(&self) {
        self.api.session().clear().await;
        self.users.forget();
    }

    /// Rehydrates a persisted session and refetches the profile. Returns the
    /// profile when a stored session was found and still works.
    ///
    /// # Errors
    ///
    /// Returns an error when storage cannot be read or the profile fetch
    /// fails for a reason other than an expired session.
    pub async fn restore_session(&self) -> Result<Option<Me>, AuthError> {
        if !self.api.session().restore().await? {
            return Ok(None);
        }
        match self.users.get_me().await {
            Ok(me) => Ok(Some(me)),
            // Stored tokens that no longer work just mean signing in again.
            Err(ApiError::SessionExpired(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// # Errors
    ///
    /// Returns an error when the backend rejects the registration.
    pub async fn register(&self, payload: &RegisterPayload) -> Result<Me, AuthError> {
        Ok(self.api.post_json(USER_PATH, payload).await?)
    }

    /// # Errors
    ///
    /// Returns an error when the backend is unreachable; an unknown email is
    /// not reported to the caller.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let response = self
            .api
            .send(
                Method::POST,
                self.api.password_reset_endpoint().clone(),
                Some(serde_json::json!({ "email": email })),
            )
            .await?;

        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
                detail: None,
            }
            .into());
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error when the old password is wrong or the session has
    /// expired.
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let _: serde_json::Value = self
            .api
            .post_json(
                PASSWORD_CHANGE_PATH,
                &serde_json::json!({
                    "old_password": old_password,
                    "new_password": new_password,
                }),
            )
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.api.session().is_logged_in()
    }

    #[must_use]
    pub fn username(&self) -> Option<String> {
        self.api.session().username()
    }
}
