use std::sync::{Arc, Mutex, PoisonError};

use quizdesk_core::model::{LangCode, Me};

use crate::api::ApiClient;
use crate::error::ApiError;

const ME_PATH: &str = "user/me/";

/// Profile of the signed-in user, fetched once and cached until sign-out.
pub struct UserService {
    api: Arc<ApiClient>,
    current: Mutex<Option<Me>>,
}

impl UserService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            current: Mutex::new(None),
        }
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, Option<Me>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetches the profile from the backend and refreshes the cache.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the session has expired.
    pub async fn get_me(&self) -> Result<Me, ApiError> {
        let me: Me = self.api.get_json(ME_PATH).await?;
        *self.cache() = Some(me.clone());
        Ok(me)
    }

    /// Last fetched profile, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<Me> {
        self.cache().clone()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.cache().as_ref().is_some_and(Me::is_admin)
    }

    /// Persists a new interface language on the profile.
    ///
    /// # Errors
    ///
    /// Returns an error when the update is rejected.
    pub async fn update_language(&self, language: LangCode) -> Result<Me, ApiError> {
        let me: Me = self
            .api
            .patch_json(ME_PATH, &serde_json::json!({ "language": language }))
            .await?;
        *self.cache() = Some(me.clone());
        Ok(me)
    }

    /// Drops the cached profile on sign-out.
    pub fn forget(&self) {
        *self.cache() = None;
    }
}
