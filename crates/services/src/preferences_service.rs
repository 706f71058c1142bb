use std::sync::Arc;

use quizdesk_core::model::{LangCode, Me};

use storage::{PreferenceStore, StorageError};

/// Small locally persisted settings, currently just the interface language.
pub struct PreferencesService {
    store: Arc<dyn PreferenceStore>,
}

impl PreferencesService {
    #[must_use]
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    /// Saved language, defaulting to English when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be read.
    pub async fn preferred_language(&self) -> Result<LangCode, StorageError> {
        Ok(self.store.preferred_language().await?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns an error when the store cannot be written.
    pub async fn set_preferred_language(&self, language: LangCode) -> Result<(), StorageError> {
        self.store.set_preferred_language(language).await
    }

    /// Mirrors the language from a freshly fetched profile so the login
    /// screen comes up in the right language next time.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be written.
    pub async fn sync_from_profile(&self, me: &Me) -> Result<(), StorageError> {
        self.store.set_preferred_language(me.language).await
    }
}
