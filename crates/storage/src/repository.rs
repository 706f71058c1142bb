use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quizdesk_core::model::LangCode;

/// Errors surfaced by client-side storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of a logged-in session's credentials.
///
/// The whole record is written and cleared as one unit so a stored access
/// token can never outlive the refresh token it was issued with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub access: String,
    pub refresh: String,
    pub username: String,
    pub remember: bool,
}

/// Storage contract for the credential pair.
///
/// Two scopes exist at runtime: a durable store that survives restarts
/// ("remember me") and a volatile store living only as long as the process.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch the stored credentials, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn load(&self) -> Result<Option<StoredCredentials>, StorageError>;

    /// Replace the stored credentials with `credentials`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be written.
    async fn save(&self, credentials: &StoredCredentials) -> Result<(), StorageError>;

    /// Remove any stored credentials. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Storage contract for small client preferences.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Fetch the preferred UI language, if one was saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn preferred_language(&self) -> Result<Option<LangCode>, StorageError>;

    /// Persist the preferred UI language.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be written.
    async fn set_preferred_language(&self, language: LangCode) -> Result<(), StorageError>;
}

/// Simple in-memory store for the volatile credential scope and for tests.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    credentials: Arc<Mutex<Option<StoredCredentials>>>,
    language: Arc<Mutex<Option<LangCode>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn load(&self) -> Result<Option<StoredCredentials>, StorageError> {
        let guard = self
            .credentials
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save(&self, credentials: &StoredCredentials) -> Result<(), StorageError> {
        let mut guard = self
            .credentials
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(credentials.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self
            .credentials
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for InMemoryStore {
    async fn preferred_language(&self) -> Result<Option<LangCode>, StorageError> {
        let guard = self
            .language
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(*guard)
    }

    async fn set_preferred_language(&self, language: LangCode) -> Result<(), StorageError> {
        let mut guard = self
            .language
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(language);
        Ok(())
    }
}

/// Aggregates the client-side stores behind trait objects for easy backend
/// swapping.
#[derive(Clone)]
pub struct ClientStore {
    pub credentials: Arc<dyn CredentialStore>,
    pub preferences: Arc<dyn PreferenceStore>,
}

impl ClientStore {
    #[must_use]
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        let credentials: Arc<dyn CredentialStore> = Arc::new(store.clone());
        let preferences: Arc<dyn PreferenceStore> = Arc::new(store);
        Self {
            credentials,
            preferences,
        }
    }
}
