use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Deserialize;

use storage::{CredentialStore, InMemoryStore, StorageError, StoredCredentials};

/// Access and refresh tokens, always replaced as a whole.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl fmt::Debug for TokenPair {
    // Token material stays out of logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair").finish_non_exhaustive()
    }
}

#[derive(Default)]
struct SessionState {
    tokens: Option<TokenPair>,
    username: Option<String>,
    remember: bool,
}

/// Holds the credentials of the signed-in user and mirrors them into exactly
/// one persistence scope: the durable store when the user asked to stay
/// signed in, the volatile store otherwise.
///
/// The in-memory state is authoritative. Persistence failures during token
/// rotation or sign-out are logged and swallowed so an HTTP retry or logout
/// never gets stuck on a storage hiccup; failures during sign-in are
/// surfaced, since the user explicitly asked for their choice to be recorded.
pub struct SessionManager {
    state: Mutex<SessionState>,
    durable: Arc<dyn CredentialStore>,
    volatile: Arc<dyn CredentialStore>,
}

impl SessionManager {
    #[must_use]
    pub fn new(durable: Arc<dyn CredentialStore>, volatile: Arc<dyn CredentialStore>) -> Self {
        Self {
            state: Mutex::new(SessionState::default()),
            durable,
            volatile,
        }
    }

    /// Both scopes backed by process-local memory. Useful in tests and for
    /// running without a database file.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryStore::new()),
        )
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.lock().tokens.as_ref().map(|pair| pair.access.clone())
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.lock().tokens.as_ref().map(|pair| pair.refresh.clone())
    }

    #[must_use]
    pub fn username(&self) -> Option<String> {
        self.lock().username.clone()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.lock().tokens.is_some()
    }

    #[must_use]
    pub fn remember(&self) -> bool {
        self.lock().remember
    }

    /// Installs a fresh token pair after authentication and records it in the
    /// scope matching `remember`. The other scope is wiped first so stale
    /// credentials from an earlier sign-in cannot resurface.
    ///
    /// # Errors
    ///
    /// Returns an error when the chosen scope cannot be written; the
    /// in-memory session is still installed in that case.
    pub async fn log_in(
        &self,
        tokens: TokenPair,
        username: &str,
        remember: bool,
    ) -> Result<(), StorageError> {
        let record = StoredCredentials {
            access: tokens.access.clone(),
            refresh: tokens.refresh.clone(),
            username: username.to_string(),
            remember,
        };

        {
            let mut state = self.lock();
            state.tokens = Some(tokens);
            state.username = Some(username.to_string());
            state.remember = remember;
        }

        if let Err(err) = self.durable.clear().await {
            tracing::warn!(error = %err, "failed to clear durable credential store");
        }
        if let Err(err) = self.volatile.clear().await {
            tracing::warn!(error = %err, "failed to clear volatile credential store");
        }

        let target = if remember { &self.durable } else { &self.volatile };
        target.save(&record).await
    }

    /// Swaps in a new access token after a successful refresh, keeping the
    /// refresh token. The pair is replaced in one step; no state where the
    /// new access token coexists with a missing refresh token is observable.
    pub async fn rotate_access(&self, access: String) {
        let persisted = {
            let mut state = self.lock();
            let Some(current) = state.tokens.take() else {
                tracing::debug!("access rotation with no active session; ignoring");
                return;
            };
            let rotated = TokenPair {
                access,
                refresh: current.refresh,
            };
            let record = state.username.as_ref().map(|username| StoredCredentials {
                access: rotated.access.clone(),
                refresh: rotated.refresh.clone(),
                username: username.clone(),
                remember: state.remember,
            });
            state.tokens = Some(rotated);
            (record, state.remember)
        };

        let (Some(record), remember) = persisted else {
            return;
        };
        let target = if remember { &self.durable } else { &self.volatile };
        if let Err(err) = target.save(&record).await {
            tracing::warn!(error = %err, "failed to persist rotated access token");
        }
    }

    /// Drops the session and wipes both persistence scopes. Never fails: a
    /// store that cannot be cleared is logged, and the in-memory session is
    /// gone regardless.
    pub async fn clear(&self) {
        {
            let mut state = self.lock();
            *state = SessionState::default();
        }

        if let Err(err) = self.durable.clear().await {
            tracing::warn!(error = %err, "failed to clear durable credential store");
        }
        if let Err(err) = self.volatile.clear().await {
            tracing::warn!(error = %err, "failed to clear volatile credential store");
        }
    }

    /// Rehydrates the session from persistence, preferring the durable scope.
    /// Returns whether a stored session was found.
    ///
    /// # Errors
    ///
    /// Returns an error when a store cannot be read.
    pub async fn restore(&self) -> Result<bool, StorageError> {
        let record = match self.durable.load().await? {
            Some(record) => Some(record),
            None => self.volatile.load().await?,
        };

        let Some(record) = record else {
            return Ok(false);
        };

        let mut state = self.lock();
        state.tokens = Some(TokenPair {
            access: record.access,
            refresh: record.refresh,
        });
        state.username = Some(record.username);
        state.remember = record.remember;
        Ok(true)
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("logged_in", &self.is_logged_in())
            .finish_non_exhaustive()
    }
}

// ─── TESTS ──────────────────────────────────────────────────────────────────
