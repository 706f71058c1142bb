use std::sync::Arc;

use serde::Serialize;

use quizdesk_core::model::{Domain, DomainId};

use crate::api::ApiClient;
use crate::error::ApiError;

const DOMAIN_PATH: &str = "domain/";

/// Writable fields of a domain.
#[derive(Debug, Clone, Serialize)]
pub struct DomainWrite {
    pub name: String,
    pub description: String,
}

/// CRUD over top-level content domains. Admin-only on the backend side.
pub struct DomainService {
    api: Arc<ApiClient>,
}

impl DomainService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    fn item_path(id: DomainId) -> String {
        format!("{DOMAIN_PATH}{id}/")
    }

    /// # Errors
    ///
    /// Returns an error when the request fails.
    pub async fn list(&self) -> Result<Vec<Domain>, ApiError> {
        self.api.get_json(DOMAIN_PATH).await
    }

    /// # Errors
    ///
    /// Returns an error when the domain does not exist.
    pub async fn retrieve(&self, id: DomainId) -> Result<Domain, ApiError> {
        self.api.get_json(&Self::item_path(id)).await
    }

    /// # Errors
    ///
    /// Returns an error when the backend rejects the payload.
    pub async fn create(&self, payload: &DomainWrite) -> Result<Domain, ApiError> {
        self.api.post_json(DOMAIN_PATH, payload).await
    }

    /// # Errors
    ///
    /// Returns an error when the backend rejects the payload.
    pub async fn update(&self, id: DomainId, payload: &DomainWrite) -> Result<Domain, ApiError> {
        self.api.put_json(&Self::item_path(id), payload).await
    }

    /// # Errors
    ///
    /// Returns an error when the deletion is rejected.
    pub async fn delete(&self, id: DomainId) -> Result<(), ApiError> {
        self.api.delete(&Self::item_path(id)).await
    }
}
