use std::sync::Arc;

use serde::Serialize;

use quizdesk_core::model::{DomainId, Subject, SubjectId};

use crate::api::ApiClient;
use crate::error::ApiError;

const SUBJECT_PATH: &str = "subject/";

/// Writable fields of a subject.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectWrite {
    pub name: String,
    pub description: String,
    pub domain_id: DomainId,
}

/// CRUD over subjects, the unit quizzes are generated from.
pub struct SubjectService {
    api: Arc<ApiClient>,
}

impl SubjectService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    fn item_path(id: SubjectId) -> String {
        format!("{SUBJECT_PATH}{id}/")
    }

    /// Lists subjects, optionally filtered by a search term.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Subject>, ApiError> {
        let mut url = self.api.endpoint(SUBJECT_PATH)?;
        if let Some(term) = search {
            url.query_pairs_mut().append_pair("search", term);
        }
        self.api.get_json_at(url).await
    }

    /// # Errors
    ///
    /// Returns an error when the subject does not exist.
    pub async fn retrieve(&self, id: SubjectId) -> Result<Subject, ApiError> {
        self.api.get_json(&Self::item_path(id)).await
    }

    /// # Errors
    ///
    /// Returns an error when the backend rejects the payload.
    pub async fn create(&self, payload: &SubjectWrite) -> Result<Subject, ApiError> {
        self.api.post_json(SUBJECT_PATH, payload).await
    }

    /// # Errors
    ///
    /// Returns an error when the backend rejects the payload.
    pub async fn update(&self, id: SubjectId, payload: &SubjectWrite) -> Result<Subject, ApiError> {
        self.api.put_json(&Self::item_path(id), payload).await
    }

    /// # Errors
    ///
    /// Returns an error when the deletion is rejected.
    pub async fn delete(&self, id: SubjectId) -> Result<(), ApiError> {
        self.api.delete(&Self::item_path(id)).await
    }
}
