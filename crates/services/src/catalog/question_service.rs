use std::sync::Arc;

use serde::Serialize;

use quizdesk_core::model::{AnswerOption, Question, QuestionId, SubjectId};

use crate::api::ApiClient;
use crate::error::ApiError;

const QUESTION_PATH: &str = "question/";

/// Writable fields of a question, including its full option list. Options
/// are replaced wholesale on update; an option without an id is created.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionWrite {
    pub title: String,
    pub description: String,
    pub explanation: String,
    pub allow_multiple_correct: bool,
    pub subject_ids: Vec<SubjectId>,
    pub answer_options: Vec<AnswerOption>,
}

/// CRUD over the question bank. Admin-only on the backend side.
pub struct QuestionService {
    api: Arc<ApiClient>,
}

impl QuestionService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    fn item_path(id: QuestionId) -> String {
        format!("{QUESTION_PATH}{id}/")
    }

    /// Lists questions, optionally filtered by a search term.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Question>, ApiError> {
        let mut url = self.api.endpoint(QUESTION_PATH)?;
        if let Some(term) = search {
            url.query_pairs_mut().append_pair("search", term);
        }
        self.api.get_json_at(url).await
    }

    /// # Errors
    ///
    /// Returns an error when the question does not exist.
    pub async fn retrieve(&self, id: QuestionId) -> Result<Question, ApiError> {
        self.api.get_json(&Self::item_path(id)).await
    }

    /// # Errors
    ///
    /// Returns an error when the backend rejects the payload.
    pub async fn create(&self, payload: &QuestionWrite) -> Result<Question, ApiError> {
        self.api.post_json(QUESTION_PATH, payload).await
    }

    /// # Errors
    ///
    /// Returns an error when the backend rejects the payload.
    pub async fn update(
        &self,
        id: QuestionId,
        payload: &QuestionWrite,
    ) -> Result<Question, ApiError> {
        self.api.put_json(&Self::item_path(id), payload).await
    }

    /// # Errors
    ///
    /// Returns an error when the deletion is rejected.
    pub async fn delete(&self, id: QuestionId) -> Result<(), ApiError> {
        self.api.delete(&Self::item_path(id)).await
    }
}
