use std::sync::Arc;

use reqwest::StatusCode;
use serde::Deserialize;

use quizdesk_core::model::{
    AnswerPayload, OptionId, QuizAttempt, QuizGeneratePayload, QuizId, QuizSession, SubjectId,
};

use crate::api::ApiClient;
use crate::error::ApiError;

const QUIZ_PATH: &str = "quiz/";

#[derive(Debug, Deserialize)]
struct QuestionCount {
    count: u32,
}

/// HTTP endpoints for quiz sessions and their per-question attempts.
pub struct QuizService {
    api: Arc<ApiClient>,
}

impl QuizService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    fn session_path(quiz_id: QuizId) -> String {
        format!("{QUIZ_PATH}{quiz_id}/")
    }

    fn attempt_path(quiz_id: QuizId, question_order: u32) -> String {
        format!("{QUIZ_PATH}{quiz_id}/attempt/{question_order}/")
    }

    /// Lists the user's quiz sessions, optionally filtered by a search term.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails.
    pub async fn list_sessions(&self, search: Option<&str>) -> Result<Vec<QuizSession>, ApiError> {
        let mut url = self.api.endpoint(QUIZ_PATH)?;
        if let Some(term) = search {
            url.query_pairs_mut().append_pair("search", term);
        }
        self.api.get_json_at(url).await
    }

    /// Fetches one session with its full question list.
    ///
    /// # Errors
    ///
    /// Returns an error when the session does not exist or the request fails.
    pub async fn retrieve_session(&self, quiz_id: QuizId) -> Result<QuizSession, ApiError> {
        self.api.get_json(&Self::session_path(quiz_id)).await
    }

    /// Session metadata without the question bodies, for list screens.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails.
    pub async fn session_summary(&self, quiz_id: QuizId) -> Result<QuizSession, ApiError> {
        self.api
            .get_json(&format!("{QUIZ_PATH}{quiz_id}/summary/"))
            .await
    }

    /// Asks the backend to assemble a new session from `payload`.
    ///
    /// # Errors
    ///
    /// Returns an error when generation fails, e.g. no subjects selected.
    pub async fn generate(&self, payload: &QuizGeneratePayload) -> Result<QuizSession, ApiError> {
        self.api
            .post_json(&format!("{QUIZ_PATH}generate/"), payload)
            .await
    }

    /// Number of questions available for a subject selection, shown before
    /// generating.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails.
    pub async fn question_count(&self, subject_ids: &[SubjectId]) -> Result<u32, ApiError> {
        let counted: QuestionCount = self
            .api
            .post_json(
                &format!("{QUIZ_PATH}question-count/"),
                &serde_json::json!({ "subject_ids": subject_ids }),
            )
            .await?;
        Ok(counted.count)
    }

    /// Marks the session started; the backend stamps `started_at` and, for
    /// timed sessions, the expiry.
    ///
    /// # Errors
    ///
    /// Returns an error when the session cannot be started.
    pub async fn start_session(&self, quiz_id: QuizId) -> Result<QuizSession, ApiError> {
        self.api
            .post_json(&format!("{QUIZ_PATH}{quiz_id}/start/"), &serde_json::json!({}))
            .await
    }

    /// Closes the session for further answers.
    ///
    /// # Errors
    ///
    /// Returns an error when the session cannot be closed.
    pub async fn close_session(&self, quiz_id: QuizId) -> Result<QuizSession, ApiError> {
        self.api
            .post_json(&format!("{QUIZ_PATH}{quiz_id}/close/"), &serde_json::json!({}))
            .await
    }

    /// # Errors
    ///
    /// Returns an error when the deletion is rejected.
    pub async fn delete_session(&self, quiz_id: QuizId) -> Result<(), ApiError> {
        self.api.delete(&Self::session_path(quiz_id)).await
    }

    /// Saved answer for one question-order, or `None` when nothing was saved
    /// yet. A 404 from the backend is the "nothing saved" case, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than a missing attempt.
    pub async fn get_answer(
        &self,
        quiz_id: QuizId,
        question_order: u32,
    ) -> Result<Option<QuizAttempt>, ApiError> {
        match self
            .api
            .get_json(&Self::attempt_path(quiz_id, question_order))
            .await
        {
            Ok(attempt) => Ok(Some(attempt)),
            Err(ApiError::Status {
                status: StatusCode::NOT_FOUND,
                ..
            }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Saves the selection for one question-order, updating the existing
    /// attempt when one is already stored and creating it otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error when the save fails; the caller must not mark the
    /// question answered in that case.
    pub async fn save_answer(
        &self,
        quiz_id: QuizId,
        question_order: u32,
        selected: &[OptionId],
    ) -> Result<QuizAttempt, ApiError> {
        let payload = AnswerPayload {
            selected_option_ids: selected.to_vec(),
        };
        let path = Self::attempt_path(quiz_id, question_order);

        // The backend is the arbiter of existence.
        match self.get_answer(quiz_id, question_order).await? {
            Some(_) => self.api.put_json(&path, &payload).await,
            None => self.api.post_json(&path, &payload).await,
        }
    }
}
