use std::sync::Arc;

use chrono::Utc;

use quizdesk_core::model::{OptionId, QuizAttempt, QuizId, QuizSession};

use crate::error::QuizTakeError;

use super::navigator::QuizNavigator;
use super::service::QuizService;

/// Where the pointer should go after a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIntent {
    Next,
    Previous,
    Stay,
}

/// Result of submitting an answer: the stored attempt, the position it was
/// stored at, and where the pointer ended up.
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    pub attempt: QuizAttempt,
    pub index: u32,
    pub current_index: u32,
}

/// Orchestrates a quiz being taken: loads the session, reconciles saved
/// answers, and drives the navigator from backend confirmations.
pub struct QuizTakingService {
    quizzes: Arc<QuizService>,
}

impl QuizTakingService {
    #[must_use]
    pub fn new(quizzes: Arc<QuizService>) -> Self {
        Self { quizzes }
    }

    /// Starts the session on the backend if it has not started yet.
    ///
    /// # Errors
    ///
    /// Returns an error when the start transition is rejected.
    pub async fn ensure_started(&self, quiz_id: QuizId) -> Result<QuizSession, QuizTakeError> {
        let session = self.quizzes.session_summary(quiz_id).await?;
        if session.is_started() {
            return Ok(session);
        }
        Ok(self.quizzes.start_session(quiz_id).await?)
    }

    /// Fetches the session, builds the navigator, and hydrates each item from
    /// any previously saved answer.
    ///
    /// Hydration is best-effort per question: a failed lookup for one
    /// position is logged and skipped so a single flaky read does not take
    /// down the whole quiz screen. The session fetch itself is fatal.
    ///
    /// # Errors
    ///
    /// Returns an error when the session cannot be fetched, has no
    /// questions, or `start` is out of range.
    pub async fn load_session(
        &self,
        quiz_id: QuizId,
        start: Option<u32>,
    ) -> Result<QuizNavigator, QuizTakeError> {
        let session = self.quizzes.session_summary(quiz_id).await?;
        let mut nav = match start {
            Some(index) => QuizNavigator::with_start(session, index)?,
            None => QuizNavigator::new(session)?,
        };
        self.hydrate(&mut nav).await;
        Ok(nav)
    }

    async fn hydrate(&self, nav: &mut QuizNavigator) {
        let quiz_id = nav.session().id;
        for index in 1..=nav.total() {
            match self.quizzes.get_answer(quiz_id, index).await {
                Ok(Some(attempt)) => nav.hydrate_item(index, attempt.selected_option_ids()),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(
                        %quiz_id,
                        index,
                        error = %err,
                        "skipping saved-answer hydration for question",
                    );
                }
            }
        }
    }

    /// Saves the selection for the current question, then moves the pointer
    /// per `intent`. The item is marked answered only after the backend
    /// confirms the save; on failure both the item and the pointer are left
    /// exactly as they were.
    ///
    /// # Errors
    ///
    /// Returns an error when the session no longer accepts answers or the
    /// save fails.
    pub async fn answer_current(
        &self,
        nav: &mut QuizNavigator,
        selected: Vec<OptionId>,
        intent: NavIntent,
    ) -> Result<AnswerOutcome, QuizTakeError> {
        // The backend enforces this too; checking locally avoids a doomed
        // round trip after the timer ran out.
        if !nav.session().can_answer(Utc::now()) {
            return Err(QuizTakeError::Closed);
        }

        let index = nav.current_index();
        let attempt = self
            .quizzes
            .save_answer(nav.session().id, index, &selected)
            .await?;

        nav.mark_answered(index, selected);
        match intent {
            NavIntent::Next => {
                nav.advance();
            }
            NavIntent::Previous => {
                nav.retreat();
            }
            NavIntent::Stay => {}
        }

        Ok(AnswerOutcome {
            attempt,
            index,
            current_index: nav.current_index(),
        })
    }

    /// Closes the session once the user submits the whole quiz.
    ///
    /// # Errors
    ///
    /// Returns an error when the close is rejected.
    pub async fn finish(&self, quiz_id: QuizId) -> Result<QuizSession, QuizTakeError> {
        Ok(self.quizzes.close_session(quiz_id).await?)
    }
}
