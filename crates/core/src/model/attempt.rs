use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{OptionId, QuestionId};

/// Body submitted to the attempt endpoint when saving an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerPayload {
    pub selected_option_ids: Vec<OptionId>,
}

/// Per-option state inside a saved attempt: what the user picked and, in
/// review mode, whether it was correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptOption {
    pub id: OptionId,
    #[serde(default)]
    pub content: String,
    pub is_selected: bool,
    #[serde(default)]
    pub is_correct: Option<bool>,
}

/// A saved answer for one question-order of a quiz session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttempt {
    #[serde(default)]
    pub question_id: Option<QuestionId>,
    pub question_order: u32,
    #[serde(default)]
    pub options: Vec<AttemptOption>,
    #[serde(default)]
    pub is_correct: Option<bool>,
    #[serde(default)]
    pub answered_at: Option<DateTime<Utc>>,
}

impl QuizAttempt {
    /// Ids of the options the backend reports as selected, in wire order.
    #[must_use]
    pub fn selected_option_ids(&self) -> Vec<OptionId> {
        self.options
            .iter()
            .filter(|option| option.is_selected)
            .map(|option| option.id)
            .collect()
    }
}
