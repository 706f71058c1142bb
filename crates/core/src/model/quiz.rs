use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Question, QuizId, SubjectId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    #[default]
    Practice,
    Exam,
}

/// A generated quiz session with its ordered question list.
///
/// Read-only from the client's perspective except for the start transition;
/// answers are recorded per question through the attempt endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSession {
    pub id: QuizId,
    pub title: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub mode: QuizMode,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub subject_ids: Vec<SubjectId>,
    #[serde(default)]
    pub max_questions: u32,
    #[serde(default)]
    pub with_duration: bool,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub timer: Option<u32>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expired_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Number of questions in the session's ordered list.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Whether answers can still be submitted at `now`: the session is not
    /// closed and, when timed, has not passed its expiry.
    #[must_use]
    pub fn can_answer(&self, now: DateTime<Utc>) -> bool {
        if self.is_closed {
            return false;
        }
        match self.expired_at {
            Some(expired_at) => now < expired_at,
            None => true,
        }
    }
}

/// Payload for generating a new quiz session from subjects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizGeneratePayload {
    pub subject_ids: Vec<SubjectId>,
    pub max_questions: u32,
    pub with_duration: bool,
    pub duration: Option<u32>,
}
