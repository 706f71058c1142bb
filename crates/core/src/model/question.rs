use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{MediaId, OptionId, QuestionId, Subject};

/// A multilingual question with its answer options and media attachments.
///
/// The backend owns validation and translation; this is the wire shape the
/// client renders and edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub allow_multiple_correct: bool,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub media: Vec<QuestionMedia>,
    #[serde(default)]
    pub answer_options: Vec<AnswerOption>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Question {
    /// Options in render order.
    #[must_use]
    pub fn options_sorted(&self) -> Vec<&AnswerOption> {
        let mut options: Vec<&AnswerOption> = self.answer_options.iter().collect();
        options.sort_by_key(|option| option.sort_order);
        options
    }

    /// Ids of the options the backend marks correct. Empty in quiz-taking
    /// payloads, where correctness is stripped server-side.
    #[must_use]
    pub fn correct_option_ids(&self) -> Vec<OptionId> {
        self.answer_options
            .iter()
            .filter(|option| option.is_correct)
            .filter_map(|option| option.id)
            .collect()
    }
}

/// One selectable answer for a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    #[serde(default)]
    pub id: Option<OptionId>,
    pub content: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub sort_order: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// Image or video attached to a question, either an uploaded file or an
/// external URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionMedia {
    #[serde(default)]
    pub id: Option<MediaId>,
    pub kind: MediaKind,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub sort_order: u32,
}
