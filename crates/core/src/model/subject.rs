use serde::{Deserialize, Serialize};

use crate::model::SubjectId;

/// A subject questions are tagged with; quizzes are generated from one or
/// more subjects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
}
