use crate::model::{OptionId, Question, QuestionId};

/// Per-question local state tracked while a quiz is in progress.
///
/// The whole set is built once when a session loads and replaced wholesale
/// on the next load; individual items are mutated in place. `answered` and
/// `selected_option_ids` follow what the backend has confirmed; `flagged`
/// is purely local and never leaves the client.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationItem {
    index: u32,
    id: QuestionId,
    answered: bool,
    flagged: bool,
    question: Question,
    selected_option_ids: Vec<OptionId>,
}

impl NavigationItem {
    /// Build the initial item for `question` at 1-based position `index`.
    #[must_use]
    pub fn new(index: u32, question: Question) -> Self {
        Self {
            index,
            id: question.id,
            answered: false,
            flagged: false,
            question,
            selected_option_ids: Vec::new(),
        }
    }

    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn answered(&self) -> bool {
        self.answered
    }

    #[must_use]
    pub fn flagged(&self) -> bool {
        self.flagged
    }

    #[must_use]
    pub fn question(&self) -> &Question {
        &self.question
    }

    #[must_use]
    pub fn selected_option_ids(&self) -> &[OptionId] {
        &self.selected_option_ids
    }

    /// Record a backend-confirmed answer: marks the item answered and
    /// overwrites the selection with exactly what was submitted.
    pub fn mark_answered(&mut self, selected: Vec<OptionId>) {
        self.answered = true;
        self.selected_option_ids = selected;
    }

    /// Reconcile with a previously saved answer reported by the backend.
    ///
    /// Empty selections are ignored: the backend reporting "nothing picked"
    /// leaves the freshly initialized item untouched. Flag state is never
    /// hydrated.
    pub fn hydrate(&mut self, selected: Vec<OptionId>) {
        if selected.is_empty() {
            return;
        }
        self.answered = true;
        self.selected_option_ids = selected;
    }

    /// Flip the local review flag. Independent of answered state.
    pub fn toggle_flag(&mut self) {
        self.flagged = !self.flagged;
    }
}
