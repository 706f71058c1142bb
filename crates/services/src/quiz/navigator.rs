use std::collections::BTreeMap;

use quizdesk_core::model::{NavigationItem, OptionId, QuizSession};

use crate::error::QuizTakeError;

use super::progress::QuizProgress;

/// Pure navigation state machine over a loaded quiz session.
///
/// Positions are 1-based and match the backend's `question_order`. The
/// pointer is always within `[1, total]`; movement past either boundary is
/// refused rather than clamped after the fact. No I/O happens here; the
/// taking service drives this from backend responses.
#[derive(Debug, Clone)]
pub struct QuizNavigator {
    session: QuizSession,
    items: BTreeMap<u32, NavigationItem>,
    current: u32,
}

impl QuizNavigator {
    /// Builds items for every question in order and points at the first one.
    ///
    /// # Errors
    ///
    /// Returns [`QuizTakeError::Empty`] when the session has no questions.
    pub fn new(session: QuizSession) -> Result<Self, QuizTakeError> {
        Self::with_start(session, 1)
    }

    /// Like [`Self::new`] but pointing at `start`, for resuming mid-quiz.
    ///
    /// # Errors
    ///
    /// Returns [`QuizTakeError::Empty`] for a session without questions and
    /// [`QuizTakeError::UnknownIndex`] when `start` is out of range.
    pub fn with_start(session: QuizSession, start: u32) -> Result<Self, QuizTakeError> {
        if session.questions.is_empty() {
            return Err(QuizTakeError::Empty);
        }

        let items: BTreeMap<u32, NavigationItem> = session
            .questions
            .iter()
            .enumerate()
            .map(|(position, question)| {
                let index = u32::try_from(position).unwrap_or(u32::MAX).saturating_add(1);
                (index, NavigationItem::new(index, question.clone()))
            })
            .collect();

        if !items.contains_key(&start) {
            return Err(QuizTakeError::UnknownIndex { index: start });
        }

        Ok(Self {
            session,
            items,
            current: start,
        })
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        u32::try_from(self.items.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn current_index(&self) -> u32 {
        self.current
    }

    #[must_use]
    pub fn current_item(&self) -> Option<&NavigationItem> {
        self.items.get(&self.current)
    }

    #[must_use]
    pub fn item(&self, index: u32) -> Option<&NavigationItem> {
        self.items.get(&index)
    }

    /// Items in question order.
    pub fn items(&self) -> impl Iterator<Item = &NavigationItem> {
        self.items.values()
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current < self.total()
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    /// Moves the pointer forward one question. Refused at the last question.
    pub fn advance(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Moves the pointer back one question. Refused at the first question.
    pub fn retreat(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Jumps straight to `index`. Unknown positions leave the pointer alone.
    pub fn select(&mut self, index: u32) -> bool {
        if !self.items.contains_key(&index) {
            tracing::debug!(index, total = self.total(), "refusing jump to unknown position");
            return false;
        }
        self.current = index;
        true
    }

    /// Flips the local review flag at `index`.
    pub fn toggle_flag(&mut self, index: u32) -> bool {
        match self.items.get_mut(&index) {
            Some(item) => {
                item.toggle_flag();
                true
            }
            None => false,
        }
    }

    /// Records a backend-confirmed answer at `index`.
    pub(crate) fn mark_answered(&mut self, index: u32, selected: Vec<OptionId>) -> bool {
        match self.items.get_mut(&index) {
            Some(item) => {
                item.mark_answered(selected);
                true
            }
            None => false,
        }
    }

    /// Reconciles the item at `index` with a saved answer from the backend.
    pub(crate) fn hydrate_item(&mut self, index: u32, selected: Vec<OptionId>) {
        if let Some(item) = self.items.get_mut(&index) {
            item.hydrate(selected);
        }
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let answered = self.items.values().filter(|item| item.answered()).count();
        let flagged = self.items.values().filter(|item| item.flagged()).count();
        QuizProgress {
            total: self.total(),
            answered: u32::try_from(answered).unwrap_or(u32::MAX),
            flagged: u32::try_from(flagged).unwrap_or(u32::MAX),
        }
    }
}

// ─── TESTS ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use quizdesk_core::model::QuestionId;

    use super::*;

    fn session_with_questions(count: u64) -> QuizSession {
        let questions: Vec<serde_json::Value> = (1..=count)
            .map(|id| {
                serde_json::json!({
                    "id": id,
                    "title": format!("Question {id}"),
                    "answer_options": [
                        { "id": id * 10 + 1, "content": "a", "sort_order": 1 },
                        { "id": id * 10 + 2, "content": "b", "sort_order": 2 },
                    ],
                })
            })
            .collect();
        serde_json::from_value(serde_json::json!({
            "id": 42,
            "title": "Weekly drill",
            "questions": questions,
        }))
        .unwrap()
    }

    #[test]
    fn empty_session_is_rejected() {
        let err = QuizNavigator::new(session_with_questions(0)).unwrap_err();
        assert!(matches!(err, QuizTakeError::Empty));
    }

    #[test]
    fn items_are_indexed_from_one_in_question_order() {
        let nav = QuizNavigator::new(session_with_questions(3)).unwrap();
        assert_eq!(nav.total(), 3);
        assert_eq!(nav.current_index(), 1);

        let ids: Vec<QuestionId> = nav.items().map(NavigationItem::id).collect();
        assert_eq!(
            ids,
            vec![QuestionId::new(1), QuestionId::new(2), QuestionId::new(3)]
        );
        assert_eq!(nav.item(1).unwrap().index(), 1);
        assert!(nav.item(0).is_none());
        assert!(nav.item(4).is_none());
    }

    #[test]
    fn resume_start_must_be_in_range() {
        let nav = QuizNavigator::with_start(session_with_questions(3), 2).unwrap();
        assert_eq!(nav.current_index(), 2);

        let err = QuizNavigator::with_start(session_with_questions(3), 4).unwrap_err();
        assert!(matches!(err, QuizTakeError::UnknownIndex { index: 4 }));
    }

    #[test]
    fn advance_stops_at_last_question() {
        let mut nav = QuizNavigator::new(session_with_questions(2)).unwrap();
        assert!(nav.has_next());
        assert!(nav.advance());
        assert_eq!(nav.current_index(), 2);

        // At the boundary the pointer stays put.
        assert!(!nav.has_next());
        assert!(!nav.advance());
        assert_eq!(nav.current_index(), 2);
    }

    #[test]
    fn retreat_stops_at_first_question() {
        let mut nav = QuizNavigator::new(session_with_questions(2)).unwrap();
        assert!(!nav.has_previous());
        assert!(!nav.retreat());
        assert_eq!(nav.current_index(), 1);

        nav.advance();
        assert!(nav.retreat());
        assert_eq!(nav.current_index(), 1);
    }

    #[test]
    fn single_question_session_allows_no_movement() {
        let mut nav = QuizNavigator::new(session_with_questions(1)).unwrap();
        assert!(!nav.has_next());
        assert!(!nav.has_previous());
        assert!(!nav.advance());
        assert!(!nav.retreat());
        assert_eq!(nav.current_index(), 1);
    }

    #[test]
    fn select_ignores_unknown_positions() {
        let mut nav = QuizNavigator::new(session_with_questions(3)).unwrap();
        assert!(nav.select(3));
        assert_eq!(nav.current_index(), 3);

        assert!(!nav.select(0));
        assert!(!nav.select(7));
        assert_eq!(nav.current_index(), 3);
    }

    #[test]
    fn flag_toggles_without_touching_answers() {
        let mut nav = QuizNavigator::new(session_with_questions(2)).unwrap();
        nav.mark_answered(1, vec![OptionId::new(11)]);

        assert!(nav.toggle_flag(1));
        let item = nav.item(1).unwrap();
        assert!(item.flagged());
        assert!(item.answered());
        assert_eq!(item.selected_option_ids(), &[OptionId::new(11)]);

        assert!(nav.toggle_flag(1));
        assert!(!nav.item(1).unwrap().flagged());
        assert!(nav.item(1).unwrap().answered());

        assert!(!nav.toggle_flag(9));
    }

    #[test]
    fn hydrate_overwrites_and_ignores_empty() {
        let mut nav = QuizNavigator::new(session_with_questions(2)).unwrap();

        nav.hydrate_item(1, vec![OptionId::new(11), OptionId::new(12)]);
        assert!(nav.item(1).unwrap().answered());
        assert_eq!(
            nav.item(1).unwrap().selected_option_ids(),
            &[OptionId::new(11), OptionId::new(12)]
        );

        nav.hydrate_item(2, Vec::new());
        assert!(!nav.item(2).unwrap().answered());
    }

    #[test]
    fn progress_counts_answered_and_flagged() {
        let mut nav = QuizNavigator::new(session_with_questions(3)).unwrap();
        nav.mark_answered(1, vec![OptionId::new(11)]);
        nav.mark_answered(2, vec![OptionId::new(21)]);
        nav.toggle_flag(3);

        let progress = nav.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.answered, 2);
        assert_eq!(progress.flagged, 1);
        assert!(!progress.is_complete());

        nav.mark_answered(3, vec![OptionId::new(31)]);
        assert!(nav.progress().is_complete());
    }
}
