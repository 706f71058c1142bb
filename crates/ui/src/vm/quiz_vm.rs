use quizdesk_core::model::{NavigationItem, OptionId, Question, QuizId};
use services::error::{ApiError, QuizTakeError};
use services::{NavIntent, QuizNavigator, QuizProgress, QuizTakingService};

use crate::views::ViewError;

/// What the user asked the session screen to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    ToggleOption(OptionId),
    Jump(u32),
    FlagCurrent,
    Submit(NavIntent),
    Finish,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizOutcome {
    Continue,
    Finished,
}

/// One entry of the question-number strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavPillVm {
    pub index: u32,
    pub answered: bool,
    pub flagged: bool,
    pub current: bool,
}

fn map_pill(item: &NavigationItem, current_index: u32) -> NavPillVm {
    NavPillVm {
        index: item.index(),
        answered: item.answered(),
        flagged: item.flagged(),
        current: item.index() == current_index,
    }
}

/// Screen state for a quiz in progress: the navigator plus the selection
/// being edited for the current question. The draft only reaches the
/// navigator once the backend confirms the save.
pub struct QuizVm {
    nav: QuizNavigator,
    draft: Vec<OptionId>,
}

impl QuizVm {
    #[must_use]
    pub fn new(nav: QuizNavigator) -> Self {
        let mut vm = Self {
            nav,
            draft: Vec::new(),
        };
        vm.sync_draft();
        vm
    }

    /// Re-seeds the draft from whatever is stored for the current question.
    fn sync_draft(&mut self) {
        self.draft = self
            .nav
            .current_item()
            .map(|item| item.selected_option_ids().to_vec())
            .unwrap_or_default();
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.nav.session().id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.nav.session().title
    }

    #[must_use]
    pub fn current_index(&self) -> u32 {
        self.nav.current_index()
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.nav.total()
    }

    /// Configured countdown in seconds, for timed sessions.
    #[must_use]
    pub fn timer(&self) -> Option<u32> {
        self.nav.session().timer
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.nav.current_item().map(NavigationItem::question)
    }

    #[must_use]
    pub fn current_flagged(&self) -> bool {
        self.nav.current_item().is_some_and(NavigationItem::flagged)
    }

    #[must_use]
    pub fn is_selected(&self, option: OptionId) -> bool {
        self.draft.contains(&option)
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.draft.is_empty()
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.nav.has_next()
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.nav.has_previous()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        self.nav.progress()
    }

    #[must_use]
    pub fn pills(&self) -> Vec<NavPillVm> {
        let current = self.nav.current_index();
        self.nav.items().map(|item| map_pill(item, current)).collect()
    }

    /// Single-answer questions replace the draft; multi-answer questions
    /// toggle membership.
    pub fn toggle_option(&mut self, option: OptionId) {
        let multiple = self
            .current_question()
            .is_some_and(|question| question.allow_multiple_correct);
        if multiple {
            if let Some(position) = self.draft.iter().position(|id| *id == option) {
                self.draft.remove(position);
            } else {
                self.draft.push(option);
            }
        } else {
            self.draft = vec![option];
        }
    }

    /// Jumps to another question without saving; the draft re-seeds from the
    /// target's stored selection.
    pub fn jump(&mut self, index: u32) {
        if self.nav.select(index) {
            self.sync_draft();
        }
    }

    pub fn flag_current(&mut self) {
        let index = self.nav.current_index();
        self.nav.toggle_flag(index);
    }

    /// Saves the draft for the current question, then moves per `intent`.
    /// The draft and the pointer are untouched when the save fails.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::SessionExpired` when re-authentication is needed
    /// and `ViewError::Unknown` for other failures.
    pub async fn submit(
        &mut self,
        taking: &QuizTakingService,
        intent: NavIntent,
    ) -> Result<QuizOutcome, ViewError> {
        taking
            .answer_current(&mut self.nav, self.draft.clone(), intent)
            .await
            .map_err(map_take_error)?;
        self.sync_draft();
        Ok(QuizOutcome::Continue)
    }

    /// Closes the session once the user is done.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::submit`].
    pub async fn finish(&mut self, taking: &QuizTakingService) -> Result<QuizOutcome, ViewError> {
        taking
            .finish(self.quiz_id())
            .await
            .map_err(map_take_error)?;
        Ok(QuizOutcome::Finished)
    }
}

fn map_take_error(err: QuizTakeError) -> ViewError {
    match err {
        QuizTakeError::Api(ApiError::SessionExpired(_)) => ViewError::SessionExpired,
        QuizTakeError::Empty => ViewError::EmptyQuiz,
        QuizTakeError::Closed => ViewError::QuizClosed,
        _ => ViewError::Unknown,
    }
}

/// Starts the session if needed, loads it, and wraps it for the screen.
///
/// # Errors
///
/// Returns `ViewError::EmptyQuiz` for a session without questions,
/// `ViewError::SessionExpired` when re-authentication is needed, and
/// `ViewError::Unknown` otherwise.
pub async fn load_quiz(
    taking: &QuizTakingService,
    quiz_id: QuizId,
) -> Result<QuizVm, ViewError> {
    taking
        .ensure_started(quiz_id)
        .await
        .map_err(map_take_error)?;
    let nav = taking
        .load_session(quiz_id, None)
        .await
        .map_err(map_take_error)?;
    Ok(QuizVm::new(nav))
}

// ─── TESTS ──────────────────────────────────────────────────────────────────
