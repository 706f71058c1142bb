use std::sync::Arc;

use services::{
    AuthService, PreferencesService, QuizService, QuizTakingService, SubjectService, UserService,
};

/// What the composition root must hand the UI.
pub trait UiApp: Send + Sync {
    fn auth(&self) -> Arc<AuthService>;
    fn users(&self) -> Arc<UserService>;
    fn quizzes(&self) -> Arc<QuizService>;
    fn quiz_taking(&self) -> Arc<QuizTakingService>;
    fn subjects(&self) -> Arc<SubjectService>;
    fn preferences(&self) -> Arc<PreferencesService>;
}

#[derive(Clone)]
pub struct AppContext {
    auth: Arc<AuthService>,
    users: Arc<UserService>,
    quizzes: Arc<QuizService>,
    quiz_taking: Arc<QuizTakingService>,
    subjects: Arc<SubjectService>,
    preferences: Arc<PreferencesService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            auth: app.auth(),
            users: app.users(),
            quizzes: app.quizzes(),
            quiz_taking: app.quiz_taking(),
            subjects: app.subjects(),
            preferences: app.preferences(),
        }
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn users(&self) -> Arc<UserService> {
        Arc::clone(&self.users)
    }

    #[must_use]
    pub fn quizzes(&self) -> Arc<QuizService> {
        Arc::clone(&self.quizzes)
    }

    #[must_use]
    pub fn quiz_taking(&self) -> Arc<QuizTakingService> {
        Arc::clone(&self.quiz_taking)
    }

    #[must_use]
    pub fn subjects(&self) -> Arc<SubjectService> {
        Arc::clone(&self.subjects)
    }

    #[must_use]
    pub fn preferences(&self) -> Arc<PreferencesService> {
        Arc::clone(&self.preferences)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
