//! Quiz sessions: the HTTP endpoints, the pure navigation state machine, and
//! the orchestration that ties them together while a quiz is being taken.

mod navigator;
mod progress;
mod service;
mod workflow;

pub use navigator::QuizNavigator;
pub use progress::QuizProgress;
pub use service::QuizService;
pub use workflow::{AnswerOutcome, NavIntent, QuizTakingService};
