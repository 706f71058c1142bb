mod attempt;
mod domain;
mod ids;
mod language;
mod nav;
mod question;
mod quiz;
mod subject;
mod user;

pub use ids::{DomainId, MediaId, OptionId, ParseIdError, QuestionId, QuizId, SubjectId, UserId};

pub use attempt::{AnswerPayload, AttemptOption, QuizAttempt};
pub use domain::Domain;
pub use language::LangCode;
pub use nav::NavigationItem;
pub use question::{AnswerOption, MediaKind, Question, QuestionMedia};
pub use quiz::{QuizGeneratePayload, QuizMode, QuizSession};
pub use subject::Subject;
pub use user::Me;
