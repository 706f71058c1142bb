#![forbid(unsafe_code)]

pub mod model;

pub use model::{
    AnswerOption, AttemptOption, LangCode, Me, NavigationItem, Question, QuestionMedia,
    QuizAttempt, QuizMode, QuizSession,
};
