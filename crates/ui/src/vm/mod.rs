mod quiz_vm;
mod time_fmt;

pub use quiz_vm::{NavPillVm, QuizIntent, QuizOutcome, QuizVm, load_quiz};
pub use time_fmt::format_timer;
