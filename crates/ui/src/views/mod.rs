mod generate;
mod login;
mod quizzes;
mod session;
mod state;

pub use generate::GenerateView;
pub use login::LoginView;
pub use quizzes::QuizzesView;
pub use session::SessionView;
pub use state::{ViewError, ViewState, view_state_from_resource};
