//! In-memory session state and its persistence across restarts.

mod session;

pub use session::{SessionManager, TokenPair};
