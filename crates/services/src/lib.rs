#![forbid(unsafe_code)]

pub mod api;
pub mod auth;
pub mod auth_service;
pub mod catalog;
pub mod error;
pub mod preferences_service;
pub mod quiz;
pub mod user_service;

pub use error::{ApiError, AuthError, QuizTakeError, TransportError};

pub use api::{ApiClient, ApiConfig, ApiRequest, ApiResponse, HttpTransport, ReqwestTransport};
pub use auth::{SessionManager, TokenPair};
pub use auth_service::{AuthService, RegisterPayload};
pub use catalog::{DomainService, QuestionService, SubjectService};
pub use preferences_service::PreferencesService;
pub use quiz::{
    AnswerOutcome, NavIntent, QuizNavigator, QuizProgress, QuizService, QuizTakingService,
};
pub use user_service::UserService;
