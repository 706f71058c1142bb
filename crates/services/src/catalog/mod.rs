//! Content management endpoints: domains, subjects, and questions.

mod domain_service;
mod question_service;
mod subject_service;

pub use domain_service::{DomainService, DomainWrite};
pub use question_service::{QuestionService, QuestionWrite};
pub use subject_service::{SubjectService, SubjectWrite};
