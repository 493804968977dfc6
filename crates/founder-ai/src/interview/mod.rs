//! Adaptive founder interview flow.
//!
//! A [`catalog::QuestionCatalog`] holds the authored questions and branching
//! rules. An [`session::InterviewSession`] walks one user through the
//! catalog, deriving everything it reports from the answer history. The
//! [`service::InterviewService`] owns live sessions and hands completed
//! profiles to storage and enrichment; [`router::interview_router`] puts the
//! whole thing behind HTTP.

pub mod catalog;
pub mod domain;
pub mod repository;
mod resolve;
pub mod router;
pub mod service;
pub mod session;
mod validate;
pub mod views;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, QuestionCatalog};
pub use domain::{
    Answer, AnswerHistory, AnswerKind, AnswerValue, ChoiceOption, OptionSource, Question,
    SessionId, VisibilityRule,
};
pub use repository::{
    EnrichmentError, EnrichmentRequest, EnrichmentSink, ProfileRecord, ProfileRepository,
    RepositoryError,
};
pub use resolve::{accumulated_signals, resolve_options, visible_questions};
pub use router::interview_router;
pub use service::{InterviewService, InterviewServiceError};
pub use session::{InterviewSession, ProfileSnapshot, SessionError, SessionStatus, SubmitOutcome};
pub use validate::AnswerRejection;
pub use views::{CatalogOutline, QuestionOutline, QuestionView, SessionStateView};
