//! Quiz scoring, result matching, and lead capture.
//!
//! A quiz run flows answer → [`AnswerSet`] → [`QuizScorer`] → [`match_bucket`] → result, with
//! the optional [`LeadGate`] in front of the detailed report. [`QuizSession`] tracks one
//! visitor's progress; [`QuizService`] wires sessions and one-shot calls to the CMS, analytics,
//! and report collaborators.

pub mod catalog;
pub mod domain;
pub mod lead;
pub mod matcher;
pub mod outcome;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, QuizCatalog, QuizDefinition};
pub use domain::{
    Answer, AnswerError, AnswerOption, AnswerSet, LeadInfo, Question, QuestionId, QuestionKind,
    QuizType, ResultBucket, BOOLEAN_TRUE_POINTS, SCALE_MAX, SCALE_MIN,
};
pub use lead::{
    FieldError, LeadField, LeadGate, LeadGuard, LeadScoreConfig, LeadValidationError,
};
pub use matcher::{match_bucket, validate_buckets, BucketConfigError};
pub use outcome::{LeadCapture, QuizOutcome};
pub use repository::{
    AnalyticsError, AnalyticsEvent, AnalyticsSink, QuizResultId, QuizResultRecord,
    QuizResultRepository, ReportDocument, ReportError, ReportGenerator, ReportRequest,
    RepositoryError,
};
pub use router::quiz_router;
pub use scoring::{QuizScorer, ScoreBreakdown, ScoreComponent};
pub use service::{LeadReceipt, QuizService, QuizServiceError};
pub use session::{QuizSession, QuizState, SessionError};
