use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AnswerSet, LeadInfo, QuestionId, QuizType};
use super::outcome::QuizOutcome;

/// Identifier wrapper for stored quiz results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuizResultId(pub String);

/// CMS record written when a visitor leaves contact details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResultRecord {
    pub record_id: QuizResultId,
    pub quiz_type: QuizType,
    pub answers: AnswerSet,
    pub score: f64,
    pub result_title: String,
    pub lead: LeadInfo,
    pub lead_score: u8,
    pub submitted_at: DateTime<Utc>,
}

/// Storage boundary for quiz results (the CMS in production).
pub trait QuizResultRepository: Send + Sync {
    fn save(&self, record: QuizResultRecord) -> Result<QuizResultRecord, RepositoryError>;
    fn fetch(&self, id: &QuizResultId) -> Result<Option<QuizResultRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("content store unavailable: {0}")]
    Unavailable(String),
}

/// Events emitted as visitors move through a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    AnswerRecorded {
        quiz_type: QuizType,
        question: QuestionId,
        index: usize,
    },
    QuizCompleted {
        quiz_type: QuizType,
        score: f64,
        result_title: String,
    },
    LeadCaptured {
        quiz_type: QuizType,
        lead_score: u8,
    },
    QuizRetaken {
        quiz_type: QuizType,
    },
}

impl AnalyticsEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            AnalyticsEvent::AnswerRecorded { .. } => "quiz_answer",
            AnalyticsEvent::QuizCompleted { .. } => "quiz_completed",
            AnalyticsEvent::LeadCaptured { .. } => "quiz_lead_captured",
            AnalyticsEvent::QuizRetaken { .. } => "quiz_retaken",
        }
    }
}

/// Fire-and-forget analytics hook. Callers never act on failures beyond logging them.
pub trait AnalyticsSink: Send + Sync {
    fn track(&self, event: AnalyticsEvent) -> Result<(), AnalyticsError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("analytics transport unavailable: {0}")]
    Transport(String),
}

/// Everything a report renderer needs to produce the detailed result document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRequest {
    pub quiz_title: String,
    pub outcome: QuizOutcome,
    pub answers: AnswerSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead: Option<LeadInfo>,
    pub generated_at: DateTime<Utc>,
}

/// Rendered report ready for download.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub file_name: String,
    pub content_type: mime::Mime,
    pub bytes: Vec<u8>,
}

/// Report (PDF) generation boundary.
pub trait ReportGenerator: Send + Sync {
    fn generate(&self, request: ReportRequest) -> Result<ReportDocument, ReportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report rendering failed: {0}")]
    Rendering(String),
}
