mod config;
mod heuristic;
mod validation;

pub use config::LeadScoreConfig;
pub use heuristic::{LEAD_SCORE_MAX, LEAD_SCORE_MIN};
pub use validation::{FieldError, LeadField, LeadGuard, LeadValidationError};

use super::domain::{AnswerSet, LeadInfo, QuizType, ResultBucket};

/// Lead gate: validates contact details and scores the lead for sales follow-up.
#[derive(Debug, Clone)]
pub struct LeadGate {
    guard: LeadGuard,
    config: LeadScoreConfig,
}

impl LeadGate {
    pub fn new(config: LeadScoreConfig) -> Self {
        Self {
            guard: LeadGuard::new(),
            config,
        }
    }

    pub fn config(&self) -> &LeadScoreConfig {
        &self.config
    }

    pub fn validate(&self, lead: LeadInfo) -> Result<LeadInfo, LeadValidationError> {
        self.guard.validate(lead)
    }

    pub fn score(&self, quiz_type: QuizType, bucket: &ResultBucket, answers: &AnswerSet) -> u8 {
        heuristic::lead_score(&self.config, quiz_type, bucket, answers)
    }
}

impl Default for LeadGate {
    fn default() -> Self {
        Self::new(LeadScoreConfig::default())
    }
}
