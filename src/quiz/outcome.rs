use serde::{Deserialize, Serialize};

use super::catalog::QuizDefinition;
use super::domain::{AnswerSet, LeadInfo, QuizType, ResultBucket};
use super::matcher::match_bucket;
use super::scoring::{QuizScorer, ScoreComponent};

/// Scored quiz run with the bucket the score landed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOutcome {
    pub quiz_type: QuizType,
    pub score: f64,
    pub max_score: f64,
    pub answered: usize,
    pub components: Vec<ScoreComponent>,
    pub result: ResultBucket,
}

impl QuizOutcome {
    /// Score `answers` and match the total into the quiz's buckets.
    ///
    /// Returns `None` only when the quiz has no buckets at all.
    pub fn evaluate(
        scorer: &QuizScorer,
        quiz: &QuizDefinition,
        answers: &AnswerSet,
    ) -> Option<Self> {
        let breakdown = scorer.score(quiz, answers);
        let result = match_bucket(breakdown.total, &quiz.buckets)?.clone();

        Some(Self {
            quiz_type: quiz.quiz_type,
            score: breakdown.total,
            max_score: quiz.max_possible_score(),
            answered: breakdown.components.len(),
            components: breakdown.components,
            result,
        })
    }
}

/// Lead details accepted by the gate together with their CRM priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadCapture {
    pub lead: LeadInfo,
    pub lead_score: u8,
}
