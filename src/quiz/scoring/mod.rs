mod rules;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::QuizDefinition;
use super::domain::{AnswerSet, QuestionId, QuestionKind};

/// Stateless scorer that folds an answer set into a single total.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizScorer;

impl QuizScorer {
    pub fn new() -> Self {
        Self
    }

    /// Sum weighted contributions over every answered question.
    ///
    /// Unanswered questions are skipped. Answers whose shape does not fit their question are
    /// skipped as well; callers validate answers before they reach the scorer.
    pub fn score(&self, quiz: &QuizDefinition, answers: &AnswerSet) -> ScoreBreakdown {
        let mut components = Vec::with_capacity(answers.len());
        let mut total = 0.0;

        for question in &quiz.questions {
            let Some(answer) = answers.get(&question.id) else {
                continue;
            };

            match rules::contribution(question, answer) {
                Some(points) => {
                    total += points;
                    components.push(ScoreComponent {
                        question: question.id.clone(),
                        kind: question.kind,
                        contribution: points,
                    });
                }
                None => debug!(
                    question = %question.id,
                    expected = question.kind.label(),
                    found = answer.kind().label(),
                    "skipping answer that does not fit its question"
                ),
            }
        }

        ScoreBreakdown { total, components }
    }
}

/// Contribution of one question, kept for audits and reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub question: QuestionId,
    pub kind: QuestionKind,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total: f64,
    pub components: Vec<ScoreComponent>,
}
