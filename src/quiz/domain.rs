use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest accepted value on a scale question.
pub const SCALE_MIN: u8 = 1;
/// Highest accepted value on a scale question.
pub const SCALE_MAX: u8 = 10;
/// Points a `true` boolean answer is worth before weighting.
pub const BOOLEAN_TRUE_POINTS: f64 = 10.0;

/// Quizzes published on the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizType {
    Readiness,
    ModelFit,
}

impl QuizType {
    pub const ALL: [QuizType; 2] = [QuizType::Readiness, QuizType::ModelFit];

    pub const fn slug(self) -> &'static str {
        match self {
            QuizType::Readiness => "readiness",
            QuizType::ModelFit => "model_fit",
        }
    }

    pub fn from_slug(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|quiz_type| quiz_type.slug() == normalized)
    }
}

impl fmt::Display for QuizType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Stable identifier assigned to a question in the quiz configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Scale,
    Boolean,
    MultipleChoice,
    MultipleSelect,
}

impl QuestionKind {
    pub const fn label(self) -> &'static str {
        match self {
            QuestionKind::Scale => "scale",
            QuestionKind::Boolean => "boolean",
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::MultipleSelect => "multiple_select",
        }
    }

    /// Multiple-select questions wait for an explicit "next"; everything else advances on answer.
    pub const fn auto_advances(self) -> bool {
        !matches!(self, QuestionKind::MultipleSelect)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub text: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A weighted quiz question. Immutable once the quiz is configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<AnswerOption>,
    pub weight: f64,
}

impl Question {
    pub fn option(&self, index: usize) -> Option<&AnswerOption> {
        self.options.get(index)
    }

    /// Highest contribution this question can add to a total.
    pub fn max_contribution(&self) -> f64 {
        let points = match self.kind {
            QuestionKind::Scale => f64::from(SCALE_MAX),
            QuestionKind::Boolean => BOOLEAN_TRUE_POINTS,
            QuestionKind::MultipleChoice | QuestionKind::MultipleSelect => self
                .options
                .iter()
                .map(|option| option.value)
                .fold(0.0, f64::max),
        };
        points * self.weight
    }

    /// Lowest contribution this question can add once answered.
    pub fn min_contribution(&self) -> f64 {
        let points = match self.kind {
            QuestionKind::Scale => f64::from(SCALE_MIN),
            QuestionKind::Boolean | QuestionKind::MultipleSelect => 0.0,
            QuestionKind::MultipleChoice => self
                .options
                .iter()
                .map(|option| option.value)
                .reduce(f64::min)
                .unwrap_or(0.0),
        };
        points * self.weight
    }

    /// Check that an answer has the right shape for this question.
    pub fn accepts(&self, answer: &Answer) -> Result<(), AnswerError> {
        match (self.kind, answer) {
            (QuestionKind::Scale, Answer::Scale(value)) => {
                if (SCALE_MIN..=SCALE_MAX).contains(value) {
                    Ok(())
                } else {
                    Err(AnswerError::ScaleOutOfRange {
                        question: self.id.clone(),
                        value: *value,
                    })
                }
            }
            (QuestionKind::Boolean, Answer::Boolean(_)) => Ok(()),
            (QuestionKind::MultipleChoice, Answer::Choice(value)) => {
                if self.options.iter().any(|option| option.value == *value) {
                    Ok(())
                } else {
                    Err(AnswerError::UnknownChoice {
                        question: self.id.clone(),
                        value: *value,
                    })
                }
            }
            (QuestionKind::MultipleSelect, Answer::Selection(selected)) => {
                match selected
                    .iter()
                    .find(|candidate| !self.options.contains(candidate))
                {
                    Some(stray) => Err(AnswerError::UnknownSelection {
                        question: self.id.clone(),
                        text: stray.text.clone(),
                    }),
                    None => Ok(()),
                }
            }
            (expected, answer) => Err(AnswerError::KindMismatch {
                question: self.id.clone(),
                expected,
                found: answer.kind(),
            }),
        }
    }
}

/// Answer payload. The variant must line up with the question kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Answer {
    Scale(u8),
    Boolean(bool),
    /// Bare numeric value of the chosen option.
    Choice(f64),
    Selection(Vec<AnswerOption>),
}

impl Answer {
    pub const fn kind(&self) -> QuestionKind {
        match self {
            Answer::Scale(_) => QuestionKind::Scale,
            Answer::Boolean(_) => QuestionKind::Boolean,
            Answer::Choice(_) => QuestionKind::MultipleChoice,
            Answer::Selection(_) => QuestionKind::MultipleSelect,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnswerError {
    #[error("question {question} expects a {} answer, got {}", .expected.label(), .found.label())]
    KindMismatch {
        question: QuestionId,
        expected: QuestionKind,
        found: QuestionKind,
    },
    #[error("question {question} takes a value between 1 and 10, got {value}")]
    ScaleOutOfRange { question: QuestionId, value: u8 },
    #[error("question {question} has no option worth {value}")]
    UnknownChoice { question: QuestionId, value: f64 },
    #[error("question {question} has no option '{text}'")]
    UnknownSelection { question: QuestionId, text: String },
    #[error("question {question} has no option at position {index}")]
    UnknownOptionIndex { question: QuestionId, index: usize },
    #[error("quiz has no question {0}")]
    UnknownQuestion(QuestionId),
}

/// Answers collected for one quiz run, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: BTreeMap<QuestionId, Answer>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an answer, replacing any earlier one for the same question.
    pub fn record(&mut self, question: QuestionId, answer: Answer) -> Option<Answer> {
        self.answers.insert(question, answer)
    }

    pub fn get(&self, question: &QuestionId) -> Option<&Answer> {
        self.answers.get(question)
    }

    pub fn remove(&mut self, question: &QuestionId) -> Option<Answer> {
        self.answers.remove(question)
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &Answer)> {
        self.answers.iter()
    }

    pub fn answers(&self) -> impl Iterator<Item = &Answer> {
        self.answers.values()
    }
}

impl FromIterator<(QuestionId, Answer)> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = (QuestionId, Answer)>>(iter: T) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}

/// Score range mapped to result copy and a call to action. Both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBucket {
    pub min_score: f64,
    pub max_score: f64,
    pub title: String,
    pub description: String,
    pub recommendations: Vec<String>,
    pub cta_text: String,
    pub cta_link: String,
}

impl ResultBucket {
    pub fn contains(&self, score: f64) -> bool {
        self.min_score <= score && score <= self.max_score
    }
}

/// Contact details a visitor hands over for the full report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadInfo {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn answers_serialize_as_tagged_values() {
        let mut answers = AnswerSet::new();
        answers.record(QuestionId::new("motivation"), Answer::Scale(8));
        answers.record(QuestionId::new("capital"), Answer::Boolean(true));

        let value = serde_json::to_value(&answers).expect("serializes");
        assert_eq!(
            value,
            json!({
                "capital": { "type": "boolean", "value": true },
                "motivation": { "type": "scale", "value": 8 },
            })
        );
    }

    #[test]
    fn recording_twice_replaces_the_previous_answer() {
        let mut answers = AnswerSet::new();
        let id = QuestionId::new("motivation");
        answers.record(id.clone(), Answer::Scale(3));
        let previous = answers.record(id.clone(), Answer::Scale(9));

        assert_eq!(previous, Some(Answer::Scale(3)));
        assert_eq!(answers.get(&id), Some(&Answer::Scale(9)));
        assert_eq!(answers.len(), 1);
    }

    #[test]
    fn quiz_type_parses_slugs_leniently() {
        assert_eq!(QuizType::from_slug("readiness"), Some(QuizType::Readiness));
        assert_eq!(QuizType::from_slug(" Model-Fit "), Some(QuizType::ModelFit));
        assert_eq!(QuizType::from_slug("roi"), None);
    }
}
