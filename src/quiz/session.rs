use std::sync::Arc;

use serde::Serialize;

use super::catalog::QuizDefinition;
use super::domain::{
    Answer, AnswerError, AnswerSet, LeadInfo, Question, QuestionId, QuestionKind, QuizType,
};
use super::lead::{LeadGate, LeadValidationError};
use super::outcome::{LeadCapture, QuizOutcome};
use super::scoring::QuizScorer;

/// Where a visitor is in a quiz run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QuizState {
    Answering {
        index: usize,
    },
    Completed {
        outcome: QuizOutcome,
    },
    LeadCaptured {
        outcome: QuizOutcome,
        capture: LeadCapture,
    },
}

impl QuizState {
    pub const fn label(&self) -> &'static str {
        match self {
            QuizState::Answering { .. } => "answering",
            QuizState::Completed { .. } => "completed",
            QuizState::LeadCaptured { .. } => "lead_captured",
        }
    }

    pub fn outcome(&self) -> Option<&QuizOutcome> {
        match self {
            QuizState::Answering { .. } => None,
            QuizState::Completed { outcome } | QuizState::LeadCaptured { outcome, .. } => {
                Some(outcome)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("quiz is not accepting answers in the {0} state")]
    NotAnswering(&'static str),
    #[error("quiz must be completed before leaving contact details (currently {0})")]
    NotCompleted(&'static str),
    #[error("already at the first question")]
    AtFirstQuestion,
    #[error("question {0} has not been answered yet")]
    Unanswered(QuestionId),
    #[error("question {question} is a {} question and has no options to pick", .kind.label())]
    NotSelectable {
        question: QuestionId,
        kind: QuestionKind,
    },
    #[error("quiz {0} has no result buckets")]
    NoResultBuckets(QuizType),
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error(transparent)]
    Lead(#[from] LeadValidationError),
}

/// One visitor's run through a quiz. Single-owner state; nothing here is shared.
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: Arc<QuizDefinition>,
    scorer: QuizScorer,
    answers: AnswerSet,
    state: QuizState,
}

impl QuizSession {
    pub fn new(quiz: Arc<QuizDefinition>) -> Self {
        Self {
            quiz,
            scorer: QuizScorer::new(),
            answers: AnswerSet::new(),
            state: QuizState::Answering { index: 0 },
        }
    }

    pub fn quiz(&self) -> &QuizDefinition {
        &self.quiz
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            QuizState::Answering { index } => Some(index),
            _ => None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_index()
            .and_then(|index| self.quiz.question(index))
    }

    /// Record an answer for the current question.
    ///
    /// Scale, boolean, and multiple-choice answers move on to the next question (or finish
    /// the quiz); a multiple-select answer stays put until [`QuizSession::next`].
    pub fn answer(&mut self, answer: Answer) -> Result<&QuizState, SessionError> {
        let (index, question) = self.answering()?;
        question.accepts(&answer)?;

        let auto_advance = question.kind.auto_advances();
        let id = question.id.clone();
        self.answers.record(id, answer);

        if auto_advance {
            self.advance_from(index)?;
        }
        Ok(&self.state)
    }

    /// Pick an option on the current question by position.
    ///
    /// Multiple choice records the option's value and advances. Multiple select toggles the
    /// option in the running selection.
    pub fn select_option(&mut self, option_index: usize) -> Result<&QuizState, SessionError> {
        let (_, question) = self.answering()?;
        let option = question
            .option(option_index)
            .cloned()
            .ok_or_else(|| AnswerError::UnknownOptionIndex {
                question: question.id.clone(),
                index: option_index,
            })?;

        match question.kind {
            QuestionKind::MultipleChoice => self.answer(Answer::Choice(option.value)),
            QuestionKind::MultipleSelect => {
                let id = question.id.clone();
                let mut selected = match self.answers.get(&id) {
                    Some(Answer::Selection(selected)) => selected.clone(),
                    _ => Vec::new(),
                };
                match selected.iter().position(|candidate| *candidate == option) {
                    Some(position) => {
                        selected.remove(position);
                    }
                    None => selected.push(option),
                }
                self.answers.record(id, Answer::Selection(selected));
                Ok(&self.state)
            }
            kind => Err(SessionError::NotSelectable {
                question: question.id.clone(),
                kind,
            }),
        }
    }

    /// Explicit "next". Required for multiple select; an empty selection is recorded as such.
    pub fn next(&mut self) -> Result<&QuizState, SessionError> {
        let (index, question) = self.answering()?;
        let id = question.id.clone();
        let kind = question.kind;

        if self.answers.get(&id).is_none() {
            if kind == QuestionKind::MultipleSelect {
                self.answers.record(id, Answer::Selection(Vec::new()));
            } else {
                return Err(SessionError::Unanswered(id));
            }
        }

        self.advance_from(index)?;
        Ok(&self.state)
    }

    /// Step back one question. Answers already given are kept.
    pub fn back(&mut self) -> Result<&QuizState, SessionError> {
        match self.state {
            QuizState::Answering { index: 0 } => Err(SessionError::AtFirstQuestion),
            QuizState::Answering { index } => {
                self.state = QuizState::Answering { index: index - 1 };
                Ok(&self.state)
            }
            ref other => Err(SessionError::NotAnswering(other.label())),
        }
    }

    /// Start over from the first question with no answers.
    pub fn retake(&mut self) -> &QuizState {
        self.answers.clear();
        self.state = QuizState::Answering { index: 0 };
        &self.state
    }

    /// Validate and score contact details against the completed outcome without moving on.
    pub fn prepare_lead(
        &self,
        gate: &LeadGate,
        lead: LeadInfo,
    ) -> Result<LeadCapture, SessionError> {
        let outcome = match &self.state {
            QuizState::Completed { outcome } => outcome,
            other => return Err(SessionError::NotCompleted(other.label())),
        };

        let lead = gate.validate(lead)?;
        let lead_score = gate.score(outcome.quiz_type, &outcome.result, &self.answers);
        Ok(LeadCapture { lead, lead_score })
    }

    /// Accept contact details after completion. Invalid details leave the session completed.
    pub fn capture_lead(
        &mut self,
        gate: &LeadGate,
        lead: LeadInfo,
    ) -> Result<LeadCapture, SessionError> {
        let capture = self.prepare_lead(gate, lead)?;
        self.confirm_lead(capture.clone())?;
        Ok(capture)
    }

    pub(crate) fn confirm_lead(&mut self, capture: LeadCapture) -> Result<(), SessionError> {
        let outcome = match &self.state {
            QuizState::Completed { outcome } => outcome.clone(),
            other => return Err(SessionError::NotCompleted(other.label())),
        };
        self.state = QuizState::LeadCaptured { outcome, capture };
        Ok(())
    }

    fn answering(&self) -> Result<(usize, &Question), SessionError> {
        match self.state {
            QuizState::Answering { index } => self
                .quiz
                .question(index)
                .map(|question| (index, question))
                .ok_or(SessionError::NotAnswering("answering")),
            ref other => Err(SessionError::NotAnswering(other.label())),
        }
    }

    fn advance_from(&mut self, index: usize) -> Result<(), SessionError> {
        if index + 1 < self.quiz.len() {
            self.state = QuizState::Answering { index: index + 1 };
            return Ok(());
        }

        let outcome = QuizOutcome::evaluate(&self.scorer, &self.quiz, &self.answers)
            .ok_or(SessionError::NoResultBuckets(self.quiz.quiz_type))?;
        self.state = QuizState::Completed { outcome };
        Ok(())
    }
}
