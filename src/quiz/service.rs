use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use super::catalog::{QuizCatalog, QuizDefinition};
use super::domain::{Answer, AnswerError, AnswerSet, LeadInfo, QuestionId, QuizType};
use super::lead::{LeadGate, LeadScoreConfig, LeadValidationError};
use super::outcome::{LeadCapture, QuizOutcome};
use super::repository::{
    AnalyticsEvent, AnalyticsSink, QuizResultId, QuizResultRecord, QuizResultRepository,
    RepositoryError, ReportDocument, ReportError, ReportGenerator, ReportRequest,
};
use super::scoring::QuizScorer;
use super::session::{QuizSession, QuizState, SessionError};

/// Service composing the catalog, scorer, lead gate, and outbound collaborators.
pub struct QuizService<R, A, G> {
    catalog: Arc<QuizCatalog>,
    scorer: QuizScorer,
    gate: Arc<LeadGate>,
    repository: Arc<R>,
    analytics: Arc<A>,
    reports: Arc<G>,
}

static RESULT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_result_id() -> QuizResultId {
    let id = RESULT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    QuizResultId(format!("quiz-result-{id:06}"))
}

/// Stored result handed back after a successful lead submission.
#[derive(Debug, Clone)]
pub struct LeadReceipt {
    pub record: QuizResultRecord,
    pub outcome: QuizOutcome,
}

impl<R, A, G> QuizService<R, A, G>
where
    R: QuizResultRepository + 'static,
    A: AnalyticsSink + 'static,
    G: ReportGenerator + 'static,
{
    pub fn new(
        repository: Arc<R>,
        analytics: Arc<A>,
        reports: Arc<G>,
        lead_scoring: LeadScoreConfig,
    ) -> Self {
        Self::with_catalog(
            QuizCatalog::standard(),
            repository,
            analytics,
            reports,
            lead_scoring,
        )
    }

    pub fn with_catalog(
        catalog: QuizCatalog,
        repository: Arc<R>,
        analytics: Arc<A>,
        reports: Arc<G>,
        lead_scoring: LeadScoreConfig,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            scorer: QuizScorer::new(),
            gate: Arc::new(LeadGate::new(lead_scoring)),
            repository,
            analytics,
            reports,
        }
    }

    pub fn catalog(&self) -> &QuizCatalog {
        &self.catalog
    }

    pub fn definition(
        &self,
        quiz_type: QuizType,
    ) -> Result<Arc<QuizDefinition>, QuizServiceError> {
        self.catalog
            .definition(quiz_type)
            .cloned()
            .ok_or(QuizServiceError::QuizNotConfigured(quiz_type))
    }

    pub fn start_session(&self, quiz_type: QuizType) -> Result<QuizSession, QuizServiceError> {
        let quiz = self.definition(quiz_type)?;
        Ok(QuizSession::new(quiz))
    }

    /// Answer the session's current question and emit the matching analytics events.
    pub fn record_answer<'s>(
        &self,
        session: &'s mut QuizSession,
        answer: Answer,
    ) -> Result<&'s QuizState, QuizServiceError> {
        let position = current_position(session);
        session.answer(answer)?;
        self.after_step(session, position);
        Ok(session.state())
    }

    pub fn select_option<'s>(
        &self,
        session: &'s mut QuizSession,
        option_index: usize,
    ) -> Result<&'s QuizState, QuizServiceError> {
        let position = current_position(session);
        session.select_option(option_index)?;
        self.after_step(session, position);
        Ok(session.state())
    }

    pub fn advance<'s>(
        &self,
        session: &'s mut QuizSession,
    ) -> Result<&'s QuizState, QuizServiceError> {
        let position = current_position(session);
        session.next()?;
        self.after_step(session, position);
        Ok(session.state())
    }

    pub fn go_back<'s>(
        &self,
        session: &'s mut QuizSession,
    ) -> Result<&'s QuizState, QuizServiceError> {
        Ok(session.back()?)
    }

    pub fn retake<'s>(&self, session: &'s mut QuizSession) -> &'s QuizState {
        self.emit(AnalyticsEvent::QuizRetaken {
            quiz_type: session.quiz().quiz_type,
        });
        session.retake()
    }

    /// Validate the lead, store the result, then mark the session as captured.
    ///
    /// A failed save leaves the session completed so the visitor can submit again.
    pub fn capture_lead(
        &self,
        session: &mut QuizSession,
        lead: LeadInfo,
    ) -> Result<QuizResultRecord, QuizServiceError> {
        let capture = session.prepare_lead(&self.gate, lead)?;
        let outcome = session
            .state()
            .outcome()
            .cloned()
            .ok_or(SessionError::NotCompleted(session.state().label()))?;

        let record = self.persist(&outcome, session.answers().clone(), &capture)?;
        session.confirm_lead(capture)?;
        Ok(record)
    }

    /// Render the detailed report for a finished session.
    pub fn session_report(
        &self,
        session: &QuizSession,
    ) -> Result<ReportDocument, QuizServiceError> {
        let outcome = session
            .state()
            .outcome()
            .cloned()
            .ok_or(SessionError::NotCompleted(session.state().label()))?;
        let lead = match session.state() {
            QuizState::LeadCaptured { capture, .. } => Some(capture.lead.clone()),
            _ => None,
        };

        self.render_report(session.quiz(), outcome, session.answers().clone(), lead)
    }

    /// Score a complete answer set in one call.
    pub fn evaluate(
        &self,
        quiz_type: QuizType,
        answers: &AnswerSet,
    ) -> Result<QuizOutcome, QuizServiceError> {
        let quiz = self.definition(quiz_type)?;
        let outcome = self.evaluate_answers(&quiz, answers)?;

        info!(
            quiz = %quiz_type,
            score = outcome.score,
            result = %outcome.result.title,
            "quiz evaluated"
        );
        self.emit(AnalyticsEvent::QuizCompleted {
            quiz_type,
            score: outcome.score,
            result_title: outcome.result.title.clone(),
        });

        Ok(outcome)
    }

    /// Lead form submission: validate before anything leaves the process, then store.
    pub fn submit_lead(
        &self,
        quiz_type: QuizType,
        answers: AnswerSet,
        lead: LeadInfo,
    ) -> Result<LeadReceipt, QuizServiceError> {
        let quiz = self.definition(quiz_type)?;
        let lead = self.gate.validate(lead)?;
        let outcome = self.evaluate_answers(&quiz, &answers)?;

        let lead_score = self.gate.score(quiz_type, &outcome.result, &answers);
        let capture = LeadCapture { lead, lead_score };
        let record = self.persist(&outcome, answers, &capture)?;

        Ok(LeadReceipt { record, outcome })
    }

    /// Produce the downloadable report. Runs independently of CMS persistence.
    pub fn generate_report(
        &self,
        quiz_type: QuizType,
        answers: AnswerSet,
        lead: Option<LeadInfo>,
    ) -> Result<ReportDocument, QuizServiceError> {
        let quiz = self.definition(quiz_type)?;
        let lead = lead.map(|lead| self.gate.validate(lead)).transpose()?;
        let outcome = self.evaluate_answers(&quiz, &answers)?;

        self.render_report(&quiz, outcome, answers, lead)
    }

    /// Fetch a stored result.
    pub fn result(&self, id: &QuizResultId) -> Result<QuizResultRecord, QuizServiceError> {
        let record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    fn evaluate_answers(
        &self,
        quiz: &QuizDefinition,
        answers: &AnswerSet,
    ) -> Result<QuizOutcome, QuizServiceError> {
        validate_answers(quiz, answers)?;
        QuizOutcome::evaluate(&self.scorer, quiz, answers)
            .ok_or(QuizServiceError::NoResultBuckets(quiz.quiz_type))
    }

    fn persist(
        &self,
        outcome: &QuizOutcome,
        answers: AnswerSet,
        capture: &LeadCapture,
    ) -> Result<QuizResultRecord, QuizServiceError> {
        let record = QuizResultRecord {
            record_id: next_result_id(),
            quiz_type: outcome.quiz_type,
            answers,
            score: outcome.score,
            result_title: outcome.result.title.clone(),
            lead: capture.lead.clone(),
            lead_score: capture.lead_score,
            submitted_at: Utc::now(),
        };

        let stored = self.repository.save(record).map_err(|err| {
            error!(quiz = %outcome.quiz_type, error = %err, "failed to store quiz result");
            QuizServiceError::from(err)
        })?;

        info!(
            quiz = %stored.quiz_type,
            record = %stored.record_id.0,
            lead_score = stored.lead_score,
            "lead captured"
        );
        self.emit(AnalyticsEvent::LeadCaptured {
            quiz_type: stored.quiz_type,
            lead_score: stored.lead_score,
        });

        Ok(stored)
    }

    fn render_report(
        &self,
        quiz: &QuizDefinition,
        outcome: QuizOutcome,
        answers: AnswerSet,
        lead: Option<LeadInfo>,
    ) -> Result<ReportDocument, QuizServiceError> {
        let quiz_type = quiz.quiz_type;
        let request = ReportRequest {
            quiz_title: quiz.title.clone(),
            outcome,
            answers,
            lead,
            generated_at: Utc::now(),
        };

        self.reports.generate(request).map_err(|err| {
            error!(quiz = %quiz_type, error = %err, "failed to generate quiz report");
            QuizServiceError::from(err)
        })
    }

    fn after_step(&self, session: &QuizSession, position: Option<(usize, QuestionId)>) {
        let quiz_type = session.quiz().quiz_type;

        if let Some((index, question)) = position {
            if session.answers().get(&question).is_some() {
                self.emit(AnalyticsEvent::AnswerRecorded {
                    quiz_type,
                    question,
                    index,
                });
            }
        }

        if let QuizState::Completed { outcome } = session.state() {
            info!(
                quiz = %quiz_type,
                score = outcome.score,
                result = %outcome.result.title,
                "quiz completed"
            );
            self.emit(AnalyticsEvent::QuizCompleted {
                quiz_type,
                score: outcome.score,
                result_title: outcome.result.title.clone(),
            });
        }
    }

    fn emit(&self, event: AnalyticsEvent) {
        let name = event.name();
        if let Err(err) = self.analytics.track(event) {
            warn!(event = name, error = %err, "analytics event dropped");
        }
    }
}

fn current_position(session: &QuizSession) -> Option<(usize, QuestionId)> {
    let index = session.current_index()?;
    let question = session.current_question()?;
    Some((index, question.id.clone()))
}

/// Every answer must belong to the quiz and fit its question.
pub fn validate_answers(quiz: &QuizDefinition, answers: &AnswerSet) -> Result<(), AnswerError> {
    for (id, answer) in answers.iter() {
        let question = quiz
            .question_by_id(id)
            .ok_or_else(|| AnswerError::UnknownQuestion(id.clone()))?;
        question.accepts(answer)?;
    }
    Ok(())
}

/// Error raised by the quiz service.
#[derive(Debug, thiserror::Error)]
pub enum QuizServiceError {
    #[error("quiz {0} is not configured")]
    QuizNotConfigured(QuizType),
    #[error("quiz {0} has no result buckets")]
    NoResultBuckets(QuizType),
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Lead(#[from] LeadValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Report(#[from] ReportError),
}
