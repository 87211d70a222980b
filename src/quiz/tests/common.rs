use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::quiz::catalog::{QuizCatalog, QuizDefinition};
use crate::quiz::domain::{
    Answer, AnswerOption, AnswerSet, LeadInfo, Question, QuestionId, QuestionKind, QuizType,
    ResultBucket,
};
use crate::quiz::lead::LeadScoreConfig;
use crate::quiz::repository::{
    AnalyticsError, AnalyticsEvent, AnalyticsSink, QuizResultId, QuizResultRecord,
    QuizResultRepository, ReportDocument, ReportError, ReportGenerator, ReportRequest,
    RepositoryError,
};
use crate::quiz::service::QuizService;

pub(super) fn readiness() -> Arc<QuizDefinition> {
    QuizCatalog::standard()
        .definition(QuizType::Readiness)
        .cloned()
        .expect("readiness quiz configured")
}

pub(super) fn model_fit() -> Arc<QuizDefinition> {
    QuizCatalog::standard()
        .definition(QuizType::ModelFit)
        .cloned()
        .expect("model fit quiz configured")
}

/// Every readiness question answered at its best: scales at 10, booleans true.
pub(super) fn perfect_readiness_answers() -> AnswerSet {
    readiness()
        .questions
        .iter()
        .map(|question| {
            let answer = match question.kind {
                QuestionKind::Scale => Answer::Scale(10),
                QuestionKind::Boolean => Answer::Boolean(true),
                other => panic!("readiness quiz has unexpected {other:?} question"),
            };
            (question.id.clone(), answer)
        })
        .collect()
}

/// Lukewarm readiness answers: scales at 5, booleans false.
pub(super) fn lukewarm_readiness_answers() -> AnswerSet {
    readiness()
        .questions
        .iter()
        .map(|question| {
            let answer = match question.kind {
                QuestionKind::Scale => Answer::Scale(5),
                _ => Answer::Boolean(false),
            };
            (question.id.clone(), answer)
        })
        .collect()
}

pub(super) fn option(text: &str, value: f64) -> AnswerOption {
    AnswerOption {
        text: text.to_string(),
        value,
        category: None,
    }
}

pub(super) fn question(id: &str, kind: QuestionKind, weight: f64) -> Question {
    Question {
        id: QuestionId::new(id),
        text: format!("Question {id}"),
        kind,
        options: Vec::new(),
        weight,
    }
}

pub(super) fn bucket(min: f64, max: f64, title: &str) -> ResultBucket {
    ResultBucket {
        min_score: min,
        max_score: max,
        title: title.to_string(),
        description: format!("{title} description"),
        recommendations: vec![format!("{title} next step")],
        cta_text: "Kontakt".to_string(),
        cta_link: "/kontakt".to_string(),
    }
}

pub(super) fn single_question_quiz(question: Question) -> QuizDefinition {
    QuizDefinition {
        quiz_type: QuizType::ModelFit,
        title: "Test quiz".to_string(),
        intro: String::new(),
        questions: vec![question],
        buckets: vec![bucket(0.0, 100.0, "Any")],
    }
}

pub(super) fn lead() -> LeadInfo {
    LeadInfo {
        name: "Jelena Petrović".to_string(),
        email: "jelena@example.rs".to_string(),
        phone: Some("+381 64 123 4567".to_string()),
    }
}

pub(super) fn build_service() -> (
    QuizService<MemoryRepository, MemoryAnalytics, MemoryReports>,
    Arc<MemoryRepository>,
    Arc<MemoryAnalytics>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let analytics = Arc::new(MemoryAnalytics::default());
    let service = QuizService::new(
        repository.clone(),
        analytics.clone(),
        Arc::new(MemoryReports),
        LeadScoreConfig::default(),
    );
    (service, repository, analytics)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<QuizResultId, QuizResultRecord>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl QuizResultRepository for MemoryRepository {
    fn save(&self, record: QuizResultRecord) -> Result<QuizResultRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.record_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.record_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &QuizResultId) -> Result<Option<QuizResultRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableRepository;

impl QuizResultRepository for UnavailableRepository {
    fn save(&self, _record: QuizResultRecord) -> Result<QuizResultRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("cms offline".to_string()))
    }

    fn fetch(&self, _id: &QuizResultId) -> Result<Option<QuizResultRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("cms offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAnalytics {
    events: Arc<Mutex<Vec<AnalyticsEvent>>>,
}

impl MemoryAnalytics {
    pub(super) fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().expect("analytics mutex poisoned").clone()
    }

    pub(super) fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(AnalyticsEvent::name).collect()
    }
}

impl AnalyticsSink for MemoryAnalytics {
    fn track(&self, event: AnalyticsEvent) -> Result<(), AnalyticsError> {
        self.events
            .lock()
            .expect("analytics mutex poisoned")
            .push(event);
        Ok(())
    }
}

pub(super) struct BrokenAnalytics;

impl AnalyticsSink for BrokenAnalytics {
    fn track(&self, _event: AnalyticsEvent) -> Result<(), AnalyticsError> {
        Err(AnalyticsError::Transport("collector down".to_string()))
    }
}

pub(super) struct MemoryReports;

impl ReportGenerator for MemoryReports {
    fn generate(&self, request: ReportRequest) -> Result<ReportDocument, ReportError> {
        Ok(ReportDocument {
            file_name: format!("{}.txt", request.outcome.quiz_type),
            content_type: mime::TEXT_PLAIN_UTF_8,
            bytes: request.outcome.result.title.into_bytes(),
        })
    }
}

pub(super) struct FailingReports;

impl ReportGenerator for FailingReports {
    fn generate(&self, _request: ReportRequest) -> Result<ReportDocument, ReportError> {
        Err(ReportError::Rendering("font missing".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
