use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{AnswerSet, LeadInfo, QuizType};
use super::outcome::QuizOutcome;
use super::repository::{AnalyticsSink, QuizResultId, QuizResultRepository, ReportGenerator};
use super::service::{QuizService, QuizServiceError};

const GENERIC_FAILURE: &str = "Došlo je do greške. Pokušajte ponovo.";

/// Router builder exposing quiz definitions, scoring, lead capture, and reports.
pub fn quiz_router<R, A, G>(service: Arc<QuizService<R, A, G>>) -> Router
where
    R: QuizResultRepository + 'static,
    A: AnalyticsSink + 'static,
    G: ReportGenerator + 'static,
{
    Router::new()
        .route("/api/v1/quizzes", get(list_handler::<R, A, G>))
        .route("/api/v1/quizzes/:quiz_type", get(definition_handler::<R, A, G>))
        .route(
            "/api/v1/quizzes/:quiz_type/evaluate",
            post(evaluate_handler::<R, A, G>),
        )
        .route(
            "/api/v1/quizzes/:quiz_type/leads",
            post(lead_handler::<R, A, G>),
        )
        .route(
            "/api/v1/quizzes/:quiz_type/report",
            post(report_handler::<R, A, G>),
        )
        .with_state(service)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateRequest {
    pub answers: AnswerSet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRequest {
    pub answers: AnswerSet,
    pub lead: LeadInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportBody {
    pub answers: AnswerSet,
    #[serde(default)]
    pub lead: Option<LeadInfo>,
}

/// Public view of a stored lead. The lead score stays internal.
#[derive(Debug, Clone, Serialize)]
pub struct LeadReceiptView {
    pub record_id: QuizResultId,
    pub result: QuizOutcome,
}

#[derive(Debug, Clone, Serialize)]
struct QuizSummaryView {
    quiz_type: QuizType,
    title: String,
    questions: usize,
}

pub(crate) async fn list_handler<R, A, G>(
    State(service): State<Arc<QuizService<R, A, G>>>,
) -> Response
where
    R: QuizResultRepository + 'static,
    A: AnalyticsSink + 'static,
    G: ReportGenerator + 'static,
{
    let quizzes: Vec<QuizSummaryView> = service
        .catalog()
        .definitions()
        .iter()
        .map(|quiz| QuizSummaryView {
            quiz_type: quiz.quiz_type,
            title: quiz.title.clone(),
            questions: quiz.len(),
        })
        .collect();

    (StatusCode::OK, axum::Json(quizzes)).into_response()
}

pub(crate) async fn definition_handler<R, A, G>(
    State(service): State<Arc<QuizService<R, A, G>>>,
    Path(quiz_type): Path<String>,
) -> Response
where
    R: QuizResultRepository + 'static,
    A: AnalyticsSink + 'static,
    G: ReportGenerator + 'static,
{
    let Some(quiz_type) = QuizType::from_slug(&quiz_type) else {
        return unknown_quiz(&quiz_type);
    };

    match service.definition(quiz_type) {
        Ok(quiz) => (StatusCode::OK, axum::Json(quiz.as_ref().clone())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn evaluate_handler<R, A, G>(
    State(service): State<Arc<QuizService<R, A, G>>>,
    Path(quiz_type): Path<String>,
    body: Result<axum::Json<EvaluateRequest>, JsonRejection>,
) -> Response
where
    R: QuizResultRepository + 'static,
    A: AnalyticsSink + 'static,
    G: ReportGenerator + 'static,
{
    let Some(quiz_type) = QuizType::from_slug(&quiz_type) else {
        return unknown_quiz(&quiz_type);
    };
    let axum::Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return malformed_body(rejection),
    };

    match service.evaluate(quiz_type, &request.answers) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn lead_handler<R, A, G>(
    State(service): State<Arc<QuizService<R, A, G>>>,
    Path(quiz_type): Path<String>,
    body: Result<axum::Json<LeadRequest>, JsonRejection>,
) -> Response
where
    R: QuizResultRepository + 'static,
    A: AnalyticsSink + 'static,
    G: ReportGenerator + 'static,
{
    let Some(quiz_type) = QuizType::from_slug(&quiz_type) else {
        return unknown_quiz(&quiz_type);
    };
    let axum::Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return malformed_body(rejection),
    };

    match service.submit_lead(quiz_type, request.answers, request.lead) {
        Ok(receipt) => {
            let view = LeadReceiptView {
                record_id: receipt.record.record_id,
                result: receipt.outcome,
            };
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn report_handler<R, A, G>(
    State(service): State<Arc<QuizService<R, A, G>>>,
    Path(quiz_type): Path<String>,
    body: Result<axum::Json<ReportBody>, JsonRejection>,
) -> Response
where
    R: QuizResultRepository + 'static,
    A: AnalyticsSink + 'static,
    G: ReportGenerator + 'static,
{
    let Some(quiz_type) = QuizType::from_slug(&quiz_type) else {
        return unknown_quiz(&quiz_type);
    };
    let axum::Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return malformed_body(rejection),
    };

    match service.generate_report(quiz_type, request.answers, request.lead) {
        Ok(document) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, document.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", document.file_name),
                ),
            ],
            document.bytes,
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

fn unknown_quiz(raw: &str) -> Response {
    let payload = json!({ "error": format!("unknown quiz '{raw}'") });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

/// Bodies that fail to parse get the same 400 JSON shape as answers that fail validation.
fn malformed_body(rejection: JsonRejection) -> Response {
    let payload = json!({ "error": rejection.body_text() });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn error_response(err: QuizServiceError) -> Response {
    match err {
        QuizServiceError::QuizNotConfigured(_) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        QuizServiceError::Answer(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        QuizServiceError::Lead(error) => {
            let payload = json!({
                "error": error.to_string(),
                "fields": error.fields,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        QuizServiceError::Session(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        QuizServiceError::Repository(_)
        | QuizServiceError::Report(_)
        | QuizServiceError::NoResultBuckets(_) => {
            let payload = json!({ "error": GENERIC_FAILURE });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
