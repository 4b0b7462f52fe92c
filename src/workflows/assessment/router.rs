use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::QuestionDefinition;
use super::graph::{render_decision_tree, render_disorder_tree};
use super::repository::{RepositoryError, SessionId, SessionRepository};
use super::service::{AssessmentService, AssessmentServiceError};

/// Router builder exposing HTTP endpoints for assessment sessions.
pub fn assessment_router<R>(service: Arc<AssessmentService<R>>) -> Router
where
    R: SessionRepository + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(start_handler::<R>))
        .route(
            "/api/v1/assessments/:session_id",
            get(status_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:session_id/answers",
            post(answer_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:session_id/back",
            post(back_handler::<R>),
        )
        .route("/api/v1/questions", get(questions_handler::<R>))
        .route("/api/v1/graph", get(graph_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerSubmission {
    #[serde(default)]
    pub(crate) severity: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GraphQuery {
    #[serde(default)]
    pub(crate) disorder: Option<String>,
}

pub(crate) async fn start_handler<R>(State(service): State<Arc<AssessmentService<R>>>) -> Response
where
    R: SessionRepository + 'static,
{
    match service.start() {
        Ok(record) => {
            let view = record.status_view(service.engine().catalog());
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.get(&SessionId(session_id)) {
        Ok(record) => {
            let view = record.status_view(service.engine().catalog());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn answer_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(session_id): Path<String>,
    axum::Json(submission): axum::Json<AnswerSubmission>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.submit(&SessionId(session_id), &submission.severity) {
        Ok(record) => {
            let view = record.status_view(service.engine().catalog());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn back_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.back(&SessionId(session_id)) {
        Ok(record) => {
            let view = record.status_view(service.engine().catalog());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn questions_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
) -> axum::Json<Vec<QuestionDefinition>>
where
    R: SessionRepository + 'static,
{
    axum::Json(service.engine().catalog().questions().to_vec())
}

pub(crate) async fn graph_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Query(query): Query<GraphQuery>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let engine = service.engine();
    let rendered = match query.disorder {
        Some(code) => render_disorder_tree(engine.catalog(), engine.diagnosis_rules(), &code),
        None => Ok(render_decision_tree(
            engine.catalog(),
            engine.diagnosis_rules(),
        )),
    };

    match rendered {
        Ok(dot) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/vnd.graphviz; charset=utf-8")],
            dot,
        )
            .into_response(),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

fn error_response(err: AssessmentServiceError) -> Response {
    let status = match &err {
        AssessmentServiceError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AssessmentServiceError::AlreadyComplete => StatusCode::CONFLICT,
        AssessmentServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Repository(RepositoryError::Conflict | RepositoryError::Stale) => {
            StatusCode::CONFLICT
        }
        AssessmentServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
