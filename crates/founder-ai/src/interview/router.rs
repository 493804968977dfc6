use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AnswerValue, SessionId};
use super::repository::{EnrichmentSink, ProfileRepository};
use super::service::{InterviewService, InterviewServiceError};
use super::session::SessionError;

/// Router builder exposing the interview flow endpoints.
pub fn interview_router<R, E>(service: Arc<InterviewService<R, E>>) -> Router
where
    R: ProfileRepository + 'static,
    E: EnrichmentSink + 'static,
{
    Router::new()
        .route("/api/v1/interviews", post(start_handler::<R, E>))
        .route(
            "/api/v1/interviews/:session_id",
            get(state_handler::<R, E>).delete(release_handler::<R, E>),
        )
        .route(
            "/api/v1/interviews/:session_id/answers",
            post(answer_handler::<R, E>),
        )
        .route(
            "/api/v1/interviews/:session_id/back",
            post(back_handler::<R, E>),
        )
        .route(
            "/api/v1/interviews/:session_id/profile",
            get(profile_handler::<R, E>),
        )
        .with_state(service)
}

/// Body for committing an answer: a bare string or an array of selections.
#[derive(Debug, Deserialize)]
pub(crate) struct SubmitAnswerRequest {
    pub value: AnswerValue,
}

pub(crate) async fn start_handler<R, E>(
    State(service): State<Arc<InterviewService<R, E>>>,
) -> Response
where
    R: ProfileRepository + 'static,
    E: EnrichmentSink + 'static,
{
    match service.start() {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn state_handler<R, E>(
    State(service): State<Arc<InterviewService<R, E>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    E: EnrichmentSink + 'static,
{
    let id = SessionId(session_id);
    match service.state(&id) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn answer_handler<R, E>(
    State(service): State<Arc<InterviewService<R, E>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<SubmitAnswerRequest>,
) -> Response
where
    R: ProfileRepository + 'static,
    E: EnrichmentSink + 'static,
{
    let id = SessionId(session_id);
    match service.submit(&id, request.value) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn back_handler<R, E>(
    State(service): State<Arc<InterviewService<R, E>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    E: EnrichmentSink + 'static,
{
    let id = SessionId(session_id);
    match service.back(&id) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn profile_handler<R, E>(
    State(service): State<Arc<InterviewService<R, E>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    E: EnrichmentSink + 'static,
{
    let id = SessionId(session_id);
    match service.profile(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn release_handler<R, E>(
    State(service): State<Arc<InterviewService<R, E>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    E: EnrichmentSink + 'static,
{
    let id = SessionId(session_id);
    match service.release(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: InterviewServiceError) -> Response {
    let status = match &error {
        InterviewServiceError::UnknownSession(_) => StatusCode::NOT_FOUND,
        InterviewServiceError::Session(SessionError::InvalidAnswerKind { .. }) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        InterviewServiceError::Session(_) | InterviewServiceError::ProfileNotReady { .. } => {
            StatusCode::CONFLICT
        }
        InterviewServiceError::AtCapacity(_) => StatusCode::SERVICE_UNAVAILABLE,
        InterviewServiceError::Repository(_) | InterviewServiceError::Enrichment(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
