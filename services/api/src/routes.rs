use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use founder_ai::interview::{
    interview_router, EnrichmentSink, InterviewService, ProfileRecord, ProfileRepository,
    SessionId,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

const MAX_PROFILE_REPORT_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileReportRequest {
    #[serde(default = "default_profile_limit")]
    pub(crate) limit: usize,
}

fn default_profile_limit() -> usize {
    20
}

#[derive(Debug, Serialize)]
pub(crate) struct ProfileReportResponse {
    pub(crate) count: usize,
    pub(crate) profiles: Vec<ProfileSummary>,
}

/// One completed interview condensed for the report listing.
#[derive(Debug, Serialize)]
pub(crate) struct ProfileSummary {
    pub(crate) session_id: SessionId,
    pub(crate) completed_at: DateTime<Utc>,
    pub(crate) confidence: u8,
    pub(crate) answered: usize,
    pub(crate) signals: Vec<&'static str>,
}

impl ProfileSummary {
    fn from_record(record: &ProfileRecord) -> Self {
        Self {
            session_id: record.session_id.clone(),
            completed_at: record.completed_at,
            confidence: record.snapshot.confidence,
            answered: record.snapshot.answers.len(),
            signals: record.snapshot.signals.clone(),
        }
    }
}

pub(crate) fn with_interview_routes<R, E>(service: Arc<InterviewService<R, E>>) -> axum::Router
where
    R: ProfileRepository + 'static,
    E: EnrichmentSink + 'static,
{
    interview_router(service.clone())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/catalog", axum::routing::get(catalog_endpoint))
        .route(
            "/api/v1/profiles/report",
            axum::routing::post(profile_report_endpoint::<R, E>).with_state(service),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn catalog_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    Json(state.outline.as_ref().clone())
}

pub(crate) async fn profile_report_endpoint<R, E>(
    State(service): State<Arc<InterviewService<R, E>>>,
    Json(request): Json<ProfileReportRequest>,
) -> Response
where
    R: ProfileRepository + 'static,
    E: EnrichmentSink + 'static,
{
    let limit = request.limit.min(MAX_PROFILE_REPORT_LIMIT);
    match service.completed_profiles(limit) {
        Ok(records) => {
            let profiles: Vec<ProfileSummary> =
                records.iter().map(ProfileSummary::from_record).collect();
            let response = ProfileReportResponse {
                count: profiles.len(),
                profiles,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}
