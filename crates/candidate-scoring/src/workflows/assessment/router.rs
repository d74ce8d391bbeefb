use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{ApplicationId, SurveyResponse};
use super::repository::{RepositoryError, ScoreNotifier, ScoringRepository};
use super::scoring::RelevanceOracle;
use super::service::SurveyResponseService;

/// Router builder exposing HTTP endpoints for survey scoring and application lookups.
pub fn scoring_router<R, O, N>(service: Arc<SurveyResponseService<R, O, N>>) -> Router
where
    R: ScoringRepository + 'static,
    O: RelevanceOracle + ?Sized + 'static,
    N: ScoreNotifier + 'static,
{
    Router::new()
        .route("/api/v1/survey-responses", post(process_handler::<R, O, N>))
        .route(
            "/api/v1/applications/:application_id",
            get(status_handler::<R, O, N>),
        )
        .with_state(service)
}

pub(crate) async fn process_handler<R, O, N>(
    State(service): State<Arc<SurveyResponseService<R, O, N>>>,
    axum::Json(response): axum::Json<SurveyResponse>,
) -> Response
where
    R: ScoringRepository + 'static,
    O: RelevanceOracle + ?Sized + 'static,
    N: ScoreNotifier + 'static,
{
    let outcome = service.process(response);
    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, axum::Json(outcome)).into_response()
}

pub(crate) async fn status_handler<R, O, N>(
    State(service): State<Arc<SurveyResponseService<R, O, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ScoringRepository + 'static,
    O: RelevanceOracle + ?Sized + 'static,
    N: ScoreNotifier + 'static,
{
    let id = ApplicationId(application_id);
    match service.get(&id) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(RepositoryError::NotFound) => {
            let payload = json!({
                "error": format!("application {} not found", id.0),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
