//! JSON HTTP API over [`LookupService`].
//!
//! Routes:
//! - `GET  /health`
//! - `GET  /trainers/search?q=..&limit=..`
//! - `GET  /trainers/{trainer_id}`
//! - `GET  /pools/{pool_id}`
//! - `POST /pools/{pool_id}/filter` with `{"seen_global_ids": [..]}`

use crate::errors::LookupError;
use crate::search::{clamp_limit, DEFAULT_SEARCH_LIMIT};
use crate::service::{FilterRequest, FilterResult, LookupService, PoolSummary, SearchResult, TrainerDetail};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub type AppState = Arc<LookupService>;

/// A [`LookupError`] rendered as `{"detail": ...}` with a matching status.
pub struct ApiError(LookupError);

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            LookupError::TrainerNotFound(_)
            | LookupError::PoolNotFound(_)
            | LookupError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            LookupError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            LookupError::DataIntegrity(_) => {
                error!("{}", self.0);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: String,
    /// Out of range values (including negative ones) are clamped, not rejected.
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_SEARCH_LIMIT as i64
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

async fn search_trainers(
    State(service): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    Ok(Json(service.search(&params.q, clamp_limit(params.limit))?))
}

async fn trainer_detail(
    State(service): State<AppState>,
    Path(trainer_id): Path<String>,
) -> Result<Json<TrainerDetail>, ApiError> {
    Ok(Json(service.trainer_detail(&trainer_id)?))
}

async fn pool_summary(
    State(service): State<AppState>,
    Path(pool_id): Path<String>,
) -> Result<Json<PoolSummary>, ApiError> {
    Ok(Json(service.pool_summary(&pool_id)?))
}

async fn filter_pool(
    State(service): State<AppState>,
    Path(pool_id): Path<String>,
    Json(request): Json<FilterRequest>,
) -> Result<Json<FilterResult>, ApiError> {
    Ok(Json(service.filter(&pool_id, &request.seen_global_ids)?))
}

/// CORS for the given origins, or `None` when the list is empty.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    if allowed.is_empty() {
        return None;
    }

    info!(origins = ?origins, "CORS enabled");
    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_credentials(true)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request()),
    )
}

pub fn router(service: AppState, cors_origins: &[String]) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/trainers/search", get(search_trainers))
        .route("/trainers/{trainer_id}", get(trainer_detail))
        .route("/pools/{pool_id}", get(pool_summary))
        .route("/pools/{pool_id}/filter", post(filter_pool))
        .with_state(service)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(cors_origins) {
        app = app.layer(cors);
    }
    app
}
