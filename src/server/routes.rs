//! HTTP API routes
//!
//! The browser page renders the map and forwards clicks here; everything it
//! displays comes from `/api/view`.

use crate::config::Credentials;
use crate::describe::LocationDetailService;
use crate::error::Error;
use crate::map::readiness::MapStatus;
use crate::map::Viewport;
use crate::server::state::{AppState, PageView};

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Create the API router
pub fn create_router<S>(state: Arc<AppState<S>>, static_dir: &Path) -> Router
where
    S: LocationDetailService + 'static,
{
    Router::new()
        .route("/api/view", get(view_handler::<S>))
        .route("/api/select", post(select_handler::<S>))
        .route("/api/details", post(details_handler::<S>))
        .route("/api/map", get(map_handler::<S>))
        .route("/api/map/ready", post(map_ready_handler::<S>))
        .route("/api/status", get(status_handler::<S>))
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
        .with_state(state)
}

/// Locate the static files directory
///
/// Tries the explicit path, then `static` relative to the cwd, then next to
/// the executable.
pub fn resolve_static_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }

    let cwd_static = PathBuf::from("static");
    if cwd_static.exists() {
        return cwd_static;
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("static")))
        .filter(|path| path.exists())
        .unwrap_or(cwd_static)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::MapUnavailable(_) => "MAP_NOT_READY",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Detail(_) => "DETAIL_ERROR",
            _ => "INTERNAL_ERROR",
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
        }
    }
}

fn error_status(err: &Error) -> StatusCode {
    match err {
        Error::InvalidCoordinates(_) => StatusCode::BAD_REQUEST,
        Error::MapUnavailable(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Current page projection
///
/// GET /api/view
async fn view_handler<S: LocationDetailService + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<PageView> {
    Json(state.page_view().await)
}

/// Map click request body
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub lat: f64,
    pub lng: f64,
}

/// Select a point on the map
///
/// POST /api/select
async fn select_handler<S: LocationDetailService + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<PageView>, (StatusCode, Json<ApiError>)> {
    state
        .session
        .select(req.lat, req.lng)
        .await
        .map_err(|e| (error_status(&e), Json(ApiError::from(e))))?;

    Ok(Json(state.page_view().await))
}

/// Details request response
#[derive(Debug, Serialize, Deserialize)]
pub struct DetailsResponse {
    /// False when the action was disabled and nothing happened
    pub started: bool,
    pub view: PageView,
}

/// Request details for the current selection
///
/// POST /api/details
async fn details_handler<S: LocationDetailService + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<DetailsResponse> {
    let started = state.session.request_details().await.is_some();

    Json(DetailsResponse {
        started,
        view: state.page_view().await,
    })
}

/// Map settings for the browser widget
#[derive(Debug, Serialize, Deserialize)]
pub struct MapSettingsResponse {
    pub status: MapStatus,
    /// Browser key, only sent when it is usable
    pub api_key: Option<String>,
    pub viewport: serde_json::Value,
}

/// Map settings and current widget state
///
/// GET /api/map
async fn map_handler<S: LocationDetailService + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<MapSettingsResponse>, ApiError> {
    let viewport: Viewport = state.session.snapshot().await.widget;
    let api_key = state
        .credentials
        .map
        .is_configured()
        .then(|| state.config.map.api_key.trim().to_string());

    Ok(Json(MapSettingsResponse {
        status: state.map_runtime.status(),
        api_key,
        viewport: serde_json::to_value(&viewport).map_err(|e| ApiError::from(Error::from(e)))?,
    }))
}

/// Map readiness response
#[derive(Debug, Serialize, Deserialize)]
pub struct MapReadyResponse {
    pub status: MapStatus,
}

/// The browser reports that the map runtime has loaded
///
/// POST /api/map/ready
async fn map_ready_handler<S: LocationDetailService + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<MapReadyResponse> {
    Json(MapReadyResponse {
        status: state.map_runtime.signal_ready(),
    })
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    pub version: String,
    pub model: String,
    pub credentials: Credentials,
    pub map_status: MapStatus,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler<S: LocationDetailService + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.config.gemini.model.clone(),
        credentials: state.credentials,
        map_status: state.map_runtime.status(),
    })
}
