use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use collector::{DailyReport, Error, MapPoint, Observation, Summary, TimeWindow, WindRose};
use serde::{Deserialize, Serialize};
use slog::{error, warn, Logger};
use std::sync::Arc;

use crate::AppState;

/// Window selection shared by the dust views. An explicit range is used only
/// when both `start` and `end` are given, otherwise `hours` (default 24).
/// An `hours` value that is not a whole number counts as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindowQuery {
    pub hours: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub station: Option<String>,
}

impl WindowQuery {
    pub fn window(&self) -> Result<TimeWindow, Error> {
        TimeWindow::from_query(self.hours(), non_empty(&self.start), non_empty(&self.end))
    }

    pub fn hours(&self) -> Option<u32> {
        non_empty(&self.hours).and_then(|hours| hours.parse().ok())
    }

    pub fn station(&self) -> Option<&str> {
        non_empty(&self.station)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn api_error(logger: &Logger, err: Error) -> ApiError {
    let status = match err {
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!(logger, "error serving dust data: {}", err);
    } else {
        warn!(logger, "rejected dust request: {}", err);
    }
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

pub async fn all_observations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<Vec<Observation>>, ApiError> {
    let window = query.window().map_err(|e| api_error(&state.logger, e))?;
    state
        .service
        .observations(&window, query.station())
        .await
        .map(Json)
        .map_err(|e| api_error(&state.logger, e))
}

pub async fn summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<Summary>, ApiError> {
    let window = query.window().map_err(|e| api_error(&state.logger, e))?;
    state
        .service
        .summary(&window)
        .await
        .map(Json)
        .map_err(|e| api_error(&state.logger, e))
}

pub async fn map_points(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<Vec<MapPoint>>, ApiError> {
    let window = query.window().map_err(|e| api_error(&state.logger, e))?;
    state
        .service
        .map_points(&window)
        .await
        .map(Json)
        .map_err(|e| api_error(&state.logger, e))
}

pub async fn wind_rose(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<WindRose>, ApiError> {
    let window = query.window().map_err(|e| api_error(&state.logger, e))?;
    state
        .service
        .wind_rose(&window, query.station())
        .await
        .map(Json)
        .map_err(|e| api_error(&state.logger, e))
}

pub async fn report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<DailyReport>, ApiError> {
    state
        .service
        .report(query.date.as_deref().unwrap_or_default())
        .await
        .map(Json)
        .map_err(|e| api_error(&state.logger, e))
}
