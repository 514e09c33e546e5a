use anyhow::anyhow;
use axum::{
    extract::{Request, State},
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        Method,
    },
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use collector::{DustService, FetchSettings};
use slog::{info, Logger};
use std::sync::Arc;
use time::OffsetDateTime;
use tower_http::cors::{Any, CorsLayer};

use crate::{all_observations, map_points, report, summary, wind_rose};

#[derive(Clone)]
pub struct AppState {
    pub logger: Logger,
    pub service: Arc<DustService>,
}

pub fn build_app_state(logger: Logger, settings: &FetchSettings) -> Result<AppState, anyhow::Error> {
    let service = settings
        .build_service(&logger)
        .map_err(|e| anyhow!("error setting up dust service: {}", e))?;
    Ok(AppState {
        logger,
        service: Arc::new(service),
    })
}

pub fn app(app_state: AppState) -> Router {
    let state = Arc::new(app_state);
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/api/dust/all", get(all_observations))
        .route("/api/dust/summary", get(summary))
        .route("/api/dust/map", get(map_points))
        .route("/api/dust/windrose", get(wind_rose))
        .route("/api/dust/report", get(report))
        .layer(middleware::from_fn_with_state(state.clone(), log_request))
        .with_state(state)
        .layer(cors)
}

async fn log_request(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let now = OffsetDateTime::now_utc();
    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_default();
    info!(state.logger, "new request, {} {}", method, path);

    let response = next.run(request).await;
    let response_time = OffsetDateTime::now_utc() - now;
    info!(
        state.logger,
        "response, code: {}, time: {}",
        response.status().as_str(),
        response_time
    );

    response
}
