use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::handler::{self, InvocationEvent};
use crate::ingest::Streamer;

#[derive(Clone)]
pub struct AppState {
    pub streamer: Arc<Streamer>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(streamer: Streamer) -> Self {
        Self {
            streamer: Arc::new(streamer),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/invoke", post(invoke))
        .route("/metrics", get(render_metrics))
        .with_state(state)
}

async fn invoke(
    State(state): State<AppState>,
    Json(event): Json<InvocationEvent>,
) -> impl IntoResponse {
    let today = chrono::Utc::now().date_naive();
    let resp = handler::handle_event(&state.streamer, event, today).await;
    let status =
        StatusCode::from_u16(resp.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(resp))
}

async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(h) => (StatusCode::OK, h.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}
