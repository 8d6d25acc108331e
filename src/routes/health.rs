use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;

use crate::models::CatalogStats;
use crate::AppState;

/// Root endpoint - basic status
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "Playlist Catalog Server",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "runtime": "rust"
    }))
}

/// Health check response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: String,
    uptime: u64,
    profiles: usize,
    catalog_loaded: bool,
    loading: bool,
    stats: CatalogStats,
}

/// GET /health - Library health check
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();
    let profiles = state.library.profiles().await.len();
    let status = state.library.status().await;

    let health = HealthResponse {
        status: if status.error.is_some() { "degraded" } else { "ok" }.to_string(),
        uptime,
        profiles,
        catalog_loaded: status.source_hash.is_some(),
        loading: status.loading,
        stats: status.stats,
    };

    Json(health)
}

/// GET /metrics - Prometheus metrics
pub async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                b"Internal Server Error".to_vec(),
            )
        }
    }
}

/// Readiness probe (for Kubernetes)
pub async fn ready() -> impl IntoResponse {
    (StatusCode::OK, "ready")
}

/// Liveness probe (for Kubernetes)
pub async fn live() -> impl IntoResponse {
    (StatusCode::OK, "alive")
}
