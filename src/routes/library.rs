use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::models::{CatalogSnapshot, Channel, Movie, Series, SectionsResponse};
use crate::routes::{error_body, library_error, ApiError};
use crate::services::grouping::group_by;
use crate::AppState;

async fn loaded_snapshot(state: &AppState) -> Result<Arc<CatalogSnapshot>, ApiError> {
    state
        .library
        .snapshot()
        .await
        .ok_or_else(|| error_body(StatusCode::NOT_FOUND, "No catalog loaded"))
}

/// POST /api/library/load/:id - Fetch and parse a profile's playlist
pub async fn load_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state.library.load_profile(&id).await.map_err(library_error)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "stats": stats
    })))
}

/// POST /api/library/unload - Drop the current profile and catalog
pub async fn unload(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.library.unload().await;
    Json(serde_json::json!({ "success": true }))
}

/// GET /api/library/status - Current profile, loading flag, last error and stats
pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.library.status().await)
}

/// GET /api/library/channels - Channels grouped by group title
pub async fn get_channels(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = loaded_snapshot(&state).await?;
    let sections = group_by(&snapshot.catalog.channels, |c: &Channel| c.group.as_str());

    Ok(Json(SectionsResponse {
        total: snapshot.catalog.channels.len(),
        sections,
    }))
}

/// GET /api/library/movies - Movies grouped by group title
pub async fn get_movies(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = loaded_snapshot(&state).await?;
    let sections = group_by(&snapshot.catalog.movies, |m: &Movie| m.group.as_str());

    Ok(Json(SectionsResponse {
        total: snapshot.catalog.movies.len(),
        sections,
    }))
}

/// GET /api/library/series - Series grouped by group title
pub async fn get_series(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = loaded_snapshot(&state).await?;
    let sections = group_by(&snapshot.catalog.series, |s: &Series| s.group.as_str());

    Ok(Json(SectionsResponse {
        total: snapshot.catalog.series.len(),
        sections,
    }))
}

/// GET /api/library/series/:id - One series with its seasons and episodes
pub async fn get_series_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = loaded_snapshot(&state).await?;
    let series = snapshot
        .catalog
        .series
        .iter()
        .find(|s| s.id == id)
        .cloned()
        .ok_or_else(|| error_body(StatusCode::NOT_FOUND, "Series not found"))?;

    Ok(Json(series))
}

#[cfg(test)]
pub(crate) mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use std::sync::Arc;
    use std::time::Instant;
    use tower::ServiceExt;

    use crate::services::library::tests::sample_library;
    use crate::{build_router, AppState};

    pub(crate) async fn test_app() -> Router {
        let state = Arc::new(AppState {
            library: sample_library().await,
            start_time: Instant::now(),
        });
        build_router(state)
    }

    async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_catalog_requires_load() {
        let app = test_app().await;
        let (status, json) = send(&app, "GET", "/api/library/channels").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "No catalog loaded");
    }

    #[tokio::test]
    async fn test_load_and_browse() {
        let app = test_app().await;

        let (status, json) = send(&app, "POST", "/api/library/load/ok").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["stats"]["episodeCount"], 2);

        let (_, json) = send(&app, "GET", "/api/library/movies").await;
        assert_eq!(json["total"], 1);
        assert_eq!(json["sections"][0]["title"], "Action");
        assert_eq!(json["sections"][0]["data"][0]["streamUrl"], "http://h/movie/x.mp4");

        let (_, json) = send(&app, "GET", "/api/library/series/Show").await;
        assert_eq!(json["seasons"][0]["name"], "Saison 1");
        assert_eq!(json["seasons"][0]["episodes"][0]["name"], "Episode 1");
        assert_eq!(json["seasons"][0]["episodes"][1]["name"], "Episode 2");

        let (status, _) = send(&app, "GET", "/api/library/series/Missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_load_errors_map_to_status() {
        let app = test_app().await;

        let (status, _) = send(&app, "POST", "/api/library/load/down").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let (status, json) = send(&app, "POST", "/api/library/load/empty").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"], "Playlist is valid but contains no media");

        let (_, json) = send(&app, "GET", "/api/library/status").await;
        assert_eq!(json["loading"], false);
        assert_eq!(json["error"], "Playlist is valid but contains no media");
    }

    #[tokio::test]
    async fn test_unload_clears_catalog() {
        let app = test_app().await;
        send(&app, "POST", "/api/library/load/ok").await;

        let (status, _) = send(&app, "POST", "/api/library/unload").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "GET", "/api/library/series").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
