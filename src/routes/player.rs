use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::models::{ApiResponse, NowPlayingResponse, StreamRequest};
use crate::routes::{error_body, ApiError};
use crate::AppState;

/// GET /api/player - Stream currently handed to the player
pub async fn now_playing(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stream = state.library.now_playing().await;
    Json(NowPlayingResponse {
        playing: stream.is_some(),
        stream,
    })
}

/// POST /api/player/play - Start playback of a stream URL
pub async fn play(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<StreamRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.url.is_empty() || !payload.url.starts_with("http") {
        return Err(error_body(StatusCode::BAD_REQUEST, "Invalid stream URL"));
    }

    state.library.play_stream(payload.clone()).await;
    Ok(Json(ApiResponse::success(payload)))
}

/// POST /api/player/stop - Stop playback
pub async fn stop(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.library.stop().await;
    Json(serde_json::json!({ "success": true }))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::routes::library::tests::test_app;

    #[tokio::test]
    async fn test_play_then_poll() {
        let app = test_app().await;

        let body = r#"{"url":"http://h/live/news1.ts","id":"news1"}"#;
        let response = app
            .clone()
            .oneshot(
                Request::post("/api/player/play")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/api/player").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["playing"], true);
        assert_eq!(json["stream"]["id"], "news1");
    }

    #[tokio::test]
    async fn test_play_rejects_bad_url() {
        let app = test_app().await;

        let body = r#"{"url":"","id":"x"}"#;
        let response = app
            .oneshot(
                Request::post("/api/player/play")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
