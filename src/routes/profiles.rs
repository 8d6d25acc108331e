//! Profile management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use url::Url;

use crate::models::{ApiResponse, ProfileRecord, ProfilesResponse};
use crate::routes::{error_body, library_error, ApiError};
use crate::AppState;

/// Reject profiles whose URLs the fetcher could never use
fn validate_profile(profile: &ProfileRecord) -> Result<(), ApiError> {
    if profile.name().trim().is_empty() {
        return Err(error_body(StatusCode::BAD_REQUEST, "Profile name is required"));
    }

    if let Some(url) = profile.playlist_url() {
        let valid = Url::parse(url)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false);
        if !valid {
            return Err(error_body(StatusCode::BAD_REQUEST, "Invalid playlist URL"));
        }
    }

    Ok(())
}

/// GET /api/profiles - List stored profiles
pub async fn list_profiles(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let profiles = state.library.profiles().await;
    Json(ProfilesResponse {
        total: profiles.len(),
        profiles,
    })
}

/// POST /api/profiles - Add a profile (id generated when empty)
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ProfileRecord>,
) -> Result<impl IntoResponse, ApiError> {
    validate_profile(&payload)?;

    let profile = state.library.add_profile(payload).await.map_err(library_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(profile))))
}

/// PUT /api/profiles/:id - Replace a profile
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(mut payload): Json<ProfileRecord>,
) -> Result<impl IntoResponse, ApiError> {
    validate_profile(&payload)?;

    // The path id is authoritative
    payload.set_id(id);
    let profile = state.library.edit_profile(payload).await.map_err(library_error)?;
    Ok(Json(ApiResponse::success(profile)))
}

/// DELETE /api/profiles/:id - Remove a profile
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.library.remove_profile(&id).await.map_err(library_error)?;
    Ok(Json(serde_json::json!({ "success": true })))
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
    async fn test_create_and_list_profiles() {
        let app = test_app().await;

        let body = r#"{"kind":"playlist","id":"","name":"Added","url":"http://new/list.m3u"}"#;
        let response = app
            .clone()
            .oneshot(
                Request::post("/api/profiles")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(Request::get("/api/profiles").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["total"], 4);
    }

    #[tokio::test]
    async fn test_create_profile_rejects_bad_url() {
        let app = test_app().await;

        let body = r#"{"kind":"playlist","id":"x","name":"Bad","url":"ftp://nope"}"#;
        let response = app
            .oneshot(
                Request::post("/api/profiles")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_unknown_profile() {
        let app = test_app().await;
        let response = app
            .oneshot(
                Request::delete("/api/profiles/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
