pub mod health;
pub mod library;
pub mod player;
pub mod profiles;

use axum::{http::StatusCode, Json};

use crate::services::library::LibraryError;

/// Error body shared by all handlers
pub type ApiError = (StatusCode, Json<serde_json::Value>);

pub fn error_body(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(serde_json::json!({ "error": message.into() })))
}

/// Map a library failure to its HTTP status
pub fn library_error(err: LibraryError) -> ApiError {
    let status = match &err {
        LibraryError::Transport(_) => StatusCode::BAD_GATEWAY,
        LibraryError::Content => StatusCode::UNPROCESSABLE_ENTITY,
        LibraryError::ProfileNotFound(_) => StatusCode::NOT_FOUND,
        LibraryError::DuplicateProfile(_) => StatusCode::CONFLICT,
        LibraryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_body(status, err.to_string())
}
