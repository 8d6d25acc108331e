use serde::{Deserialize, Serialize};

/// Stream handed to the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamRequest {
    pub url: String,
    pub id: String,
}

/// Response for player polling
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlayingResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<StreamRequest>,
    pub playing: bool,
}

/// Generic API response
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}
