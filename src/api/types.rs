use serde::{Deserialize, Serialize};

use crate::domain::RequestStatus;
use crate::models::request::AnimeRequest;
use crate::services::BoardSnapshot;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RequestDto {
    pub id: i32,
    pub anime_name: String,
    pub votes: i32,
    pub status: RequestStatus,
    pub total_episodes: i32,
    pub uploaded_episodes: i32,
}

impl From<AnimeRequest> for RequestDto {
    fn from(request: AnimeRequest) -> Self {
        Self {
            id: request.id.value(),
            anime_name: request.anime_name,
            votes: request.votes,
            status: request.status,
            total_episodes: request.total_episodes,
            uploaded_episodes: request.uploaded_episodes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BoardView {
    pub requests: Vec<RequestDto>,
    pub request_count: u64,
    pub capacity: u64,
    pub is_full: bool,
}

impl From<BoardSnapshot> for BoardView {
    fn from(snapshot: BoardSnapshot) -> Self {
        let is_full = snapshot.is_full();
        Self {
            requests: snapshot.requests.into_iter().map(RequestDto::from).collect(),
            request_count: snapshot.request_count,
            capacity: snapshot.capacity,
            is_full,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OwnerPanelView {
    pub requests: Vec<RequestDto>,
    pub request_count: usize,
}

/// Form body of `POST /add`. Every field is optional; missing values are
/// handled by the service.
#[derive(Debug, Default, Deserialize)]
pub struct AddRequestForm {
    pub anime_name: Option<String>,
    pub total_episodes: Option<String>,
}

/// Form body of `POST /update_progress/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct ProgressForm {
    pub total_episodes: Option<String>,
    pub uploaded_episodes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthLiveResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthReadyResponse {
    pub ready: bool,
    pub database: bool,
}
