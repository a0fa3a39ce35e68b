use serde::{Deserialize, Serialize};

use crate::domain::{RequestId, RequestStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeRequest {
    pub id: RequestId,
    pub anime_name: String,
    pub votes: i32,
    pub status: RequestStatus,
    pub total_episodes: i32,
    pub uploaded_episodes: i32,
}
