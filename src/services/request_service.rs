//! Domain service for the request board.
//!
//! Handlers never touch the store directly. Every mutation reports an
//! [`Outcome`] so callers and tests can tell an applied change from a
//! business-rule rejection, even though the HTTP layer answers both with
//! the same redirect.

use crate::domain::{RequestId, parse_episode_count};
use crate::models::request::AnimeRequest;
use serde::Serialize;
use thiserror::Error;

/// Infrastructure failures. Business-rule rejections are not errors; see
/// [`Rejection`].
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for RequestError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Why a mutation was dropped without changing state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Request name is empty")]
    EmptyName,

    #[error("Board is full ({capacity} open requests)")]
    CapacityReached { capacity: u64 },

    #[error("Unknown status: {0}")]
    InvalidStatus(String),

    #[error("Invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Already voted")]
    AlreadyVoted,

    #[error("Request {0} not found")]
    NotFound(RequestId),
}

impl Rejection {
    /// Stable label used for metrics.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::CapacityReached { .. } => "capacity_reached",
            Self::InvalidStatus(_) => "invalid_status",
            Self::InvalidNumber { .. } => "invalid_number",
            Self::AlreadyVoted => "already_voted",
            Self::NotFound(_) => "not_found",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T = ()> {
    Applied(T),
    Rejected(Rejection),
}

impl<T> Outcome<T> {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// `applied`, or the rejection reason.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Applied(_) => "applied",
            Self::Rejected(r) => r.reason(),
        }
    }

    #[must_use]
    pub const fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Applied(_) => None,
            Self::Rejected(r) => Some(r),
        }
    }
}

/// Public board contents: most-voted first, plus fill level.
#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub requests: Vec<AnimeRequest>,
    pub request_count: u64,
    pub capacity: u64,
}

impl BoardSnapshot {
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.request_count >= self.capacity
    }
}

#[async_trait::async_trait]
pub trait RequestService: Send + Sync {
    /// Requests ordered by votes (ties by ascending id) and the total count.
    async fn board(&self) -> Result<BoardSnapshot, RequestError>;

    /// Requests ordered newest first.
    async fn owner_panel(&self) -> Result<Vec<AnimeRequest>, RequestError>;

    /// Submits a new request.
    ///
    /// `total_episodes` that is missing or does not parse is stored as 0.
    async fn add_request(
        &self,
        anime_name: &str,
        total_episodes: Option<&str>,
    ) -> Result<Outcome<RequestId>, RequestError>;

    /// Casts one vote from `voter`. A repeat vote from the same voter is
    /// rejected with [`Rejection::AlreadyVoted`].
    async fn vote(&self, id: RequestId, voter: &str) -> Result<Outcome, RequestError>;

    async fn update_status(&self, id: RequestId, status: &str) -> Result<Outcome, RequestError>;

    /// Overwrites both episode counters, or neither if either value is invalid.
    async fn update_progress(
        &self,
        id: RequestId,
        total_episodes: Option<&str>,
        uploaded_episodes: Option<&str>,
    ) -> Result<Outcome, RequestError>;

    /// Removes the request and every vote cast for it.
    async fn delete_request(&self, id: RequestId) -> Result<Outcome, RequestError>;
}

/// Episode count for a new request. Absent or unparsable input becomes 0.
#[must_use]
pub fn coerce_total_episodes(raw: Option<&str>) -> i32 {
    raw.map_or(0, |value| parse_episode_count(value).unwrap_or(0))
}

/// Both progress counters, or the first field that failed to parse.
///
/// An absent field counts as 0.
pub fn parse_progress(
    total_episodes: Option<&str>,
    uploaded_episodes: Option<&str>,
) -> Result<(i32, i32), Rejection> {
    let parse = |field: &'static str, raw: Option<&str>| match raw {
        None => Ok(0),
        Some(value) => parse_episode_count(value).ok_or_else(|| Rejection::InvalidNumber {
            field,
            value: value.to_string(),
        }),
    };

    let total = parse("total_episodes", total_episodes)?;
    let uploaded = parse("uploaded_episodes", uploaded_episodes)?;
    Ok((total, uploaded))
}
