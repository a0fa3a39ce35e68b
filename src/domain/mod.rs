//! Domain types for the request board.
//!
//! Newtype identifiers and the closed set of request statuses. Values coming
//! from the outside world (path segments, form fields) are parsed into these
//! types before they reach the store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unique identifier of a request row.
///
/// # Examples
///
/// ```rust
/// use anireq::domain::RequestId;
///
/// let id = RequestId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestId(i32);

impl RequestId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RequestId> for i32 {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

impl From<i32> for RequestId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for RequestId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for RequestId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// Upload status of a request.
///
/// Any status can be set from any other; there is no enforced progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RequestStatus {
    #[default]
    Pending,
    Processing,
    Uploaded,
}

impl RequestStatus {
    pub const ALL: [Self; 3] = [Self::Pending, Self::Processing, Self::Uploaded];

    /// The exact string stored in the `status` column.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Uploaded => "Uploaded",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown request status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for RequestStatus {
    type Err = UnknownStatus;

    /// Matching is exact and case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Coerces a submitted episode count into a non-negative integer.
///
/// Surrounding whitespace and a leading sign are accepted; anything that does
/// not parse, parses to a negative number, or exceeds `i32::MAX` yields
/// `None`.
#[must_use]
pub fn parse_episode_count(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok().filter(|n| *n >= 0)
}
