//! Shared types for backend communication
//!
//! Wire shapes are deserialized as-is, then normalized into the canonical
//! [`ThreadSummary`] before anything else sees them.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// `{ success, message?, error?, data? }` wrapper used by every API route.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
    pub data: Option<T>,
}

/// `data` of `GET /api/public/threads/search`.
#[derive(Debug, Deserialize)]
pub struct SearchData {
    pub threads: Option<Vec<ThreadPayload>>,
    pub count: Option<u64>,
    pub total: Option<u64>,
}

/// One thread as the backend sends it.
///
/// The backend also duplicates most fields under capitalized keys
/// (`Title`, `Author`, ...). Only the snake_case keys are read; the
/// capitalized copies are ignored as unknown fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadPayload {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub created_at: Option<String>,
    pub likes: Option<u64>,
    pub comments: Option<u64>,
    pub tags: Option<Vec<String>>,
}

/// Canonical, read-only thread summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadSummary {
    pub id: Option<u64>,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: Option<DateTime<Utc>>,
    pub likes: u64,
    pub comments: u64,
    pub tags: Vec<String>,
}

impl From<ThreadPayload> for ThreadSummary {
    fn from(payload: ThreadPayload) -> Self {
        Self {
            id: payload.id,
            title: payload.title.unwrap_or_default(),
            content: payload.content.unwrap_or_default(),
            author: payload.author.unwrap_or_default(),
            created_at: payload.created_at.as_deref().and_then(parse_timestamp),
            likes: payload.likes.unwrap_or(0),
            comments: payload.comments.unwrap_or(0),
            tags: payload.tags.unwrap_or_default(),
        }
    }
}

/// Parse an RFC 3339 timestamp; anything else is treated as unknown.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Entry of the tag catalogue (`GET /api/public/tags`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagInfo {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}
