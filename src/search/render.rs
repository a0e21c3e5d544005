//! Result rendering
//!
//! Pure mapping from a [`SearchOutcome`] to display records. No I/O, and
//! "now" is passed in so labels are reproducible.

use chrono::{DateTime, Utc};

use super::outcome::SearchOutcome;
use super::query::SearchQuery;
use crate::backend::types::ThreadSummary;

/// Content previews are cut at this many characters.
pub const PREVIEW_CHARS: usize = 150;
pub const ELLIPSIS: &str = "...";

const DEFAULT_AUTHOR: &str = "Anonymous";
const DEFAULT_TITLE: &str = "Untitled";
const FAILURE_MESSAGE: &str = "Search failed, please try again";

const NO_RESULT_SUGGESTIONS: [&str; 4] = [
    "Check the spelling of your keywords",
    "Try more general terms",
    "Use the tag filters",
    "Search by artist name or music genre",
];

/// One row of the results panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayRecord {
    Thread(ThreadCard),
    NoResults {
        headline: String,
        text: String,
        tags: Vec<String>,
        suggestions: Vec<String>,
    },
    Error {
        headline: String,
        message: String,
        detail: String,
    },
}

/// Display form of a single thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadCard {
    pub id: Option<u64>,
    pub link: Option<String>,
    pub title: String,
    pub author: String,
    pub initials: String,
    pub preview: String,
    pub time_ago: String,
    pub likes: u64,
    pub comments: u64,
    pub tags: Vec<String>,
}

impl DisplayRecord {
    pub fn is_error(&self) -> bool {
        matches!(self, DisplayRecord::Error { .. })
    }

    pub fn is_no_results(&self) -> bool {
        matches!(self, DisplayRecord::NoResults { .. })
    }
}

/// Map an outcome to the records shown for `query`.
pub fn render(outcome: &SearchOutcome, query: &SearchQuery, now: DateTime<Utc>) -> Vec<DisplayRecord> {
    match outcome {
        SearchOutcome::Success(threads) => threads
            .iter()
            .map(|thread| DisplayRecord::Thread(render_thread(thread, now)))
            .collect(),
        SearchOutcome::Empty => vec![DisplayRecord::NoResults {
            headline: query.headline(),
            text: query.text().to_string(),
            tags: query.tags().to_vec(),
            suggestions: NO_RESULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        }],
        SearchOutcome::Failure(err) => vec![DisplayRecord::Error {
            headline: query.headline(),
            message: FAILURE_MESSAGE.to_string(),
            detail: err.to_string(),
        }],
    }
}

pub fn render_thread(thread: &ThreadSummary, now: DateTime<Utc>) -> ThreadCard {
    let author = normalize_author(&thread.author);
    let title = match thread.title.trim() {
        "" => DEFAULT_TITLE.to_string(),
        title => title.to_string(),
    };

    ThreadCard {
        id: thread.id,
        link: thread.id.map(|id| format!("/thread/{}", id)),
        title,
        initials: author_initials(&author),
        author,
        preview: content_preview(&thread.content),
        time_ago: time_ago(thread.created_at, now),
        likes: thread.likes,
        comments: thread.comments,
        tags: thread.tags.clone(),
    }
}

fn normalize_author(author: &str) -> String {
    match author.trim() {
        "" => DEFAULT_AUTHOR.to_string(),
        name => name.to_string(),
    }
}

/// First two characters of the author name, uppercased and capped at two
/// characters (`ß` expands to `SS`).
pub fn author_initials(author: &str) -> String {
    normalize_author(author)
        .chars()
        .take(2)
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// First [`PREVIEW_CHARS`] characters, with [`ELLIPSIS`] if anything was cut.
pub fn content_preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{}", &content[..cut], ELLIPSIS),
        None => content.to_string(),
    }
}

/// Relative age label bucketed by minute, hour and day.
pub fn time_ago(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(created_at) = created_at else {
        return "recently".to_string();
    };

    let seconds = (now - created_at).num_seconds();
    match seconds {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 2_592_000 => format!("{}d ago", s / 86_400),
        _ => created_at.format("%Y-%m-%d").to_string(),
    }
}
