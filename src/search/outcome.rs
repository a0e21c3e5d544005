//! Classified result of one search invocation

use crate::backend::types::ThreadSummary;
use crate::error::ApiError;

/// Exactly one is produced per search. Never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Successful envelope with at least one thread.
    Success(Vec<ThreadSummary>),
    /// Well-formed answer with no matches (or `success: false`).
    Empty,
    /// Transport failure or malformed response.
    Failure(ApiError),
}

impl SearchOutcome {
    /// Classify a successfully decoded envelope.
    pub fn from_envelope(success: bool, threads: Option<Vec<ThreadSummary>>) -> Self {
        match threads {
            Some(threads) if success && !threads.is_empty() => SearchOutcome::Success(threads),
            _ => SearchOutcome::Empty,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SearchOutcome::Failure(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SearchOutcome::Empty)
    }

    /// Number of threads found (0 for `Empty` and `Failure`).
    pub fn thread_count(&self) -> usize {
        match self {
            SearchOutcome::Success(threads) => threads.len(),
            _ => 0,
        }
    }
}
