//! Backend communication: wire types and the HTTP client

pub mod api;
pub mod types;

pub use api::{BackendClient, PendingSearch, SearchAttempt};
pub use types::{TagInfo, ThreadSummary};
