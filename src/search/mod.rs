//! Tag-constrained thread search
//!
//! `tags` holds the selection, `query` composes it with the prompt text,
//! `outcome` classifies what the backend returned and `render` turns that
//! into display records.

pub mod outcome;
pub mod query;
pub mod render;
pub mod tags;

pub use outcome::SearchOutcome;
pub use query::{compose, Composition, SearchQuery, REJECTION_WARNING};
pub use render::{render, DisplayRecord, ThreadCard};
pub use tags::TagSelection;
