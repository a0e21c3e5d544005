//! Query composition
//!
//! Turns prompt text plus the tag selection into a canonical [`SearchQuery`],
//! or rejects it when there is nothing to search for.

use super::tags::TagSelection;

/// Warning shown when a search is rejected before reaching the network.
pub const REJECTION_WARNING: &str = "Enter a search term or select a tag";

/// A validated search request: at least one of `text` / `tags` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    tags: Vec<String>,
}

/// Result of composing a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Composition {
    Ready(SearchQuery),
    /// Empty text and no tags. No request must be made.
    Rejected,
}

impl Composition {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Composition::Rejected)
    }
}

/// Compose a query from raw prompt text and the current selection.
pub fn compose(raw_text: &str, selection: &TagSelection) -> Composition {
    compose_with_tags(raw_text, selection.as_slice())
}

/// Same as [`compose`], for callers holding a plain tag list.
pub fn compose_with_tags(raw_text: &str, tags: &[String]) -> Composition {
    let text = raw_text.trim();
    if text.is_empty() && tags.is_empty() {
        return Composition::Rejected;
    }

    Composition::Ready(SearchQuery {
        text: text.to_string(),
        tags: tags.to_vec(),
    })
}

impl SearchQuery {
    /// Trimmed free text (possibly empty).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Comma-joined tags in insertion order, `None` when no tag is selected.
    pub fn tags_param(&self) -> Option<String> {
        if self.tags.is_empty() {
            None
        } else {
            Some(self.tags.join(","))
        }
    }

    /// Query parameters in wire order. Empty parameters are omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if !self.text.is_empty() {
            pairs.push(("q", self.text.clone()));
        }
        if let Some(tags) = self.tags_param() {
            pairs.push(("tags", tags));
        }
        pairs
    }

    /// Label describing what was searched for, e.g. `"synth" + tags: retro + lofi`.
    pub fn headline(&self) -> String {
        let joined = self.tags.join(" + ");
        match (self.text.is_empty(), self.tags.is_empty()) {
            (false, true) => format!("\"{}\"", self.text),
            (true, false) => format!("Tags: {}", joined),
            _ => format!("\"{}\" + tags: {}", self.text, joined),
        }
    }
}
