//! Tag selection state
//!
//! Ordered, duplicate-free set of tags the user picked as extra filters.
//! Owned by the shell and handed to the composer by reference.

/// Currently selected tags, in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSelection {
    tags: Vec<String>,
}

impl TagSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `tag` unless it is empty or already selected (exact match).
    ///
    /// Returns `true` if the selection changed.
    pub fn add(&mut self, tag: &str) -> bool {
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Remove the first exact match of `tag`. Returns `true` if one was removed.
    pub fn remove(&mut self, tag: &str) -> bool {
        match self.tags.iter().position(|t| t == tag) {
            Some(index) => {
                self.tags.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Snapshot of the current selection.
    pub fn list(&self) -> Vec<String> {
        self.tags.clone()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }
}
