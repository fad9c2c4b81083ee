//! Stale-response suppression for lake/horizon selections.
//!
//! Every fetch is started with [`SelectionTracker::request`], which hands
//! out a token for the new selection. When the fetch resolves, its result
//! goes through [`SelectionTracker::apply`]; if another selection was
//! requested in the meantime the token is stale and the result is dropped.

use crate::confidence::Horizon;
use log::debug;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Selection {
    pub lake_id: String,
    pub horizon: Horizon,
}

impl Selection {
    pub fn new(lake_id: impl Into<String>, horizon: Horizon) -> Self {
        Selection {
            lake_id: lake_id.into(),
            horizon,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.lake_id, self.horizon)
    }
}

/// Proof that a request was issued for a given selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    generation: u64,
    selection: Selection,
}

impl RequestToken {
    pub fn selection(&self) -> &Selection {
        &self.selection
    }
}

#[derive(Debug, Default)]
pub struct SelectionTracker {
    generation: u64,
    active: Option<Selection>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `selection` the active one, invalidating all earlier tokens.
    pub fn request(&mut self, selection: Selection) -> RequestToken {
        self.generation += 1;
        self.active = Some(selection.clone());
        RequestToken {
            generation: self.generation,
            selection,
        }
    }

    pub fn active(&self) -> Option<&Selection> {
        self.active.as_ref()
    }

    pub fn is_current(&self, token: &RequestToken) -> bool {
        token.generation == self.generation
    }

    /// Pass `result` through if `token` is still current, drop it otherwise.
    pub fn apply<T>(&self, result: T, token: &RequestToken) -> Option<T> {
        if self.is_current(token) {
            Some(result)
        } else {
            debug!(
                "Discarding stale response for {} (generation {} < {})",
                token.selection, token.generation, self.generation
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_token_applies() {
        let mut tracker = SelectionTracker::new();
        let token = tracker.request(Selection::new("lake-1", Horizon::H1));
        assert_eq!(tracker.apply(42, &token), Some(42));
        assert_eq!(tracker.active(), Some(&Selection::new("lake-1", Horizon::H1)));
    }

    #[test]
    fn test_stale_token_is_discarded() {
        let mut tracker = SelectionTracker::new();
        let first = tracker.request(Selection::new("lake-1", Horizon::H1));
        let second = tracker.request(Selection::new("lake-2", Horizon::H1));
        assert_eq!(tracker.apply("old", &first), None);
        assert_eq!(tracker.apply("new", &second), Some("new"));
        assert_eq!(second.selection().lake_id, "lake-2");
    }

    #[test]
    fn test_reselecting_same_selection_still_invalidates() {
        let mut tracker = SelectionTracker::new();
        let first = tracker.request(Selection::new("lake-1", Horizon::H3));
        let again = tracker.request(Selection::new("lake-1", Horizon::H3));
        assert!(!tracker.is_current(&first));
        assert!(tracker.is_current(&again));
    }
}
