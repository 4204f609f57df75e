//! Per-session navigation history.

use tabfile_core::{ItemId, Location};

/// One visited location and the item that was anchored when it was left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub location: Location,
    pub anchor: Option<ItemId>,
}

/// Back/forward stack.
///
/// `cursor` counts the entries up to and including the current one, so the
/// current entry is `entries[cursor - 1]` and `0 <= cursor <= len` always
/// holds.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 1
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// The entry being shown.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.cursor.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// The entry GoBack would show.
    pub fn back_target(&self) -> Option<&HistoryEntry> {
        if self.can_go_back() {
            self.entries.get(self.cursor - 2)
        } else {
            None
        }
    }

    /// The entry GoForward would show.
    pub fn forward_target(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    /// Record a newly visited location, dropping any forward entries.
    ///
    /// Visiting the current location again does not add a duplicate.
    pub fn push(&mut self, location: Location) {
        if self.current().is_some_and(|e| e.location == location) {
            return;
        }
        self.entries.truncate(self.cursor);
        self.entries.push(HistoryEntry {
            location,
            anchor: None,
        });
        self.cursor = self.entries.len();
    }

    /// Remember which item was anchored in the current entry.
    pub fn remember_anchor(&mut self, anchor: Option<ItemId>) {
        if let Some(i) = self.cursor.checked_sub(1) {
            if let Some(entry) = self.entries.get_mut(i) {
                entry.anchor = anchor;
            }
        }
    }

    pub(crate) fn step_back(&mut self) {
        if self.can_go_back() {
            self.cursor -= 1;
        }
    }

    pub(crate) fn step_forward(&mut self) {
        if self.can_go_forward() {
            self.cursor += 1;
        }
    }

    /// Drop the entry GoBack would show.
    pub(crate) fn remove_back_target(&mut self) {
        if self.can_go_back() {
            self.entries.remove(self.cursor - 2);
            self.cursor -= 1;
        }
    }

    /// Drop the entry GoForward would show.
    pub(crate) fn remove_forward_target(&mut self) {
        if self.can_go_forward() {
            self.entries.remove(self.cursor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(p: &str) -> Location {
        Location::from(p)
    }

    #[test]
    fn test_empty_history_bounds() {
        let history = History::new();
        assert_eq!(history.cursor(), 0);
        assert!(!history.can_go_back());
        assert!(!history.can_go_forward());
        assert!(history.current().is_none());
    }

    #[test]
    fn test_push_and_step() {
        let mut history = History::new();
        history.push(loc("/a"));
        history.push(loc("/b"));
        history.push(loc("/c"));
        assert_eq!(history.cursor(), 3);
        assert!(history.can_go_back());
        assert!(!history.can_go_forward());

        history.step_back();
        assert_eq!(history.current().unwrap().location, loc("/b"));
        assert!(history.can_go_forward());
        assert_eq!(history.forward_target().unwrap().location, loc("/c"));

        history.step_back();
        assert!(!history.can_go_back());
        history.step_back();
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let mut history = History::new();
        history.push(loc("/a"));
        history.push(loc("/b"));
        history.step_back();
        history.push(loc("/x"));

        let locations: Vec<_> = history.entries().iter().map(|e| e.location.clone()).collect();
        assert_eq!(locations, vec![loc("/a"), loc("/x")]);
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_push_same_location_is_ignored() {
        let mut history = History::new();
        history.push(loc("/a"));
        history.push(loc("/a"));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_remove_stale_targets() {
        let mut history = History::new();
        for p in ["/a", "/b", "/c"] {
            history.push(loc(p));
        }
        history.step_back();

        history.remove_back_target();
        assert_eq!(history.cursor(), 1);
        assert_eq!(history.current().unwrap().location, loc("/b"));

        history.remove_forward_target();
        assert_eq!(history.len(), 1);
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_remember_anchor() {
        let mut history = History::new();
        history.push(loc("/a"));
        history.remember_anchor(Some(ItemId::new("/a/x")));
        assert_eq!(history.current().unwrap().anchor, Some(ItemId::new("/a/x")));
    }
}
