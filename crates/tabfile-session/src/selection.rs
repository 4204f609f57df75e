//! Multi-selection over a session's item list.

use indexmap::IndexSet;

use tabfile_core::{ItemId, ItemRecord};

/// Selected ids plus the anchor used for shift-range selection.
///
/// Every mutation takes the item list it refers to; ids or indices absent
/// from that list are ignored, so the selection never holds an id that is
/// not in the list.
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    selected: IndexSet<ItemId>,
    anchor: Option<usize>,
    last_pressed: Option<usize>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.selected.contains(id)
    }

    /// Selected ids in the order they were selected.
    pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
        self.selected.iter()
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    pub fn last_pressed(&self) -> Option<usize> {
        self.last_pressed
    }

    pub fn set_last_pressed(&mut self, index: Option<usize>) {
        self.last_pressed = index;
    }

    /// Whether `id` is the only selected item.
    pub fn is_sole(&self, id: &ItemId) -> bool {
        self.selected.len() == 1 && self.selected.contains(id)
    }

    /// Id of the anchored item.
    pub fn anchor_id(&self, items: &[ItemRecord]) -> Option<ItemId> {
        self.anchor
            .and_then(|i| items.get(i))
            .map(|item| item.id.clone())
    }

    /// Select `id`, replacing the selection unless `additive`, and anchor it.
    pub fn select(&mut self, items: &[ItemRecord], id: &ItemId, additive: bool) -> bool {
        match position_of(items, id) {
            Some(index) => self.select_index(items, index, additive),
            None => false,
        }
    }

    /// Index-based [`select`](Self::select).
    pub fn select_index(&mut self, items: &[ItemRecord], index: usize, additive: bool) -> bool {
        let Some(item) = items.get(index) else {
            return false;
        };
        if !additive {
            self.selected.clear();
        }
        self.selected.insert(item.id.clone());
        self.anchor = Some(index);
        true
    }

    /// Flip membership of `id`. The anchor is left alone.
    pub fn toggle_select(&mut self, items: &[ItemRecord], id: &ItemId) -> bool {
        match position_of(items, id) {
            Some(index) => self.toggle_index(items, index),
            None => false,
        }
    }

    /// Index-based [`toggle_select`](Self::toggle_select).
    pub fn toggle_index(&mut self, items: &[ItemRecord], index: usize) -> bool {
        let Some(item) = items.get(index) else {
            return false;
        };
        if !self.selected.shift_remove(&item.id) {
            self.selected.insert(item.id.clone());
        }
        true
    }

    /// Replace the selection with the inclusive range between the anchor and
    /// `to_index`. Without an anchor this is a plain select that sets one.
    pub fn range_select(&mut self, items: &[ItemRecord], to_index: usize) -> bool {
        if to_index >= items.len() {
            return false;
        }
        let Some(anchor) = self.anchor.filter(|&a| a < items.len()) else {
            return self.select_index(items, to_index, false);
        };

        let (low, high) = (anchor.min(to_index), anchor.max(to_index));
        self.selected.clear();
        self.selected
            .extend(items[low..=high].iter().map(|item| item.id.clone()));
        true
    }

    /// Empty the selection and drop the anchor.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    /// Add the item at `index` without moving the anchor.
    pub(crate) fn add_index(&mut self, items: &[ItemRecord], index: usize) {
        if let Some(item) = items.get(index) {
            self.selected.insert(item.id.clone());
        }
    }

    /// Remove the item at `index` without moving the anchor.
    pub(crate) fn remove_index(&mut self, items: &[ItemRecord], index: usize) {
        if let Some(item) = items.get(index) {
            self.selected.shift_remove(&item.id);
        }
    }

    /// Positions of the selected items in `items`, ascending.
    pub fn selected_indices(&self, items: &[ItemRecord]) -> Vec<usize> {
        items
            .iter()
            .enumerate()
            .filter(|(_, item)| self.selected.contains(&item.id))
            .map(|(i, _)| i)
            .collect()
    }

    /// Records of the selected items, in list order.
    pub fn selected_records<'a>(&self, items: &'a [ItemRecord]) -> Vec<&'a ItemRecord> {
        items
            .iter()
            .filter(|item| self.selected.contains(&item.id))
            .collect()
    }

    /// Total size of the selection, or `None` when nothing is selected or a
    /// folder is part of it.
    pub fn selected_size(&self, items: &[ItemRecord]) -> Option<u64> {
        if self.selected.is_empty() {
            return None;
        }
        self.selected_records(items)
            .into_iter()
            .try_fold(0u64, |total, item| {
                if item.is_dir() {
                    None
                } else {
                    Some(total + item.size.unwrap_or(0))
                }
            })
    }

    /// The item at `index` with identity `id` has just been removed.
    pub(crate) fn on_item_removed(&mut self, index: usize, id: &ItemId) {
        self.selected.shift_remove(id);
        self.anchor = shift_after_removal(self.anchor, index);
        self.last_pressed = shift_after_removal(self.last_pressed, index);
    }

    /// Re-point a selected id after its item was re-keyed in place.
    pub(crate) fn on_item_renamed(&mut self, from: &ItemId, to: &ItemId) {
        if let Some(position) = self.selected.get_index_of(from) {
            self.selected.shift_remove(from);
            self.selected.shift_insert(position, to.clone());
        }
    }

    /// Start over after the item list was replaced wholesale.
    pub(crate) fn reset(&mut self) {
        self.clear();
        self.last_pressed = None;
    }
}

fn position_of(items: &[ItemRecord], id: &ItemId) -> Option<usize> {
    items.iter().position(|item| &item.id == id)
}

fn shift_after_removal(index: Option<usize>, removed: usize) -> Option<usize> {
    match index {
        Some(i) if i == removed => None,
        Some(i) if i > removed => Some(i - 1),
        other => other,
    }
}
