//! Inline rename editor state.

use std::ops::Range;

use tabfile_core::{ItemId, ItemRecord};
use tabfile_ops::stem_range;

use super::InputAction;

/// Text being edited in place of an item's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEditor {
    id: ItemId,
    original: String,
    text: String,
    selection: Range<usize>,
}

impl RenameEditor {
    /// Open an editor on `item` with the stem pre-selected.
    pub fn new(item: &ItemRecord) -> Self {
        let original = item.display_name.to_string();
        let selection = stem_range(&original, item.is_dir());
        Self {
            id: item.id.clone(),
            text: original.clone(),
            original,
            selection,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.selection = self.text.len()..self.text.len();
    }

    /// Selected byte range of the text.
    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    pub fn is_modified(&self) -> bool {
        self.text != self.original
    }

    /// Close the editor: a changed, non-blank name becomes a commit request,
    /// anything else reverts.
    pub fn finish(self) -> InputAction {
        if self.is_modified() && !self.text.trim().is_empty() {
            InputAction::CommitRename {
                id: self.id,
                new_name: self.text,
            }
        } else {
            InputAction::CancelRename { id: self.id }
        }
    }

    pub(crate) fn begin_action(&self) -> InputAction {
        InputAction::BeginRename {
            id: self.id.clone(),
            name: self.original.clone(),
            selection: self.selection.clone(),
        }
    }
}
