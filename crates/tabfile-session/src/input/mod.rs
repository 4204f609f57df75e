//! Pointer input: click, double-click, drag, rectangle selection and the
//! delayed inline rename.

mod machine;
mod rect;
mod rename;

use std::ops::Range;
use std::time::Instant;

use bitflags::bitflags;

use tabfile_core::{ItemId, ItemRecord};
pub use tabfile_ops::Modifiers;

pub use machine::{InputState, InputStateMachine};
pub use rect::{RectSelection, Viewport};
pub use rename::RenameEditor;

/// A position in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// The row at this index.
    Item(usize),
    /// Blank space in the list.
    Empty,
    /// The open inline rename editor.
    RenameEditor,
}

/// Raw pointer input fed to [`InputStateMachine::handle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down {
        at: Instant,
        position: Point,
        target: HitTarget,
        button: PointerButton,
        modifiers: Modifiers,
    },
    Move {
        at: Instant,
        position: Point,
    },
    Up {
        at: Instant,
        position: Point,
        button: PointerButton,
    },
    /// The list lost keyboard focus.
    FocusLost,
}

bitflags! {
    /// Drop effects a drag source allows.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DragEffects: u8 {
        const COPY = 1 << 0;
        const MOVE = 1 << 1;
        const LINK = 1 << 2;
    }
}

impl DragEffects {
    /// Effects allowed for dragging `payload`: roots can only be linked.
    pub fn for_payload<'a>(payload: impl IntoIterator<Item = &'a ItemRecord>) -> Self {
        if payload.into_iter().all(|item| item.kind.is_relocatable()) {
            Self::all()
        } else {
            Self::LINK
        }
    }
}

/// Outcome of input handling for the host to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    /// Double-click on an item.
    ItemActivated { id: ItemId, modifiers: Modifiers },
    /// Single primary click completed on an item.
    ItemClicked { id: ItemId },
    /// Show the inline editor with `selection` (byte range) pre-selected.
    BeginRename {
        id: ItemId,
        name: String,
        selection: Range<usize>,
    },
    /// The editor closed with a new name.
    CommitRename { id: ItemId, new_name: String },
    /// The editor closed without changes.
    CancelRename { id: ItemId },
    /// A drag left the threshold; start a platform drag with this payload.
    StartDrag {
        payload: Vec<ItemId>,
        effects: DragEffects,
    },
    /// The platform drag ended.
    DragFinished,
    /// Show a context menu for `target`, or for the folder when `None`.
    ContextMenu {
        target: Option<ItemId>,
        position: Point,
    },
    /// Scroll the list to this vertical offset.
    ScrollTo { offset: f64 },
    /// Selection changed outside a click (rectangle selection).
    SelectionChanged,
}
