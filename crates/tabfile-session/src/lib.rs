//! Browsing sessions for tabfile.
//!
//! A [`DirectorySession`] keeps one tab's item list in step with the
//! filesystem: it enumerates locations in the background, follows change
//! notifications, switches between browsing and search results, and keeps
//! back/forward history. [`SelectionModel`] holds the multi-selection and
//! [`InputStateMachine`] turns pointer gestures into selection changes,
//! drags and inline renames.

mod history;
mod input;
mod reconcile;
mod selection;
mod session;

pub use history::{History, HistoryEntry};
pub use input::{
    DragEffects, HitTarget, InputAction, InputState, InputStateMachine, Modifiers, Point,
    PointerButton, PointerEvent, RectSelection, RenameEditor, Viewport,
};
pub use reconcile::Reconciled;
pub use selection::SelectionModel;
pub use session::{DirectorySession, RenameOutcome, SessionEvent, SessionMessage, SessionMode};

// Re-export the types sessions are built from
pub use tabfile_core::{ItemId, ItemKind, ItemRecord, Location, SessionConfig, SessionError};
pub use tabfile_ops::{ActivationIntent, Activator, FsRenamer, RenameCommitter, SystemActivator};
pub use tabfile_scan::{ChangeEvent, ChangeNotifier, LocalQueryProvider, NotifyChangeNotifier, QueryProvider};
