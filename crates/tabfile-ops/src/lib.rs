//! Item operations for tabfile.
//!
//! This crate provides the two operations a browsing session hands off to
//! the outside world: committing an inline rename to the filesystem, and
//! activating (opening) an item with modifier-dependent intent.

mod activate;
mod rename;

pub use activate::{ActivationIntent, Activator, Modifiers, SystemActivator};
pub use rename::{
    FsRenamer, RenameCommitter, RenamePlan, extension_changed, plan_rename, stem_range,
    validate_filename,
};
