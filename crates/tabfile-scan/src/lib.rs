//! Directory enumeration and external collaborators for tabfile.
//!
//! # Overview
//!
//! `tabfile-scan` holds everything that touches the filesystem on behalf of
//! a browsing session:
//!
//! - **Enumeration** of a directory (folders first, then files) with
//!   cooperative cancellation
//! - **Root listing** of drives and mount points
//! - **Change notification** through the [`ChangeNotifier`] trait, backed by
//!   `notify` in [`NotifyChangeNotifier`]
//! - **Queries** through the [`QueryProvider`] trait, with a local
//!   filename search in [`LocalQueryProvider`]
//!
//! # Example
//!
//! ```rust,no_run
//! use tabfile_scan::{enumerate_directory, SessionConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = SessionConfig::default();
//! let items = enumerate_directory("/tmp".as_ref(), &config, &CancellationToken::new()).unwrap();
//! println!("{} entries", items.len());
//! ```

mod enumerate;
mod query;
mod roots;
mod watch;

pub use enumerate::{EnumerateError, enumerate_directory, validate_directory};
pub use query::{LocalQueryProvider, QueryProvider, QueryReply, QueryRequest, ReplySink};
pub use roots::list_roots;
pub use watch::{ChangeEvent, ChangeNotifier, ChangeSink, NotifyChangeNotifier, WatchHandle};

// Re-export core types for convenience
pub use tabfile_core::{ItemId, ItemKind, ItemRecord, Location, SessionConfig, SessionError};
