//! Core types for tabfile.
//!
//! This crate provides the data model shared by the rest of the workspace:
//! browsable item records, navigation locations, the session error taxonomy
//! and the tunable session configuration.

mod config;
mod error;
mod item;
mod location;

pub use config::{SessionConfig, SessionConfigBuilder};
pub use error::{SessionError, SessionResult};
pub use item::{ItemId, ItemKind, ItemRecord, normalize_path};
pub use location::{Location, ROOT_SENTINEL};
