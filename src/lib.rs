//! themetree - tag-based virtual folders for SillyTavern-style theme presets
//!
//! Theme presets live flat on the host; themetree groups them into virtual
//! folders by `[tag]` prefixes embedded in their names, tracks favorites and
//! per-background bindings locally, and keeps everything consistent through
//! batch rename/delete operations against the host's REST endpoints.
//!
//! # Modules
//!
//! - [`tags`] - The `[tag]` name codec: extract, add, remove, move, sanitize
//! - [`category`] - Folder tree derivation from names plus local bindings
//! - [`api`] - The remote theme store and its HTTP client
//! - [`host`] - Local mirror of the host's theme `<select>`
//! - [`bindings`] - Persisted favorites, order, collapse and background state
//! - [`engine`] - The sync engine coordinating all of the above
//! - [`session`] - Batch-mode selection state

pub mod api;
pub mod bindings;
pub mod category;
pub mod cli;
pub mod commands;
pub mod config;
pub mod debug;
pub mod engine;
pub mod error;
pub mod host;
pub mod session;
pub mod tags;

// Re-export commonly used types
pub use api::{HttpStore, Theme, ThemeStore};
pub use bindings::BindingStore;
pub use category::{CategoryView, ThemeView};
pub use config::Config;
pub use engine::{BatchSummary, ReloadPolicy, SyncEngine, TagOp};
pub use error::SyncError;
pub use session::{BatchSession, Selection};
