//! Failure taxonomy for theme synchronization
//!
//! Every engine operation reports one of these variants so callers can
//! distinguish "skip this item" conditions from hard transport failures.

use thiserror::Error;

/// Errors produced by the sync engine and the theme store.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The referenced theme no longer exists server-side.
    ///
    /// Tolerated as a no-op in delete paths, treated as a skip in
    /// rename/move paths.
    #[error("theme not found: \"{0}\"")]
    NotFound(String),

    /// The target name is already used by a different theme.
    ///
    /// The operation for that item is skipped; an existing theme is never
    /// silently overwritten.
    #[error("a different theme is already named \"{0}\"")]
    NameConflict(String),

    /// Rejected before any network call: malformed import file, empty
    /// sanitized tag, or an empty/unchanged rename target.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Network or HTTP error from the theme store, carrying the server's
    /// message when one could be extracted.
    #[error("request failed: {0}")]
    Transport(String),

    /// A rename saved the theme under the new name but could not delete the
    /// old one, so the theme now exists twice on the server.
    ///
    /// Reported distinctly from an outright rename failure because local
    /// bindings have already moved to the new name (the name the user sees).
    #[error("rename saved \"{new}\" but failed to delete \"{old}\" ({reason}); the theme now exists under both names")]
    RenameLeftDuplicate {
        old: String,
        new: String,
        reason: String,
    },
}

impl SyncError {
    /// Whether a batch loop should count this as a skip rather than a failure.
    pub fn is_skip(&self) -> bool {
        matches!(self, SyncError::NotFound(_) | SyncError::NameConflict(_))
    }
}
