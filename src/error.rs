//! Editor error taxonomy.
//!
//! Validation failures are caught locally before any network call. Persistence
//! failures come back from the [`crate::store::MapStore`] collaborator. Asking
//! the history for an impossible undo/redo is not an error at all; those calls
//! report "nothing happened" instead.

use crate::doc::PinId;
use crate::store::PersistenceError;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("pin {pin} is still connected to {roads} road(s)")]
    PinInUse { pin: PinId, roads: usize },
    #[error("{description}: {source}")]
    ReplayFailed {
        description: String,
        #[source]
        source: Box<EditorError>,
    },
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl EditorError {
    /// Stable code for hosts that map errors to localized messages.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::PinInUse { .. } => "E_PIN_IN_USE",
            Self::ReplayFailed { source, .. } => source.error_code(),
            Self::Persistence(e) => e.error_code(),
        }
    }
}
