//! Error types surfaced to callers.
//!
//! Cancelled events are never errors; host code opting out of a default
//! action through `prevent_default` is the normal control path.

use thiserror::Error;

/// Result type for user-event operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the simulation engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed key or pointer descriptor string
    #[error("{message}")]
    Parse {
        message: String,
        /// Char offset of the offending character in the full text
        position: usize,
    },

    /// Target or an ancestor declares `pointer-events: none`
    #[error("{0}")]
    PointerEvents(String),

    /// The requested operation is not available for the target or host
    #[error("{0}")]
    UnsupportedOperation(String),

    /// An event handler prevented a focus or selection step
    #[error("{0}")]
    Focus(String),
}

impl Error {
    pub(crate) fn parse(message: impl Into<String>, position: usize) -> Self {
        Self::Parse {
            message: message.into(),
            position,
        }
    }
}
