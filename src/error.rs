//! Error types.

use thiserror::Error;

/// Failure of a clipboard write.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// No clipboard exists in this environment (headless session, no display).
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    /// The host refused the write.
    #[error("clipboard access denied")]
    Denied,

    #[error("clipboard backend error: {0}")]
    Backend(#[from] arboard::Error),
}
