//! Server error type.

use thiserror::Error;

/// Fatal server errors.
///
/// Per-connection failures never surface here; they are logged and the
/// accept loop keeps serving.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Binding the listen socket failed.
    #[error("failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),

    /// The listener socket is unusable.
    #[error("listener I/O failed: {0}")]
    Io(#[source] std::io::Error),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] seclink_core::ConfigError),
}
