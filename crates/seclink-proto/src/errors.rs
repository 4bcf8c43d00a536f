//! Error types for frame encoding and decoding.

use thiserror::Error;

/// Errors produced while parsing wire bytes into a [`crate::MessageFrame`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Input is shorter than the fixed nonce + tag header.
    ///
    /// Rejected before any cryptographic work happens.
    #[error("frame too short: {actual} bytes, need at least {min}")]
    FrameTooShort {
        /// Bytes actually available
        actual: usize,
        /// Minimum frame length (nonce + tag)
        min: usize,
    },

    /// Frame exceeds the transport buffer and can never arrive in one read.
    #[error("frame too large: {size} bytes exceeds {max}")]
    FrameTooLarge {
        /// Encoded frame length
        size: usize,
        /// Maximum frame length the transport delivers whole
        max: usize,
    },
}
