//! Error types for sessions and collaborators.
//!
//! Channel-level failures (read errors, corrupt frames) are not modeled
//! here: they are handled inside the duplex flows per the recovery policy
//! - logged and either retried or turned into an orderly teardown - and
//! never surface to callers as process errors.

use thiserror::Error;

/// Errors during session establishment and teardown.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Credential check failed. No key material was generated.
    #[error("authentication failed for user '{username}'")]
    AuthFailed {
        /// Username that failed the credential check
        username: String,
    },

    /// Key agreement or derivation failed.
    #[error("key agreement failed: {0}")]
    Crypto(#[from] seclink_crypto::CryptoError),

    /// Public-key exchange over the connection failed.
    #[error("handshake I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the JSON configuration loader.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        /// Path that was attempted
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON or is missing required fields.
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        /// Path that was parsed
        path: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from the compression collaborator.
#[derive(Error, Debug)]
pub enum CompressError {
    /// Compression level outside the 0..=9 range.
    #[error("invalid compression level {0}, expected 0..=9")]
    InvalidLevel(u32),

    /// Deflate failed.
    #[error("compression failed: {0}")]
    Compress(#[source] std::io::Error),

    /// Inflate failed (truncated or corrupt input).
    #[error("decompression failed: {0}")]
    Decompress(#[source] std::io::Error),
}

/// Errors from the TLS transport collaborator.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Address is not a valid TLS server name.
    #[error("invalid server name '{0}'")]
    InvalidServerName(String),

    /// TCP connect failed.
    #[error("failed to connect: {0}")]
    Connect(#[source] std::io::Error),

    /// TLS configuration or handshake setup failed.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Peer closed the connection.
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// Read or write on the established connection failed.
    #[error("transport I/O failed: {0}")]
    Io(#[source] std::io::Error),
}
