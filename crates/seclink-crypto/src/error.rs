//! Error types for key agreement and frame sealing.

use thiserror::Error;

/// Errors from the cryptographic layer.
///
/// `DecryptionFailed` deliberately carries no detail: a tampered tag, a
/// wrong key, and corrupt ciphertext are indistinguishable to the caller,
/// so rejected frames leak nothing about why they were rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Peer public key bytes had the wrong length.
    #[error("invalid public key: expected 32 bytes, got {actual}")]
    InvalidPublicKey {
        /// Bytes actually provided
        actual: usize,
    },

    /// Key agreement produced a non-contributory (all-zero) shared secret.
    #[error("session key derivation failed")]
    DerivationFailed,

    /// Plaintext does not fit in a single wire frame.
    #[error("message too large: {size} bytes exceeds {max}")]
    MessageTooLarge {
        /// Plaintext length
        size: usize,
        /// Largest plaintext that fits one frame
        max: usize,
    },

    /// AEAD encryption failed.
    #[error("encryption failed")]
    EncryptionFailed,

    /// Tag verification or decryption failed; the frame must be discarded.
    #[error("decryption failed")]
    DecryptionFailed,
}
