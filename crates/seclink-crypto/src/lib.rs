//! Seclink cryptographic primitives.
//!
//! Two building blocks, both operating on fixed 32-byte session keys:
//!
//! ```text
//! X25519 key agreement
//!        │
//!        ▼
//! SHA-256 over raw shared secret → SessionKey (32 bytes)
//!        │
//!        ▼
//! ChaCha20-Poly1305 seal/open → MessageFrame (nonce ‖ tag ‖ ciphertext)
//! ```
//!
//! # Security
//!
//! - The raw Diffie-Hellman output is never used as a cipher key. It is
//!   hashed into the session key and zeroized immediately after, so a weak
//!   or structured shared secret never conditions ciphertext directly.
//! - Session keys zero their memory on drop.
//! - Every sealed frame carries a fresh random nonce; nonce reuse under
//!   one key would break AEAD security, so nothing in this crate derives a
//!   nonce from message content or a counter.
//! - Opening a frame gives a single failure signal for tampering, wrong
//!   keys, and corrupt ciphertext alike. Callers cannot distinguish why a
//!   frame was rejected.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod agreement;
pub mod error;
pub mod keys;
pub mod seal;

pub use agreement::{KeyPair, derive_session_key};
pub use error::CryptoError;
pub use keys::{PublicKey, SessionKey};
pub use seal::{open, seal, seal_with_nonce};
