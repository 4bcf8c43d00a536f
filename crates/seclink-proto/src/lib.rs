//! Seclink wire protocol.
//!
//! Defines the single frame type that travels over the transport: a
//! self-contained authenticated-encryption unit of `nonce || tag ||
//! ciphertext`. This crate is a pure data layer - it knows the byte layout
//! and nothing about keys or ciphers. Sealing and opening frames lives in
//! `seclink-crypto`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
pub mod frame;

pub use errors::ProtocolError;
pub use frame::{HEADER_SIZE, MAX_FRAME_SIZE, MAX_PLAINTEXT_SIZE, MessageFrame, NONCE_SIZE, TAG_SIZE};
