//! Key material types: session keys and public keys.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

/// Length of a session key in bytes.
pub const SESSION_KEY_SIZE: usize = 32;

/// Length of an X25519 public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Symmetric session key, derived once per session.
///
/// Held only in memory and zeroed when dropped, so terminating a session
/// (dropping its key) overwrites the key bytes before the allocation is
/// released. Never logged: the `Debug` impl redacts the contents.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey([u8; SESSION_KEY_SIZE]);

impl SessionKey {
    /// Wrap raw key bytes.
    ///
    /// Intended for key derivation and for test fixtures with a static
    /// key. Production sessions obtain their key from
    /// [`crate::derive_session_key`], never from a hardcoded constant.
    pub fn from_bytes(bytes: [u8; SESSION_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; SESSION_KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionKey([REDACTED])")
    }
}

/// X25519 public key (32 bytes), safe to transmit in the clear.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey([u8; PUBLIC_KEY_SIZE]);

impl PublicKey {
    /// Wrap raw public key bytes.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Parse a public key from a slice.
    pub fn from_slice(slice: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; PUBLIC_KEY_SIZE] = slice
            .try_into()
            .map_err(|_| CryptoError::InvalidPublicKey { actual: slice.len() })?;
        Ok(Self(bytes))
    }

    /// Raw public key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({:02x}{:02x}{:02x}{:02x}..)", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_key_debug_redacts_contents() {
        let key = SessionKey::from_bytes([0x42; SESSION_KEY_SIZE]);
        let debug = format!("{key:?}");
        assert!(!debug.contains("42"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn public_key_from_slice_rejects_wrong_length() {
        assert!(PublicKey::from_slice(&[0u8; 16]).is_err());
        assert!(PublicKey::from_slice(&[0u8; 33]).is_err());
        assert!(PublicKey::from_slice(&[0u8; 32]).is_ok());
    }

    #[test]
    fn public_key_round_trips_through_bytes() {
        let bytes = [0xAB; PUBLIC_KEY_SIZE];
        let key = PublicKey::from_bytes(bytes);
        assert_eq!(key.as_bytes(), &bytes);
    }
}
