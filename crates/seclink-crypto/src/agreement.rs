//! X25519 key agreement and session key derivation.
//!
//! One key pair is generated per logical session, its public half is
//! exchanged with the peer, and the Diffie-Hellman output is hashed with
//! SHA-256 into the symmetric [`SessionKey`]. The key pair is consumed by
//! derivation, so it cannot outlive the exchange it was generated for.

use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::{
    error::CryptoError,
    keys::{PublicKey, SessionKey},
};

/// Ephemeral asymmetric key pair for one key-agreement exchange.
pub struct KeyPair {
    secret: x25519_dalek::StaticSecret,
    public: PublicKey,
}

impl KeyPair {
    /// Generate a fresh key pair from OS randomness.
    pub fn generate() -> Self {
        let secret = x25519_dalek::StaticSecret::random_from_rng(OsRng);
        let public = x25519_dalek::PublicKey::from(&secret);
        Self { secret, public: PublicKey::from_bytes(public.to_bytes()) }
    }

    /// Build a key pair from fixed secret bytes.
    ///
    /// For deterministic tests only; sessions always use [`Self::generate`].
    pub fn from_secret_bytes(secret_bytes: [u8; 32]) -> Self {
        let secret = x25519_dalek::StaticSecret::from(secret_bytes);
        let public = x25519_dalek::PublicKey::from(&secret);
        Self { secret, public: PublicKey::from_bytes(public.to_bytes()) }
    }

    /// Public half, to be sent to the peer in the clear.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Derive the symmetric session key from our key pair and the peer's
/// public key.
///
/// Computes the X25519 shared secret, then hashes it with SHA-256 to
/// produce the 32-byte session key. The raw shared secret is never used as
/// a cipher key - hashing prevents any structure in the DH output from
/// conditioning ciphertext - and its bytes are zeroized before this
/// function returns. The key pair is consumed: the private key cannot be
/// reused for another exchange.
///
/// # Errors
///
/// - `CryptoError::DerivationFailed` if the exchange was non-contributory
///   (the peer supplied a low-order point and the shared secret is all
///   zeros). No session key is produced.
pub fn derive_session_key(local: KeyPair, peer_public: &PublicKey) -> Result<SessionKey, CryptoError> {
    let peer = x25519_dalek::PublicKey::from(*peer_public.as_bytes());
    let shared = local.secret.diffie_hellman(&peer);

    if !shared.was_contributory() {
        return Err(CryptoError::DerivationFailed);
    }

    let mut digest: [u8; 32] = Sha256::digest(shared.as_bytes()).into();
    let key = SessionKey::from_bytes(digest);
    digest.zeroize();

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_public_keys_differ() {
        let a = KeyPair::generate();
        let b = KeyPair::generate();
        assert_ne!(a.public_key().as_bytes(), b.public_key().as_bytes());
    }

    #[test]
    fn both_sides_derive_the_same_key() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();

        let alice_public = alice.public_key().clone();
        let bob_public = bob.public_key().clone();

        let alice_key = derive_session_key(alice, &bob_public).unwrap();
        let bob_key = derive_session_key(bob, &alice_public).unwrap();

        assert_eq!(alice_key.as_bytes(), bob_key.as_bytes());
    }

    #[test]
    fn derivation_is_deterministic() {
        let peer = KeyPair::from_secret_bytes([7u8; 32]);
        let peer_public = peer.public_key().clone();

        let key1 =
            derive_session_key(KeyPair::from_secret_bytes([3u8; 32]), &peer_public).unwrap();
        let key2 =
            derive_session_key(KeyPair::from_secret_bytes([3u8; 32]), &peer_public).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn different_peers_produce_different_keys() {
        let peer_a = KeyPair::from_secret_bytes([7u8; 32]);
        let peer_b = KeyPair::from_secret_bytes([8u8; 32]);

        let key_a = derive_session_key(
            KeyPair::from_secret_bytes([3u8; 32]),
            &peer_a.public_key().clone(),
        )
        .unwrap();
        let key_b = derive_session_key(
            KeyPair::from_secret_bytes([3u8; 32]),
            &peer_b.public_key().clone(),
        )
        .unwrap();

        assert_ne!(key_a.as_bytes(), key_b.as_bytes());
    }

    #[test]
    fn session_key_differs_from_raw_shared_secret() {
        // The derived key is a hash of the DH output, never the DH output
        // itself.
        let alice = KeyPair::from_secret_bytes([3u8; 32]);
        let bob = KeyPair::from_secret_bytes([7u8; 32]);

        let bob_x = x25519_dalek::PublicKey::from(*bob.public_key().as_bytes());
        let raw = x25519_dalek::StaticSecret::from([3u8; 32]).diffie_hellman(&bob_x);

        let key = derive_session_key(alice, &bob.public_key().clone()).unwrap();
        assert_ne!(key.as_bytes(), raw.as_bytes());
    }

    #[test]
    fn low_order_peer_key_is_rejected() {
        // The identity point forces an all-zero shared secret; derivation
        // must fail rather than hand back a predictable key.
        let local = KeyPair::generate();
        let low_order = PublicKey::from_bytes([0u8; 32]);

        let result = derive_session_key(local, &low_order);
        assert_eq!(result.unwrap_err(), CryptoError::DerivationFailed);
    }
}
