//! Session establishment: credential check, key exchange, teardown.
//!
//! A [`Session`] is the precondition for running the duplex channel. It is
//! established in two strictly ordered steps over an already-open
//! connection:
//!
//! 1. Credential check against the [`CredentialStore`]. A failure
//!    short-circuits before any key material exists.
//! 2. X25519 public-key exchange (32 bytes each way) and derivation of the
//!    shared [`SessionKey`].
//!
//! Teardown goes through [`terminate`], which drops the session and with it
//! the key material. [`SessionKey`] zeroizes on drop, so a terminated
//! session leaves no key bytes behind.

use std::collections::HashMap;

use seclink_crypto::{KeyPair, PublicKey, SessionKey, derive_session_key};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::error::SessionError;

/// Username-to-credential map used to gate session establishment.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    /// Build a store from a username-to-credential map.
    #[must_use]
    pub fn new(credentials: HashMap<String, String>) -> Self {
        Self { credentials }
    }

    /// Check a username/credential pair.
    ///
    /// Unknown usernames and wrong credentials are indistinguishable to the
    /// caller.
    #[must_use]
    pub fn verify(&self, username: &str, credential: &str) -> bool {
        self.credentials.get(username).is_some_and(|c| c == credential)
    }
}

/// An established secure session: an authenticated identity plus the
/// symmetric key for the channel.
#[derive(Debug)]
pub struct Session {
    username: String,
    key: SessionKey,
}

impl Session {
    /// Establish a session over an open connection.
    ///
    /// Runs the credential check first, then the key exchange: our public
    /// key is written to the stream, the peer's 32-byte public key is read
    /// back, and the session key is derived from the two. Both sides call
    /// this with the same ordering; the exchange is symmetric because the
    /// write happens before the read and the transport buffers the 32
    /// bytes.
    ///
    /// # Errors
    ///
    /// - [`SessionError::AuthFailed`] if the credentials do not verify. No
    ///   key pair is generated and nothing is written to the stream.
    /// - [`SessionError::Io`] if the public-key exchange fails.
    /// - [`SessionError::Crypto`] if key derivation fails (for example a
    ///   low-order peer key).
    pub async fn establish<S>(
        username: &str,
        credential: &str,
        store: &CredentialStore,
        stream: &mut S,
    ) -> Result<Self, SessionError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        if !store.verify(username, credential) {
            return Err(SessionError::AuthFailed { username: username.to_owned() });
        }
        debug!(username, "credentials verified");

        let local = KeyPair::generate();
        stream.write_all(local.public_key().as_bytes()).await?;
        stream.flush().await?;

        let mut peer_bytes = [0u8; 32];
        stream.read_exact(&mut peer_bytes).await?;
        let peer_public = PublicKey::from_bytes(peer_bytes);

        let key = derive_session_key(local, &peer_public)?;
        info!(username, "session established");

        Ok(Self { username: username.to_owned(), key })
    }

    /// Build a session directly from a known key, skipping the exchange.
    ///
    /// For tests that need both ends of a channel to share a key without
    /// running the handshake.
    #[must_use]
    pub fn from_parts(username: String, key: SessionKey) -> Self {
        Self { username, key }
    }

    /// The authenticated username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The symmetric key for this session.
    #[must_use]
    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    /// Consume the session, yielding the key for the channel.
    #[must_use]
    pub fn into_key(self) -> SessionKey {
        self.key
    }
}

/// Terminate a session, dropping its key material.
///
/// Idempotent: terminating an already-empty slot is a no-op. The key bytes
/// are zeroized when the session drops.
pub fn terminate(slot: &mut Option<Session>) {
    if let Some(session) = slot.take() {
        info!(username = session.username(), "session terminated");
        drop(session);
    }
}
