//! Sealing and opening message frames with ChaCha20-Poly1305.
//!
//! `seal` turns one plaintext message into one [`MessageFrame`] under a
//! session key; `open` reverses it after verifying the authentication tag.
//! Confidentiality and integrity come from the same AEAD pass, so tampering
//! is detected at decrypt time without a separate MAC step.

use chacha20poly1305::{
    ChaCha20Poly1305, Key, Nonce, Tag,
    aead::{AeadInPlace, KeyInit},
};
use rand::{RngCore, rngs::OsRng};
use seclink_proto::{MAX_PLAINTEXT_SIZE, MessageFrame, NONCE_SIZE};

use crate::{error::CryptoError, keys::SessionKey};

/// Encrypt one message into a wire frame with a fresh random nonce.
///
/// # Errors
///
/// - `CryptoError::MessageTooLarge` if the plaintext cannot fit in a
///   single frame. Nothing is encrypted in that case.
pub fn seal(plaintext: &[u8], key: &SessionKey) -> Result<MessageFrame, CryptoError> {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);
    seal_with_nonce(plaintext, key, nonce)
}

/// Encrypt one message under a caller-supplied nonce.
///
/// The nonce MUST be unique per (key, message) pair; [`seal`] guarantees
/// that by drawing from OS randomness. This variant exists so tests can be
/// deterministic.
pub fn seal_with_nonce(
    plaintext: &[u8],
    key: &SessionKey,
    nonce: [u8; NONCE_SIZE],
) -> Result<MessageFrame, CryptoError> {
    if plaintext.len() > MAX_PLAINTEXT_SIZE {
        return Err(CryptoError::MessageTooLarge {
            size: plaintext.len(),
            max: MAX_PLAINTEXT_SIZE,
        });
    }

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let mut ciphertext = plaintext.to_vec();

    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(&nonce), b"", &mut ciphertext)
        .map_err(|_| CryptoError::EncryptionFailed)?;

    Ok(MessageFrame { nonce, tag: tag.into(), ciphertext })
}

/// Verify and decrypt one wire frame.
///
/// The tag is checked against the ciphertext, nonce, and key before any
/// plaintext is released; a failed check yields no partial plaintext.
///
/// # Errors
///
/// - `CryptoError::DecryptionFailed` for a bad tag, wrong key, or corrupt
///   ciphertext. The variants are intentionally indistinguishable.
pub fn open(frame: &MessageFrame, key: &SessionKey) -> Result<Vec<u8>, CryptoError> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let mut plaintext = frame.ciphertext.clone();

    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(&frame.nonce),
            b"",
            &mut plaintext,
            Tag::from_slice(&frame.tag),
        )
        .map_err(|_| CryptoError::DecryptionFailed)?;

    Ok(plaintext)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;
    use seclink_proto::{HEADER_SIZE, TAG_SIZE};

    use super::*;

    fn test_key() -> SessionKey {
        SessionKey::from_bytes([0x11; 32])
    }

    fn other_key() -> SessionKey {
        SessionKey::from_bytes([0x22; 32])
    }

    #[test]
    fn seal_open_round_trip() {
        let key = test_key();
        let frame = seal(b"hello, world", &key).unwrap();
        let plaintext = open(&frame, &key).unwrap();
        assert_eq!(plaintext, b"hello, world");
    }

    #[test]
    fn empty_message_round_trips() {
        let key = test_key();
        let frame = seal(b"", &key).unwrap();
        assert!(frame.ciphertext.is_empty());
        assert_eq!(frame.encoded_len(), HEADER_SIZE);

        let plaintext = open(&frame, &key).unwrap();
        assert!(plaintext.is_empty());
    }

    #[test]
    fn frame_size_is_plaintext_plus_overhead() {
        let key = test_key();
        let frame = seal(&[0x42; 100], &key).unwrap();
        assert_eq!(frame.encoded_len(), HEADER_SIZE + 100);
    }

    #[test]
    fn oversized_message_is_rejected_before_encryption() {
        let key = test_key();
        let result = seal(&vec![0u8; MAX_PLAINTEXT_SIZE + 1], &key);
        assert!(matches!(result, Err(CryptoError::MessageTooLarge { .. })));
    }

    #[test]
    fn max_size_message_round_trips() {
        let key = test_key();
        let plaintext = vec![0x7Fu8; MAX_PLAINTEXT_SIZE];
        let frame = seal(&plaintext, &key).unwrap();
        assert_eq!(open(&frame, &key).unwrap(), plaintext);
    }

    #[test]
    fn wrong_key_fails() {
        let frame = seal(b"secret", &test_key()).unwrap();
        let result = open(&frame, &other_key());
        assert_eq!(result.unwrap_err(), CryptoError::DecryptionFailed);
    }

    #[test]
    fn tampered_tag_fails() {
        let key = test_key();
        let mut frame = seal(b"secret", &key).unwrap();
        frame.tag[0] ^= 0x01;
        assert_eq!(open(&frame, &key).unwrap_err(), CryptoError::DecryptionFailed);
    }

    #[test]
    fn tampered_nonce_fails() {
        let key = test_key();
        let mut frame = seal(b"secret", &key).unwrap();
        frame.nonce[11] ^= 0x80;
        assert_eq!(open(&frame, &key).unwrap_err(), CryptoError::DecryptionFailed);
    }

    #[test]
    fn nonces_are_unique_across_many_seals() {
        let key = test_key();
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let frame = seal(b"x", &key).unwrap();
            assert!(seen.insert(frame.nonce), "nonce repeated");
        }
    }

    #[test]
    fn deterministic_nonce_gives_deterministic_frame() {
        let key = test_key();
        let nonce = [9u8; NONCE_SIZE];
        let a = seal_with_nonce(b"msg", &key, nonce).unwrap();
        let b = seal_with_nonce(b"msg", &key, nonce).unwrap();
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn round_trip_all_lengths(
            plaintext in proptest::collection::vec(any::<u8>(), 0..MAX_PLAINTEXT_SIZE)
        ) {
            let key = test_key();
            let frame = seal(&plaintext, &key).unwrap();
            prop_assert_eq!(open(&frame, &key).unwrap(), plaintext);
        }

        #[test]
        fn any_single_bit_flip_is_detected(
            plaintext in proptest::collection::vec(any::<u8>(), 1..256usize),
            bit in 0usize..8,
            pos_seed in any::<usize>(),
        ) {
            let key = test_key();
            let mut frame = seal(&plaintext, &key).unwrap();

            // Flip one bit somewhere in tag or ciphertext
            let span = TAG_SIZE + frame.ciphertext.len();
            let pos = pos_seed % span;
            if pos < TAG_SIZE {
                frame.tag[pos] ^= 1 << bit;
            } else {
                frame.ciphertext[pos - TAG_SIZE] ^= 1 << bit;
            }

            prop_assert_eq!(open(&frame, &key).unwrap_err(), CryptoError::DecryptionFailed);
        }
    }
}
