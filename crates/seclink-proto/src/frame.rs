//! Message frame: one encrypted message as it appears on the wire.
//!
//! Layout, sent as a single transport write:
//!
//! ```text
//! [ 12 bytes nonce ][ 16 bytes auth tag ][ N bytes ciphertext ]
//! ```
//!
//! Total length is `28 + N`. There is no length prefix: the design assumes
//! one read call yields one complete frame, so the transport (or the read
//! buffer size) must preserve message boundaries. Reassembling split reads
//! is out of scope for this layer.

use bytes::BufMut;

use crate::errors::ProtocolError;

/// Nonce length in bytes (96-bit AEAD nonce).
pub const NONCE_SIZE: usize = 12;

/// Authentication tag length in bytes (Poly1305 / GCM tag).
pub const TAG_SIZE: usize = 16;

/// Fixed frame overhead: nonce + tag.
pub const HEADER_SIZE: usize = NONCE_SIZE + TAG_SIZE;

/// Largest frame the duplex transport reads in one call.
pub const MAX_FRAME_SIZE: usize = 4096;

/// Largest plaintext that fits in a single frame.
pub const MAX_PLAINTEXT_SIZE: usize = MAX_FRAME_SIZE - HEADER_SIZE;

/// One self-contained encrypted message.
///
/// # Invariants
///
/// - The nonce MUST be unique per (key, message) pair. Frames are built by
///   `seclink-crypto::seal`, which draws a fresh random nonce for every
///   message; this type never reuses or mutates one.
/// - The tag authenticates the ciphertext under the nonce and key; a frame
///   whose tag does not verify yields no plaintext.
///
/// # Security
///
/// This type provides structural validity only: decode guarantees the
/// nonce and tag fields are present, nothing more. Authenticity is
/// established when the frame is opened with the session key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFrame {
    /// Fresh random nonce for this message
    pub nonce: [u8; NONCE_SIZE],
    /// AEAD authentication tag over the ciphertext
    pub tag: [u8; TAG_SIZE],
    /// Encrypted message body (may be empty)
    pub ciphertext: Vec<u8>,
}

impl MessageFrame {
    /// Encoded length of this frame: `28 + ciphertext.len()`.
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.ciphertext.len()
    }

    /// Encode the frame into a buffer in wire order.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::FrameTooLarge` if the encoded frame would exceed
    ///   [`MAX_FRAME_SIZE`] and could never be delivered in one read.
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<(), ProtocolError> {
        if self.encoded_len() > MAX_FRAME_SIZE {
            return Err(ProtocolError::FrameTooLarge {
                size: self.encoded_len(),
                max: MAX_FRAME_SIZE,
            });
        }

        dst.put_slice(&self.nonce);
        dst.put_slice(&self.tag);
        dst.put_slice(&self.ciphertext);

        Ok(())
    }

    /// Encode the frame into a freshly allocated `Vec`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode(&mut out)?;
        Ok(out)
    }

    /// Decode one frame from wire bytes.
    ///
    /// Everything after the 28-byte header is taken as ciphertext, so a
    /// zero-length message decodes from exactly 28 bytes.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::FrameTooShort` if fewer than 28 bytes are given.
    ///   This check happens before any ciphertext is copied, so truncated
    ///   garbage never reaches the cipher.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        if bytes.len() < HEADER_SIZE {
            return Err(ProtocolError::FrameTooShort { actual: bytes.len(), min: HEADER_SIZE });
        }

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&bytes[..NONCE_SIZE]);

        let mut tag = [0u8; TAG_SIZE];
        tag.copy_from_slice(&bytes[NONCE_SIZE..HEADER_SIZE]);

        let ciphertext = bytes[HEADER_SIZE..].to_vec();

        Ok(Self { nonce, tag, ciphertext })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn sample_frame(ciphertext: Vec<u8>) -> MessageFrame {
        MessageFrame { nonce: [0xA5; NONCE_SIZE], tag: [0x5A; TAG_SIZE], ciphertext }
    }

    #[test]
    fn encoded_len_is_header_plus_ciphertext() {
        let frame = sample_frame(vec![1, 2, 3]);
        assert_eq!(frame.encoded_len(), HEADER_SIZE + 3);
    }

    #[test]
    fn empty_ciphertext_round_trips() {
        let frame = sample_frame(Vec::new());
        let wire = frame.to_bytes().unwrap();
        assert_eq!(wire.len(), HEADER_SIZE);

        let parsed = MessageFrame::decode(&wire).unwrap();
        assert_eq!(parsed, frame);
    }

    #[test]
    fn reject_short_frame() {
        for len in 0..HEADER_SIZE {
            let bytes = vec![0u8; len];
            let result = MessageFrame::decode(&bytes);
            assert!(
                matches!(result, Err(ProtocolError::FrameTooShort { actual, .. }) if actual == len),
                "length {len} must be rejected"
            );
        }
    }

    #[test]
    fn exactly_header_size_is_accepted() {
        let bytes = vec![0u8; HEADER_SIZE];
        let frame = MessageFrame::decode(&bytes).unwrap();
        assert!(frame.ciphertext.is_empty());
    }

    #[test]
    fn reject_oversized_frame_on_encode() {
        let frame = sample_frame(vec![0u8; MAX_PLAINTEXT_SIZE + 1]);
        let result = frame.to_bytes();
        assert!(matches!(result, Err(ProtocolError::FrameTooLarge { .. })));
    }

    #[test]
    fn wire_order_is_nonce_tag_ciphertext() {
        let frame = sample_frame(vec![0xEE; 4]);
        let wire = frame.to_bytes().unwrap();

        assert_eq!(&wire[..NONCE_SIZE], &[0xA5; NONCE_SIZE]);
        assert_eq!(&wire[NONCE_SIZE..HEADER_SIZE], &[0x5A; TAG_SIZE]);
        assert_eq!(&wire[HEADER_SIZE..], &[0xEE; 4]);
    }

    proptest! {
        #[test]
        fn frame_round_trip(
            nonce in any::<[u8; NONCE_SIZE]>(),
            tag in any::<[u8; TAG_SIZE]>(),
            ciphertext in proptest::collection::vec(any::<u8>(), 0..MAX_PLAINTEXT_SIZE),
        ) {
            let frame = MessageFrame { nonce, tag, ciphertext };
            let wire = frame.to_bytes().unwrap();
            let parsed = MessageFrame::decode(&wire).unwrap();
            prop_assert_eq!(frame, parsed);
        }

        #[test]
        fn decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..MAX_FRAME_SIZE)) {
            let _ = MessageFrame::decode(&bytes);
        }
    }
}
