//! Fuzz target for opening hostile frames
//!
//! An attacker controls every byte of a received frame. Opening one under
//! a key the attacker does not hold must either verify (practically
//! impossible for random input) or fail with the single decryption error,
//! and must never panic.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use seclink_crypto::{CryptoError, SessionKey, open};
use seclink_proto::MessageFrame;

#[derive(Debug, Arbitrary)]
struct HostileFrame {
    nonce: [u8; 12],
    tag: [u8; 16],
    ciphertext: Vec<u8>,
}

fuzz_target!(|input: HostileFrame| {
    let key = SessionKey::from_bytes([0x5A; 32]);
    let frame = MessageFrame {
        nonce: input.nonce,
        tag: input.tag,
        ciphertext: input.ciphertext,
    };

    if let Err(error) = open(&frame, &key) {
        assert_eq!(error, CryptoError::DecryptionFailed);
    }
});
