//! Fuzz target for wire frame decoding
//!
//! The receive path hands raw network bytes straight to the decoder, so it
//! must never panic on hostile input.
//!
//! # Invariants
//!
//! - Buffers shorter than the 28-byte header MUST return
//!   `ProtocolError::FrameTooShort`, never a frame
//! - Buffers of 28 bytes or more MUST decode, with every byte past the
//!   header landing in the ciphertext
//! - Decoding then re-encoding MUST reproduce the input bytes exactly for
//!   any input within the frame size cap

#![no_main]

use libfuzzer_sys::fuzz_target;
use seclink_proto::{HEADER_SIZE, MAX_FRAME_SIZE, MessageFrame, ProtocolError};

fuzz_target!(|data: &[u8]| {
    match MessageFrame::decode(data) {
        Ok(frame) => {
            assert!(data.len() >= HEADER_SIZE);
            assert_eq!(frame.ciphertext.len(), data.len() - HEADER_SIZE);
            if data.len() <= MAX_FRAME_SIZE {
                assert_eq!(frame.to_bytes().unwrap(), data);
            }
        }
        Err(ProtocolError::FrameTooShort { actual, min }) => {
            assert_eq!(actual, data.len());
            assert_eq!(min, HEADER_SIZE);
            assert!(data.len() < HEADER_SIZE);
        }
        Err(_) => {}
    }
});
