//! Fuzz target for zlib decompression
//!
//! Compressed payloads arrive from the peer, so the decoder sees
//! attacker-controlled streams. It must never panic; corrupt or truncated
//! input fails with a structured error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use seclink_core::compress::decompress;

fuzz_target!(|data: &[u8]| {
    let _ = decompress(data);
});
