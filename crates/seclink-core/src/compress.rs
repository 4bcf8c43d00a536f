//! Zlib compression for message payloads.
//!
//! Standalone utility with no channel wiring: callers that want smaller
//! frames compress before sealing and decompress after opening.

use std::io::Read;

use flate2::Compression;
use flate2::read::{ZlibDecoder, ZlibEncoder};

use crate::error::CompressError;

/// Highest accepted compression level.
pub const MAX_LEVEL: u32 = 9;

/// Compress a payload with zlib at the given level (0 stores, 9 is best).
///
/// # Errors
///
/// - [`CompressError::InvalidLevel`] if `level` is above [`MAX_LEVEL`].
/// - [`CompressError::Compress`] if the encoder fails.
pub fn compress(input: &[u8], level: u32) -> Result<Vec<u8>, CompressError> {
    if level > MAX_LEVEL {
        return Err(CompressError::InvalidLevel(level));
    }

    let mut encoder = ZlibEncoder::new(input, Compression::new(level));
    let mut output = Vec::new();
    encoder.read_to_end(&mut output).map_err(CompressError::Compress)?;
    Ok(output)
}

/// Decompress a zlib payload.
///
/// # Errors
///
/// - [`CompressError::Decompress`] if the input is truncated or corrupt.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>, CompressError> {
    let mut decoder = ZlibDecoder::new(input);
    let mut output = Vec::new();
    decoder.read_to_end(&mut output).map_err(CompressError::Decompress)?;
    Ok(output)
}
