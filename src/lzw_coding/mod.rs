//! The lzw_coding module is a classic one-pass LZW dictionary coder.
//!
//! Both sides start from the 256 single-byte sequences (codes 0-255) and grow the dictionary by one entry for every
//! code the compressor emits. The decompressor rebuilds the same entries from its own output, so the dictionary is
//! never stored in the stream.
//!
//! There is no dictionary reset: a stream can use codes up to `u32::MAX`. An input that would need more than that
//! fails with `CodecError::CodeSpaceExhausted` instead of wrapping.
//!
pub mod lzw_compressor;
pub mod lzw_decompressor;

/// Number of single byte entries every dictionary starts with.
pub const SEED_CODES: u32 = 256;
