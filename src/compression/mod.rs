//! The compression module ties the engines to real byte streams.
//!
//! Every codec writes a self describing stream with no magic number or version. The layouts are, bit packed least
//! significant bit first and padded with zero bits to a whole byte:
//! - RLE: `min_value:8 max_value:8 min_repeats:8 max_repeats:8 total_bits:32` followed by the packed runs.
//! - Huffman: the serialized code table, `total_bits:32`, then the packed codes.
//! - Bit packed LZW: `count:32 min:32 width:8` followed by `count` codes of `width` bits, each stored as `code - min`.
//! - Plain LZW: bare 32 bit little endian codes.
//!
//! The RLE, Huffman and bit packed LZW compressors read their input twice, so they need a source that can rewind.
//! Decompression always makes a single pass.
//!

pub mod codec;
pub mod compress;
pub mod decompress;
pub mod files;
