//! Lossless byte stream compression with three classic codecs.
//!
//! Provides bit packed run length encoding, two pass Huffman coding and LZW (either as bare 32 bit codes or packed to
//! the narrowest width that fits). All of them sit on a shared least significant bit first bit stream.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> bitpress -c -m huffman test.txt test.bp`
//!
//! and to restore it:
//!
//! `$> bitpress -d -m huffman test.bp test.txt`
//!
//! The compressed stream carries no magic number, so the same method must be named for both directions.
//!
pub mod bitstream;
pub mod code_table;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod lzw_coding;
pub mod rle_coding;
pub mod tools;

pub use compression::codec::Codec;
pub use compression::files::{compress_file, decompress_file};
pub use error::{CodecError, Failure};
