//! The rle_coding module is the bit-packed run-length coder.
//!
//! Compression takes two passes over the input. The scanner splits the input into runs (a run ends when the byte
//! changes or after 255 repeats) and records the smallest and largest byte value and run length. Those four numbers
//! are all the decoder needs: every run is then stored as a (value, repeats) pair, each field offset by its minimum and
//! packed into just enough bits to cover the observed range.
//!
//! Both the scanner and the compressor are strict state machines. Calling them out of order is a bug in the caller
//! and panics.
//!
pub mod rle_compressor;
pub mod rle_scanner;
pub mod rle_table;

/// Longest run a single (value, repeats) pair can describe.
pub const MAX_RUN: u8 = u8::MAX;
