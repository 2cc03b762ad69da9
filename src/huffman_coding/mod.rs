//! The huffman module is the two-pass entropy coder.
//!
//! The scanner counts how often each byte occurs, builds a Huffman tree from those weights and turns the tree into a
//! code table. The table (not the tree) is written at the head of the compressed stream, followed by the total number
//! of code bits and the codes themselves.
//!
//! The decoder rebuilds a binary trie from the table and walks it one bit at a time.
//!
//! Codes are read from bit 0 upwards: the bit for depth `d` of the tree is bit `d` of the code. A 1 bit selects the
//! left child and a 0 bit the right child.
//!
//! The exact tree shape is private to this coder. Since the table travels with the data, nothing outside this module
//! has to be able to reproduce it.
//!

pub mod huffman;
pub mod huffman_code_from_weights;
pub mod huffman_reader;

/// Bit value selecting the left child.
pub const BIT_LEFT: u32 = 1;
/// Bit value selecting the right child.
pub const BIT_RIGHT: u32 = 0;
