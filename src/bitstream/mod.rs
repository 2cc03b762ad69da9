//! The bitstream module is the I/O subsystem shared by every codec in the crate.
//!
//! All compressed formats are written as a sequence of fields of arbitrary bit width. Fields are packed least
//! significant bit first: the first bit written lands in bit 0 of the first byte, and a value that does not fit in
//! the bits left over in the current byte continues in the low bits of the next byte. The end of a stream is padded
//! with zero bits up to a byte boundary.
//!
//! The writer and reader sit on top of any `std::io::Write` / `std::io::Read`, and only ever touch the underlying
//! channel one byte at a time. Callers that feed them from files should wrap the file in a `BufReader` or `BufWriter`.
//!
pub mod bitreader;
pub mod bitwriter;

/// Bits in one byte of the underlying channel.
pub const BITS_PER_BYTE: u32 = 8;

/// Widest field the reader and writer handle in one call.
pub const MAX_FIELD_BITS: u32 = 32;

/// Number of bits needed to hold `value`. By convention zero still needs one bit.
pub fn bit_width(value: u32) -> u32 {
    if value == 0 {
        1
    } else {
        u32::BITS - value.leading_zeros()
    }
}
