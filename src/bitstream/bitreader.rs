//! BitReader: reads the packed bitstream written by BitWriter.
//!
//! NOTE: This module can read from any I/O source that supports the read() call. Bytes are requested one at a time,
//! and only once every bit of the previous byte has been consumed.
//!

use std::io::{ErrorKind, Read};

use super::{BITS_PER_BYTE, MAX_FIELD_BITS};
use crate::error::CodecError;

/// Reads a bitstream packed least significant bit first.
#[derive(Debug)]
pub struct BitReader<R> {
    /// Byte currently being consumed.
    holder: u8,
    /// Bits of the holder already consumed. 8 means the holder is empty.
    offset: u32,
    source: R,
}

impl<R: Read> BitReader<R> {
    /// Creates a new BitReader. Nothing is read until the first bit is requested.
    pub fn new(source: R) -> Self {
        Self {
            holder: 0,
            offset: BITS_PER_BYTE,
            source,
        }
    }

    /// Pull the next byte from the source. Running out of data here is always an error, since we only ask for a
    /// byte when a caller still needs bits from it.
    fn next_byte(&mut self) -> Result<u8, CodecError> {
        let mut byte = [0_u8; 1];
        loop {
            match self.source.read(&mut byte) {
                Ok(0) => return Err(CodecError::UnexpectedEnd),
                Ok(_) => return Ok(byte[0]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Return the next `count` bits as a u32 (0-32 bits). Reading 0 bits returns 0 and touches nothing.
    pub fn read_bits(&mut self, count: u32) -> Result<u32, CodecError> {
        debug_assert!(count <= MAX_FIELD_BITS, "field of {} bits is too wide", count);

        let mut result = 0_u32;
        let mut filled = 0;
        while filled < count {
            if self.offset == BITS_PER_BYTE {
                self.holder = self.next_byte()?;
                self.offset = 0;
            }
            // Take whatever we need, or whatever is left in the holder
            let take = (count - filled).min(BITS_PER_BYTE - self.offset);
            let mask = (1_u32 << take) - 1;
            let bits = (self.holder >> self.offset) as u32 & mask;
            result |= bits << filled;
            self.offset += take;
            filled += take;
        }
        Ok(result)
    }

    /// Return a single bit (1 or 0).
    pub fn read_bit(&mut self) -> Result<u32, CodecError> {
        self.read_bits(1)
    }

    /// Read a full 8 bit field.
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        self.read_bits(8).map(|byte| byte as u8)
    }

    /// Read a full 32 bit field.
    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        self.read_bits(32)
    }

    /// Discard the unread bits of the current byte, then fill `data` with raw bytes.
    pub fn read_bytes(&mut self, data: &mut [u8]) -> Result<(), CodecError> {
        self.offset = BITS_PER_BYTE;
        self.source.read_exact(data).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => CodecError::UnexpectedEnd,
            _ => CodecError::Io(e),
        })
    }

    /// Debugging function. Number of bits still buffered in the current byte.
    pub fn pending_bits(&self) -> u32 {
        BITS_PER_BYTE - self.offset
    }
}
