use std::io::Write;

use super::{BITS_PER_BYTE, MAX_FIELD_BITS};
use crate::error::CodecError;

/// Writes a bitstream for output. Values of 0-32 bits are packed least significant bit first into a pending byte,
/// which is handed to the underlying writer as soon as it is full.
#[derive(Debug)]
pub struct BitWriter<W> {
    /// Byte being filled.
    holder: u8,
    /// Count of valid bits in the holder (0-7).
    offset: u32,
    /// Handle to the output stream
    writer: W,
}

impl<W: Write> BitWriter<W> {
    /// Create a new BitWriter on top of `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            holder: 0,
            offset: 0,
            writer,
        }
    }

    /// Write the low `count` bits of `value`. Bits of `value` above `count` are ignored. Writing 0 bits does nothing.
    pub fn write_bits(&mut self, value: u32, count: u32) -> Result<(), CodecError> {
        debug_assert!(count <= MAX_FIELD_BITS, "field of {} bits is too wide", count);

        let mut value = value;
        let mut left = count;
        while left > 0 {
            // Slice off as many bits as the holder has room for
            let take = left.min(BITS_PER_BYTE - self.offset);
            let mask = (1_u32 << take) - 1;
            self.holder |= ((value & mask) as u8) << self.offset;
            self.offset += take;
            left -= take;
            value = value.checked_shr(take).unwrap_or(0);

            if self.offset == BITS_PER_BYTE {
                self.push_holder()?;
            }
        }
        Ok(())
    }

    /// Put a full 8 bit field on the stream.
    pub fn write_u8(&mut self, value: u8) -> Result<(), CodecError> {
        self.write_bits(value as u32, 8)
    }

    /// Put a full 32 bit field on the stream.
    pub fn write_u32(&mut self, value: u32) -> Result<(), CodecError> {
        self.write_bits(value, 32)
    }

    /// Pad the current byte and then write raw bytes.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<(), CodecError> {
        self.complete_byte()?;
        self.writer.write_all(data)?;
        Ok(())
    }

    /// Flushes the remaining bits (1-7) of a partially filled byte, padding with 0s in the most significant bits.
    /// Must be called at the end of encoding or the last bits are lost.
    pub fn complete_byte(&mut self) -> Result<(), CodecError> {
        if self.offset != 0 {
            self.push_holder()?;
        }
        Ok(())
    }

    /// True when the stream currently ends on a byte boundary.
    pub fn is_byte_complete(&self) -> bool {
        self.offset == 0
    }

    /// Complete the current byte and flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), CodecError> {
        self.complete_byte()?;
        self.writer.flush()?;
        Ok(())
    }

    /// Give back the underlying writer. Any partial byte that was not completed is dropped.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn push_holder(&mut self) -> Result<(), CodecError> {
        self.writer.write_all(&[self.holder])?;
        self.holder = 0;
        self.offset = 0;
        Ok(())
    }
}
