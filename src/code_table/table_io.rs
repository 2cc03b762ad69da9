//! Compact serialization of a CodeTable.
//!
//! Only used entries are written. The header carries the count of entries, the bit width of each delta field and the
//! minimum of each field; every entry is then stored as its distance from those minimums:
//!
//! ```text
//! count:32 value_bits:32 code_bits:32 length_bits:32 min_value:8 min_code:32 min_length:32
//! count x [ value-min_value : value_bits | code-min_code : code_bits | length-min_length : length_bits ]
//! ```
//!
//! Entries appear in ascending byte order.

use std::io::{Read, Write};

use log::trace;

use super::{CodeLength, CodeTable, BYTE_VALUES};
use crate::bitstream::{bit_width, bitreader::BitReader, bitwriter::BitWriter, MAX_FIELD_BITS};
use crate::error::CodecError;

/// Min/max bounds of the used entries, gathered in one sweep over the table.
struct TableBounds {
    count: u32,
    min_value: u8,
    max_value: u8,
    min_code: u32,
    max_code: u32,
    min_length: u32,
    max_length: u32,
}

impl TableBounds {
    fn of(table: &CodeTable) -> Self {
        let mut bounds = TableBounds {
            count: 0,
            min_value: u8::MAX,
            max_value: 0,
            min_code: u32::MAX,
            max_code: 0,
            min_length: u32::MAX,
            max_length: 0,
        };
        for (b, cl) in table.used() {
            bounds.count += 1;
            bounds.min_value = bounds.min_value.min(b);
            bounds.max_value = bounds.max_value.max(b);
            bounds.min_code = bounds.min_code.min(cl.code);
            bounds.max_code = bounds.max_code.max(cl.code);
            bounds.min_length = bounds.min_length.min(cl.length);
            bounds.max_length = bounds.max_length.max(cl.length);
        }
        // An empty table writes zero minimums
        if bounds.count == 0 {
            bounds.min_value = 0;
            bounds.min_code = 0;
            bounds.min_length = 0;
        }
        bounds
    }
}

/// Write the used entries of `table` to the stream.
pub fn write_code_table<W: Write>(
    bw: &mut BitWriter<W>,
    table: &CodeTable,
) -> Result<(), CodecError> {
    let bounds = TableBounds::of(table);

    let (value_bits, code_bits, length_bits) = if bounds.count == 0 {
        (1, 1, 1)
    } else {
        (
            bit_width((bounds.max_value - bounds.min_value) as u32),
            bit_width(bounds.max_code - bounds.min_code),
            bit_width(bounds.max_length - bounds.min_length),
        )
    };
    trace!(
        "code table: {} entries, widths {}/{}/{}",
        bounds.count,
        value_bits,
        code_bits,
        length_bits
    );

    // Header
    bw.write_u32(bounds.count)?;
    bw.write_u32(value_bits)?;
    bw.write_u32(code_bits)?;
    bw.write_u32(length_bits)?;
    // Minimums
    bw.write_u8(bounds.min_value)?;
    bw.write_u32(bounds.min_code)?;
    bw.write_u32(bounds.min_length)?;

    for (b, cl) in table.used() {
        bw.write_bits((b - bounds.min_value) as u32, value_bits)?;
        bw.write_bits(cl.code - bounds.min_code, code_bits)?;
        bw.write_bits(cl.length - bounds.min_length, length_bits)?;
    }
    Ok(())
}

/// Read a table written by `write_code_table`, rejecting anything that could not have been produced by it.
pub fn read_code_table<R: Read>(br: &mut BitReader<R>) -> Result<CodeTable, CodecError> {
    let count = br.read_u32()?;
    let value_bits = br.read_u32()?;
    let code_bits = br.read_u32()?;
    let length_bits = br.read_u32()?;

    let min_value = br.read_u8()?;
    let min_code = br.read_u32()?;
    let min_length = br.read_u32()?;

    if count as usize > BYTE_VALUES {
        return Err(CodecError::corrupt(format!(
            "code table declares {} entries",
            count
        )));
    }
    if value_bits > 8 || code_bits > MAX_FIELD_BITS || length_bits > MAX_FIELD_BITS {
        return Err(CodecError::corrupt(format!(
            "code table field widths {}/{}/{} out of range",
            value_bits, code_bits, length_bits
        )));
    }

    let mut table = CodeTable::new();
    let mut last_value: Option<u8> = None;
    for _ in 0..count {
        let value = br.read_bits(value_bits)? + min_value as u32;
        let code = br.read_bits(code_bits)? as u64 + min_code as u64;
        let length = br.read_bits(length_bits)? as u64 + min_length as u64;

        if value > u8::MAX as u32 {
            return Err(CodecError::corrupt(format!(
                "code table byte value {} out of range",
                value
            )));
        }
        let value = value as u8;
        if length == 0 || length > MAX_FIELD_BITS as u64 {
            return Err(CodecError::corrupt(format!(
                "code length {} for byte {} out of range",
                length, value
            )));
        }
        if code >> length != 0 {
            return Err(CodecError::corrupt(format!(
                "code {:#b} for byte {} is wider than {} bits",
                code, value, length
            )));
        }
        if last_value.map_or(false, |last| value <= last) {
            return Err(CodecError::corrupt("code table entries out of order"));
        }
        last_value = Some(value);

        table.set(value, CodeLength::new(code as u32, length as u32));
    }
    Ok(table)
}
