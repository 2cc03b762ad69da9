use std::io::{Read, Write};

use crate::bitstream::{bit_width, bitreader::BitReader, bitwriter::BitWriter};
use crate::error::CodecError;

/// Value and run length bounds of an input, from which the packed field widths are derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RleTable {
    min_value: u8,
    max_value: u8,
    min_repeats: u8,
    max_repeats: u8,
}

impl RleTable {
    /// Build a table, rejecting bounds that are out of order.
    pub fn new(
        min_value: u8,
        max_value: u8,
        min_repeats: u8,
        max_repeats: u8,
    ) -> Result<Self, CodecError> {
        if min_value > max_value || min_repeats > max_repeats {
            return Err(CodecError::corrupt(format!(
                "rle table bounds out of order: values {}..{}, repeats {}..{}",
                min_value, max_value, min_repeats, max_repeats
            )));
        }
        Ok(Self::from_bounds(
            min_value,
            max_value,
            min_repeats,
            max_repeats,
        ))
    }

    /// Build a table from bounds already known to be ordered.
    pub(crate) fn from_bounds(
        min_value: u8,
        max_value: u8,
        min_repeats: u8,
        max_repeats: u8,
    ) -> Self {
        debug_assert!(min_value <= max_value && min_repeats <= max_repeats);
        RleTable {
            min_value,
            max_value,
            min_repeats,
            max_repeats,
        }
    }

    pub fn min_value(&self) -> u8 {
        self.min_value
    }

    pub fn max_value(&self) -> u8 {
        self.max_value
    }

    pub fn min_repeats(&self) -> u8 {
        self.min_repeats
    }

    pub fn max_repeats(&self) -> u8 {
        self.max_repeats
    }

    /// Bits used for each packed value.
    pub fn value_bit_width(&self) -> u32 {
        bit_width((self.max_value - self.min_value) as u32)
    }

    /// Bits used for each packed run length.
    pub fn repeat_bit_width(&self) -> u32 {
        bit_width((self.max_repeats - self.min_repeats) as u32)
    }

    /// Bits used by one (value, repeats) pair.
    pub fn pair_bit_width(&self) -> u32 {
        self.value_bit_width() + self.repeat_bit_width()
    }
}

/// Write the four table bounds as 8 bit fields.
pub fn write_rle_table<W: Write>(bw: &mut BitWriter<W>, table: &RleTable) -> Result<(), CodecError> {
    bw.write_u8(table.min_value)?;
    bw.write_u8(table.max_value)?;
    bw.write_u8(table.min_repeats)?;
    bw.write_u8(table.max_repeats)?;
    Ok(())
}

/// Read the four table bounds, checking their order.
pub fn read_rle_table<R: Read>(br: &mut BitReader<R>) -> Result<RleTable, CodecError> {
    let min_value = br.read_u8()?;
    let max_value = br.read_u8()?;
    let min_repeats = br.read_u8()?;
    let max_repeats = br.read_u8()?;
    RleTable::new(min_value, max_value, min_repeats, max_repeats)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn widths_test() {
        let table = RleTable::new(10, 10, 1, 1).unwrap();
        assert_eq!(table.value_bit_width(), 1);
        assert_eq!(table.repeat_bit_width(), 1);

        let table = RleTable::new(0, 255, 1, 255).unwrap();
        assert_eq!(table.value_bit_width(), 8);
        assert_eq!(table.repeat_bit_width(), 8);
        assert_eq!(table.pair_bit_width(), 16);

        let table = RleTable::new(b'a', b'e', 3, 10).unwrap();
        assert_eq!(table.value_bit_width(), 3);
        assert_eq!(table.repeat_bit_width(), 3);
    }

    #[test]
    fn out_of_order_test() {
        assert!(RleTable::new(5, 4, 1, 1).unwrap_err().is_corrupt());
        assert!(RleTable::new(4, 5, 2, 1).unwrap_err().is_corrupt());
    }

    #[test]
    fn header_test() {
        let table = RleTable::new(1, 2, 3, 4).unwrap();
        let mut bw = BitWriter::new(Vec::new());
        write_rle_table(&mut bw, &table).unwrap();
        let bytes = bw.into_inner();
        assert_eq!(bytes, vec![1, 2, 3, 4]);
        assert_eq!(read_rle_table(&mut BitReader::new(bytes.as_slice())).unwrap(), table);

        let bad = [9_u8, 2, 3, 4];
        assert!(read_rle_table(&mut BitReader::new(bad.as_slice())).is_err());
    }
}
