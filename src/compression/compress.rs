use std::io::{self, Read, Seek, Write};

use log::{debug, info};

use crate::bitstream::{bit_width, bitwriter::BitWriter};
use crate::code_table::table_io::write_code_table;
use crate::error::CodecError;
use crate::huffman_coding::huffman::{HuffmanCompressor, HuffmanScanner};
use crate::lzw_coding::lzw_compressor::LzwCompressor;
use crate::rle_coding::rle_compressor::RleCompressor;
use crate::rle_coding::rle_scanner::RleScanner;
use crate::rle_coding::rle_table::write_rle_table;
use crate::tools::byte_io::{for_each_byte, rewind};

/// The bit count header is a 32 bit field.
fn stream_bits(total_bits: u64) -> Result<u32, CodecError> {
    u32::try_from(total_bits).map_err(|_| CodecError::InputTooLarge(total_bits))
}

/// Error for a second pass that does not match the first one.
fn source_changed(what: &str) -> CodecError {
    CodecError::Io(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("source changed between passes: {}", what),
    ))
}

/// Run length encode `source` into `dest`.
pub fn compress_rle<R, W>(source: &mut R, dest: &mut W) -> Result<(), CodecError>
where
    R: Read + Seek,
    W: Write,
{
    // First pass: gather the bounds of every run
    rewind(source)?;
    let mut scanner = RleScanner::new();
    scanner.begin_scan();
    let bytes_in = for_each_byte(source, |b| {
        scanner.scan(b);
        Ok(())
    })?;
    let (table, total_bits) = scanner.end_scan();
    let declared = stream_bits(total_bits)?;
    debug!(
        "rle table: values {}..={} ({} bits), repeats {}..={} ({} bits)",
        table.min_value(),
        table.max_value(),
        table.value_bit_width(),
        table.min_repeats(),
        table.max_repeats(),
        table.repeat_bit_width()
    );

    let mut bw = BitWriter::new(dest);
    write_rle_table(&mut bw, &table)?;
    bw.write_u32(declared)?;

    // Second pass: emit the runs
    rewind(source)?;
    let mut written = 0_u64;
    let mut runs = 0_u64;
    {
        let mut compressor = RleCompressor::new(&table);
        compressor.begin_compress(|value, repeats| {
            bw.write_bits(value.code, value.length)?;
            bw.write_bits(repeats.code, repeats.length)?;
            written += (value.length + repeats.length) as u64;
            runs += 1;
            Ok(())
        });
        for_each_byte(source, |b| compressor.compress(b))?;
        compressor.end_compress()?;
    }
    if written != total_bits {
        return Err(source_changed("run bit count differs"));
    }
    bw.complete_byte()?;
    bw.flush()?;

    info!(
        "rle: {} bytes in, {} runs, {} bytes out",
        bytes_in,
        runs,
        8 + (total_bits + 7) / 8
    );
    Ok(())
}

/// Huffman encode `source` into `dest`.
pub fn compress_huffman<R, W>(source: &mut R, dest: &mut W) -> Result<(), CodecError>
where
    R: Read + Seek,
    W: Write,
{
    rewind(source)?;
    let mut scanner = HuffmanScanner::new();
    scanner.begin_scan();
    let bytes_in = for_each_byte(source, |b| {
        scanner.scan(b);
        Ok(())
    })?;
    let (table, total_bits) = scanner.end_scan()?;
    let declared = stream_bits(total_bits)?;
    debug!(
        "huffman table: {} symbols, {} code bits",
        table.len(),
        total_bits
    );

    let mut bw = BitWriter::new(dest);
    write_code_table(&mut bw, &table)?;
    bw.write_u32(declared)?;

    rewind(source)?;
    let compressor = HuffmanCompressor::new(&table);
    let mut written = 0_u64;
    for_each_byte(source, |b| {
        let cl = compressor.compress(b)?;
        bw.write_bits(cl.code, cl.length)?;
        written += cl.length as u64;
        Ok(())
    })?;
    if written != total_bits {
        return Err(source_changed("code bit count differs"));
    }
    bw.complete_byte()?;
    bw.flush()?;

    info!(
        "huffman: {} bytes in, {} distinct, {} code bits",
        bytes_in,
        scanner.distinct(),
        total_bits
    );
    Ok(())
}

/// LZW encode `source` into bare 32 bit little endian codes. Single pass.
pub fn compress_lzw<R, W>(source: &mut R, dest: &mut W) -> Result<(), CodecError>
where
    R: Read,
    W: Write,
{
    let mut codes = 0_u64;
    let bytes_in;
    let dictionary;
    {
        let mut compressor = LzwCompressor::new();
        compressor.begin(|code| {
            dest.write_all(&code.to_le_bytes())?;
            codes += 1;
            Ok(())
        });
        bytes_in = for_each_byte(source, |b| compressor.put(b))?;
        compressor.end()?;
        dictionary = compressor.dictionary_len();
    }
    dest.flush()?;

    info!(
        "lzw: {} bytes in, {} codes out, {} dictionary entries",
        bytes_in, codes, dictionary
    );
    Ok(())
}

/// LZW encode `source` with every code packed to the width of the largest code minus the smallest.
pub fn compress_bit_lzw<R, W>(source: &mut R, dest: &mut W) -> Result<(), CodecError>
where
    R: Read + Seek,
    W: Write,
{
    // First pass: the range of codes decides the field width
    rewind(source)?;
    let mut count = 0_u64;
    let mut min = u32::MAX;
    let mut max = 0_u32;
    let bytes_in;
    {
        let mut compressor = LzwCompressor::new();
        compressor.begin(|code| {
            count += 1;
            min = min.min(code);
            max = max.max(code);
            Ok(())
        });
        bytes_in = for_each_byte(source, |b| compressor.put(b))?;
        compressor.end()?;
    }
    if count == 0 {
        min = 0;
    }
    let declared = u32::try_from(count).map_err(|_| CodecError::InputTooLarge(count))?;
    let width = bit_width(max - min);
    debug!(
        "bit lzw header: {} codes, min {}, max {}, width {}",
        count, min, max, width
    );

    let mut bw = BitWriter::new(dest);
    bw.write_u32(declared)?;
    bw.write_u32(min)?;
    bw.write_u8(width as u8)?;

    // Second pass: emit the codes
    rewind(source)?;
    let mut written = 0_u64;
    {
        let mut compressor = LzwCompressor::new();
        compressor.begin(|code| {
            if code < min || code > max {
                return Err(source_changed("code outside the scanned range"));
            }
            bw.write_bits(code - min, width)?;
            written += 1;
            Ok(())
        });
        for_each_byte(source, |b| compressor.put(b))?;
        compressor.end()?;
    }
    if written != count {
        return Err(source_changed("code count differs"));
    }
    bw.complete_byte()?;
    bw.flush()?;

    info!(
        "bit lzw: {} bytes in, {} codes of {} bits",
        bytes_in, count, width
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{compress_bit_lzw, compress_huffman, compress_lzw, compress_rle};
    use std::io::Cursor;

    #[test]
    fn rle_layout_test() {
        // "aaab": runs (a,3) (b,1). Values 97..98 take 1 bit, repeats 1..3 take 2 bits
        let mut out = Vec::new();
        compress_rle(&mut Cursor::new(b"aaab".to_vec()), &mut out).unwrap();
        assert_eq!(&out[..4], &[b'a', b'b', 1, 3]);
        assert_eq!(&out[4..8], &6_u32.to_le_bytes());
        // (0,2) then (1,0), packed from the low bit up
        assert_eq!(&out[8..], &[0b0000_1100]);
    }

    #[test]
    fn rle_empty_test() {
        let mut out = Vec::new();
        compress_rle(&mut Cursor::new(Vec::new()), &mut out).unwrap();
        assert_eq!(out, vec![0; 8]);
    }

    #[test]
    fn huffman_single_symbol_test() {
        let mut out = Vec::new();
        compress_huffman(&mut Cursor::new(vec![0x41; 10_000]), &mut out).unwrap();
        // 203 table bits, 32 count bits and 10 000 one bit codes
        assert_eq!(out.len(), (203 + 32 + 10_000 + 7) / 8);
    }

    #[test]
    fn lzw_plain_test() {
        let mut out = Vec::new();
        compress_lzw(&mut "ABABABA".as_bytes(), &mut out).unwrap();
        let codes: Vec<u32> = out
            .chunks(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(codes, vec![65, 66, 256, 258]);
    }

    #[test]
    fn bit_lzw_header_test() {
        let mut out = Vec::new();
        compress_bit_lzw(&mut Cursor::new(b"ABABABA".to_vec()), &mut out).unwrap();
        assert_eq!(&out[0..4], &4_u32.to_le_bytes());
        assert_eq!(&out[4..8], &65_u32.to_le_bytes());
        // 258 - 65 = 193 needs 8 bits
        assert_eq!(out[8], 8);
        assert_eq!(&out[9..], &[0, 1, 191, 193]);
    }

    #[test]
    fn bit_lzw_empty_test() {
        let mut out = Vec::new();
        compress_bit_lzw(&mut Cursor::new(Vec::new()), &mut out).unwrap();
        assert_eq!(out, vec![0, 0, 0, 0, 0, 0, 0, 0, 1]);
    }
}
