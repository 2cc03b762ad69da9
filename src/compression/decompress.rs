//! Decoders for the four stream layouts. Each makes a single pass over its source and rejects anything the matching
//! compressor could not have written.
//!
//! The bit packed decoders pull their input through a BitReader one byte at a time, so callers reading from a file
//! should hand in a buffered reader.

use std::io::{ErrorKind, Read, Write};

use log::{debug, info, trace};

use crate::bitstream::{bitreader::BitReader, MAX_FIELD_BITS};
use crate::code_table::table_io::read_code_table;
use crate::error::CodecError;
use crate::huffman_coding::huffman_reader::{HuffmanReader, ReadResult};
use crate::lzw_coding::lzw_decompressor::LzwDecompressor;
use crate::rle_coding::rle_table::read_rle_table;
use crate::rle_coding::MAX_RUN;

/// Decoded bytes are gathered here before being handed to the sink.
const OUT_BUFFER: usize = 64 * 1024;

/// Expand an RLE stream.
pub fn decompress_rle<R, W>(source: &mut R, dest: &mut W) -> Result<(), CodecError>
where
    R: Read,
    W: Write,
{
    let mut br = BitReader::new(source);
    let table = read_rle_table(&mut br)?;
    let total_bits = br.read_u32()? as u64;

    let value_bits = table.value_bit_width();
    let repeat_bits = table.repeat_bit_width();
    let pair_bits = table.pair_bit_width() as u64;
    debug!(
        "rle header: {} value bits, {} repeat bits, {} packed bits",
        value_bits, repeat_bits, total_bits
    );
    if total_bits % pair_bits != 0 {
        return Err(CodecError::corrupt(format!(
            "{} packed bits is not a whole number of {} bit runs",
            total_bits, pair_bits
        )));
    }

    let mut run = [0_u8; MAX_RUN as usize];
    let mut bytes_out = 0_u64;
    let mut consumed = 0_u64;
    while consumed < total_bits {
        let value = br.read_bits(value_bits)? + table.min_value() as u32;
        let repeats = br.read_bits(repeat_bits)? + table.min_repeats() as u32;
        if value > u8::MAX as u32 {
            return Err(CodecError::corrupt(format!("run value {} out of range", value)));
        }
        if repeats == 0 || repeats > MAX_RUN as u32 {
            return Err(CodecError::corrupt(format!("run length {} out of range", repeats)));
        }
        trace!("run {} x {}", value, repeats);

        let bytes = &mut run[..repeats as usize];
        bytes.fill(value as u8);
        dest.write_all(bytes)?;
        bytes_out += repeats as u64;
        consumed += pair_bits;
    }
    dest.flush()?;

    info!("rle: {} bytes out", bytes_out);
    Ok(())
}

/// Decode a Huffman stream. The declared bit count must be consumed exactly, ending on a code boundary.
pub fn decompress_huffman<R, W>(source: &mut R, dest: &mut W) -> Result<(), CodecError>
where
    R: Read,
    W: Write,
{
    let mut br = BitReader::new(source);
    let table = read_code_table(&mut br)?;
    let total_bits = br.read_u32()?;
    debug!(
        "huffman header: {} symbols, {} code bits",
        table.len(),
        total_bits
    );
    let mut reader = HuffmanReader::new(&table)?;

    let mut out = Vec::with_capacity(OUT_BUFFER);
    let mut bytes_out = 0_u64;
    for _ in 0..total_bits {
        match reader.read_bit(br.read_bit()?) {
            ReadResult::Success(b) => {
                out.push(b);
                if out.len() == OUT_BUFFER {
                    dest.write_all(&out)?;
                    bytes_out += out.len() as u64;
                    out.clear();
                }
            }
            ReadResult::ReadMoreBits => {}
            ReadResult::NoData => {
                return Err(CodecError::corrupt("bit sequence matches no code"));
            }
        }
    }
    if !reader.is_at_root() {
        return Err(CodecError::corrupt("stream ends inside a code"));
    }
    dest.write_all(&out)?;
    bytes_out += out.len() as u64;
    dest.flush()?;

    info!("huffman: {} bytes out", bytes_out);
    Ok(())
}

/// Fill `buf` from `source`. Returns false on a clean end of input before the first byte.
fn read_code_bytes<R: Read + ?Sized>(source: &mut R, buf: &mut [u8; 4]) -> Result<bool, CodecError> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => {
                return Err(CodecError::corrupt(format!(
                    "trailing partial code of {} bytes",
                    filled
                )))
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(true)
}

/// Decode bare 32 bit little endian LZW codes.
pub fn decompress_lzw<R, W>(source: &mut R, dest: &mut W) -> Result<(), CodecError>
where
    R: Read,
    W: Write,
{
    let mut codes = 0_u64;
    let mut bytes_out = 0_u64;
    {
        let mut decompressor = LzwDecompressor::new();
        decompressor.begin(|sequence| {
            dest.write_all(sequence)?;
            bytes_out += sequence.len() as u64;
            Ok(())
        });
        let mut buf = [0_u8; 4];
        while read_code_bytes(source, &mut buf)? {
            let code = u32::from_le_bytes(buf);
            if !decompressor.put(code)? {
                return Err(CodecError::corrupt(format!(
                    "LZW code {} at position {} is not in the dictionary",
                    code, codes
                )));
            }
            codes += 1;
        }
        decompressor.end();
    }
    dest.flush()?;

    info!("lzw: {} codes in, {} bytes out", codes, bytes_out);
    Ok(())
}

/// Decode a bit packed LZW stream.
pub fn decompress_bit_lzw<R, W>(source: &mut R, dest: &mut W) -> Result<(), CodecError>
where
    R: Read,
    W: Write,
{
    let mut br = BitReader::new(source);
    let count = br.read_u32()?;
    let min = br.read_u32()?;
    let width = br.read_u8()? as u32;
    debug!("bit lzw header: {} codes, min {}, width {}", count, min, width);
    if width == 0 || width > MAX_FIELD_BITS {
        return Err(CodecError::corrupt(format!("code width {} out of range", width)));
    }

    let mut bytes_out = 0_u64;
    {
        let mut decompressor = LzwDecompressor::new();
        decompressor.begin(|sequence| {
            dest.write_all(sequence)?;
            bytes_out += sequence.len() as u64;
            Ok(())
        });
        for position in 0..count {
            let code = br.read_bits(width)? as u64 + min as u64;
            let code = u32::try_from(code).map_err(|_| {
                CodecError::corrupt(format!("LZW code {} does not fit 32 bits", code))
            })?;
            if !decompressor.put(code)? {
                return Err(CodecError::corrupt(format!(
                    "LZW code {} at position {} is not in the dictionary",
                    code, position
                )));
            }
        }
        decompressor.end();
    }
    dest.flush()?;

    info!("bit lzw: {} codes in, {} bytes out", count, bytes_out);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{decompress_bit_lzw, decompress_huffman, decompress_lzw, decompress_rle};
    use crate::bitstream::bitwriter::BitWriter;

    #[test]
    fn rle_test() {
        // Runs (a,3) (b,1) as written by the compressor
        let stream = [b'a', b'b', 1, 3, 6, 0, 0, 0, 0b0000_1100];
        let mut out = Vec::new();
        decompress_rle(&mut stream.as_slice(), &mut out).unwrap();
        assert_eq!(out, b"aaab");
    }

    #[test]
    fn rle_empty_test() {
        let mut out = Vec::new();
        decompress_rle(&mut [0_u8; 8].as_slice(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn rle_bad_header_test() {
        // min_value above max_value
        let stream = [9_u8, 3, 1, 1, 0, 0, 0, 0];
        let err = decompress_rle(&mut stream.as_slice(), &mut Vec::new()).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn rle_bit_count_test() {
        // Declares 5 bits for 3 bit runs
        let stream = [b'a', b'b', 1, 3, 5, 0, 0, 0, 0];
        let err = decompress_rle(&mut stream.as_slice(), &mut Vec::new()).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn rle_value_overflow_test() {
        // Values 250..=255 take 3 bits, so a delta of 7 lands on 257
        let mut bw = BitWriter::new(Vec::new());
        for field in [250_u8, 255, 1, 1] {
            bw.write_u8(field).unwrap();
        }
        bw.write_u32(4).unwrap();
        bw.write_bits(7, 3).unwrap();
        bw.write_bits(0, 1).unwrap();
        bw.complete_byte().unwrap();
        let stream = bw.into_inner();
        let err = decompress_rle(&mut stream.as_slice(), &mut Vec::new()).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn huffman_empty_test() {
        // Empty table and zero code bits
        let mut bw = BitWriter::new(Vec::new());
        for field in [0_u32, 1, 1, 1] {
            bw.write_u32(field).unwrap();
        }
        bw.write_u8(0).unwrap();
        bw.write_u32(0).unwrap();
        bw.write_u32(0).unwrap();
        bw.write_u32(0).unwrap();
        bw.complete_byte().unwrap();
        let stream = bw.into_inner();
        let mut out = Vec::new();
        decompress_huffman(&mut stream.as_slice(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn huffman_dead_bits_test() {
        // One symbol with code 0, followed by a 1 bit that matches nothing
        let mut bw = BitWriter::new(Vec::new());
        for field in [1_u32, 1, 1, 1] {
            bw.write_u32(field).unwrap();
        }
        bw.write_u8(b'x').unwrap();
        bw.write_u32(0).unwrap();
        bw.write_u32(1).unwrap();
        bw.write_bits(0, 3).unwrap();
        bw.write_u32(2).unwrap();
        bw.write_bits(0b10, 2).unwrap();
        bw.complete_byte().unwrap();
        let stream = bw.into_inner();
        let err = decompress_huffman(&mut stream.as_slice(), &mut Vec::new()).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn lzw_test() {
        let stream: Vec<u8> = [65_u32, 66, 256, 258]
            .iter()
            .flat_map(|c| c.to_le_bytes())
            .collect();
        let mut out = Vec::new();
        decompress_lzw(&mut stream.as_slice(), &mut out).unwrap();
        assert_eq!(out, b"ABABABA");
    }

    #[test]
    fn lzw_partial_code_test() {
        let stream = [65_u8, 0, 0, 0, 66, 0];
        let err = decompress_lzw(&mut stream.as_slice(), &mut Vec::new()).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn lzw_unknown_code_test() {
        let stream: Vec<u8> = [65_u32, 300].iter().flat_map(|c| c.to_le_bytes()).collect();
        let err = decompress_lzw(&mut stream.as_slice(), &mut Vec::new()).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn bit_lzw_test() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&4_u32.to_le_bytes());
        stream.extend_from_slice(&65_u32.to_le_bytes());
        stream.extend_from_slice(&[8, 0, 1, 191, 193]);
        let mut out = Vec::new();
        decompress_bit_lzw(&mut stream.as_slice(), &mut out).unwrap();
        assert_eq!(out, b"ABABABA");
    }

    #[test]
    fn bit_lzw_bad_width_test() {
        let mut stream = vec![1, 0, 0, 0, 0, 0, 0, 0, 33];
        stream.extend_from_slice(&[0; 5]);
        let err = decompress_bit_lzw(&mut stream.as_slice(), &mut Vec::new()).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn bit_lzw_truncated_test() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&4_u32.to_le_bytes());
        stream.extend_from_slice(&65_u32.to_le_bytes());
        stream.extend_from_slice(&[8, 0, 1]);
        let err = decompress_bit_lzw(&mut stream.as_slice(), &mut Vec::new()).unwrap_err();
        assert!(err.is_corrupt());
    }
}
