use std::fmt::{Display, Formatter};
use std::io::{Read, Seek, Write};
use std::str::FromStr;

use super::compress::{compress_bit_lzw, compress_huffman, compress_lzw, compress_rle};
use super::decompress::{decompress_bit_lzw, decompress_huffman, decompress_lzw, decompress_rle};
use crate::error::CodecError;
use crate::tools::byte_io::rewind;

/// The available compression methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Codec {
    /// Bit packed run length encoding
    Rle,
    Huffman,
    /// LZW with bare 32 bit codes
    Lzw,
    /// LZW with codes packed to the narrowest width
    BitLzw,
}

impl Codec {
    pub const ALL: [Codec; 4] = [Codec::Rle, Codec::Huffman, Codec::Lzw, Codec::BitLzw];

    /// Name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Codec::Rle => "rle",
            Codec::Huffman => "huffman",
            Codec::Lzw => "lzw",
            Codec::BitLzw => "bitlzw",
        }
    }

    /// Compress all of `source`, starting from its first byte.
    pub fn compress<R, W>(&self, source: &mut R, dest: &mut W) -> Result<(), CodecError>
    where
        R: Read + Seek,
        W: Write,
    {
        match self {
            Codec::Rle => compress_rle(source, dest),
            Codec::Huffman => compress_huffman(source, dest),
            Codec::Lzw => {
                rewind(source)?;
                compress_lzw(source, dest)
            }
            Codec::BitLzw => compress_bit_lzw(source, dest),
        }
    }

    /// Decompress the remainder of `source`.
    pub fn decompress<R, W>(&self, source: &mut R, dest: &mut W) -> Result<(), CodecError>
    where
        R: Read,
        W: Write,
    {
        match self {
            Codec::Rle => decompress_rle(source, dest),
            Codec::Huffman => decompress_huffman(source, dest),
            Codec::Lzw => decompress_lzw(source, dest),
            Codec::BitLzw => decompress_bit_lzw(source, dest),
        }
    }
}

impl Display for Codec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Codec {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rle" | "bitrle" => Ok(Codec::Rle),
            "huffman" => Ok(Codec::Huffman),
            "lzw" => Ok(Codec::Lzw),
            "bitlzw" | "bit-lzw" => Ok(Codec::BitLzw),
            _ => Err(CodecError::UnknownCodec(s.to_string())),
        }
    }
}
