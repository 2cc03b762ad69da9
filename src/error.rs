//! Error types shared by every codec in the crate.
//!
//! `CodecError` is what the engines and the bit stream return. `Failure` is the file-level outcome
//! reported to a user, which also distinguishes a bad input path from a bad output path.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),

    #[error("unexpected end of compressed stream")]
    UnexpectedEnd,

    #[error("corrupt stream: {0}")]
    CorruptStream(String),

    #[error("huffman code of {0} bits does not fit the table format")]
    CodeTooLong(u32),

    #[error("input too large for the stream format: {0} bits")]
    InputTooLarge(u64),

    #[error("LZW dictionary exceeded the 32 bit code space")]
    CodeSpaceExhausted,

    #[error("unknown compression method: {0}")]
    UnknownCodec(String),
}

impl CodecError {
    /// Shorthand for building a corrupt stream error.
    pub fn corrupt(reason: impl Into<String>) -> Self {
        CodecError::CorruptStream(reason.into())
    }

    /// True when the error means the compressed data itself is bad.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, CodecError::UnexpectedEnd | CodecError::CorruptStream(_))
    }
}

/// Outcome categories of a file-level compress or decompress call.
#[derive(Error, Debug)]
pub enum Failure {
    #[error("Invalid input file {}: {1}", .0.display())]
    InvalidInputFile(PathBuf, #[source] io::Error),

    #[error("Invalid output file {}: {1}", .0.display())]
    InvalidOutputFile(PathBuf, #[source] io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] CodecError),
}

impl Failure {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Failure::InvalidInputFile(..) => 2,
            Failure::InvalidOutputFile(..) => 3,
            Failure::Internal(e) if e.is_corrupt() => 4,
            Failure::Internal(_) => 1,
        }
    }
}
