//! File level entry points. These are the only functions that report failures by category.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::{error, info};

use super::codec::Codec;
use crate::error::{CodecError, Failure};

fn open_files(source: &Path, dest: &Path) -> Result<(BufReader<File>, BufWriter<File>), Failure> {
    let input = File::open(source).map_err(|e| Failure::InvalidInputFile(source.to_path_buf(), e))?;
    let output =
        File::create(dest).map_err(|e| Failure::InvalidOutputFile(dest.to_path_buf(), e))?;
    Ok((BufReader::new(input), BufWriter::new(output)))
}

/// Compress the file at `source` into a new file at `dest`.
pub fn compress_file(codec: Codec, source: &Path, dest: &Path) -> Result<(), Failure> {
    info!(
        "Compressing {} to {} with {}",
        source.display(),
        dest.display(),
        codec
    );
    let (mut reader, mut writer) = open_files(source, dest)?;
    let result = codec
        .compress(&mut reader, &mut writer)
        .and_then(|_| writer.flush().map_err(CodecError::from));
    if let Err(e) = &result {
        error!("{} compression of {} failed: {}", codec, source.display(), e);
    }
    result.map_err(Failure::from)
}

/// Decompress the file at `source` into a new file at `dest`.
pub fn decompress_file(codec: Codec, source: &Path, dest: &Path) -> Result<(), Failure> {
    info!(
        "Decompressing {} to {} with {}",
        source.display(),
        dest.display(),
        codec
    );
    let (mut reader, mut writer) = open_files(source, dest)?;
    let result = codec
        .decompress(&mut reader, &mut writer)
        .and_then(|_| writer.flush().map_err(CodecError::from));
    if let Err(e) = &result {
        error!("{} decompression of {} failed: {}", codec, source.display(), e);
    }
    result.map_err(Failure::from)
}
