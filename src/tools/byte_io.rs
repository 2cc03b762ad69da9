//! Small helpers for driving the codecs from a byte source.

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use crate::error::CodecError;

/// Size of the chunks pulled from the source.
const CHUNK_SIZE: usize = 64 * 1024;

/// Feed every remaining byte of `source` to `f`, in order. Stops at the first error from either side.
/// Returns the number of bytes read.
pub fn for_each_byte<R, F>(source: &mut R, mut f: F) -> Result<u64, CodecError>
where
    R: Read + ?Sized,
    F: FnMut(u8) -> Result<(), CodecError>,
{
    let mut buffer = vec![0_u8; CHUNK_SIZE];
    let mut total = 0_u64;
    loop {
        let size = match source.read(&mut buffer) {
            Ok(0) => break,
            Ok(size) => size,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        for &b in &buffer[..size] {
            f(b)?;
        }
        total += size as u64;
    }
    Ok(total)
}

/// Move a rewindable source back to its first byte.
pub fn rewind<R: Seek + ?Sized>(source: &mut R) -> Result<(), CodecError> {
    source.seek(SeekFrom::Start(0))?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{for_each_byte, rewind};
    use std::io::Cursor;

    #[test]
    fn for_each_byte_test() {
        let data: Vec<u8> = (0..200_000_u32).map(|i| (i % 251) as u8).collect();
        let mut seen = Vec::with_capacity(data.len());
        let count = for_each_byte(&mut data.as_slice(), |b| {
            seen.push(b);
            Ok(())
        })
        .unwrap();
        assert_eq!(count, data.len() as u64);
        assert_eq!(seen, data);
    }

    #[test]
    fn stop_on_error_test() {
        let data = [1_u8, 2, 3, 4];
        let mut seen = 0;
        let result = for_each_byte(&mut data.as_slice(), |b| {
            seen += 1;
            if b == 2 {
                Err(crate::error::CodecError::corrupt("stop"))
            } else {
                Ok(())
            }
        });
        assert!(result.is_err());
        assert_eq!(seen, 2);
    }

    #[test]
    fn rewind_test() {
        let mut cursor = Cursor::new(vec![5_u8, 6, 7]);
        for_each_byte(&mut cursor, |_| Ok(())).unwrap();
        rewind(&mut cursor).unwrap();
        let mut first = None;
        for_each_byte(&mut cursor, |b| {
            first.get_or_insert(b);
            Ok(())
        })
        .unwrap();
        assert_eq!(first, Some(5));
    }
}
