//! Entry content extraction and decompression.

use flate2::{Crc, Decompress, FlushDecompress, Status};

use crate::io::{ReadAt, read_exact_at};

use super::error::{Result, ZipError};
use super::local::content_offset;
use super::structures::{CentralDirectoryEntry, CompressionMethod};

/// Read the `compressed_size` bytes stored for `entry`, undecoded.
pub fn read_raw_content<R: ReadAt + ?Sized>(
    source: &R,
    entry: &CentralDirectoryEntry,
) -> Result<Vec<u8>> {
    let offset = content_offset(source, entry)?;
    let mut buf = vec![0u8; entry.compressed_size as usize];
    read_exact_at(source, offset, &mut buf)?;
    Ok(buf)
}

/// Read and, when needed, decompress the content of `entry`.
///
/// Stored entries are returned as read. Deflated entries must inflate to
/// exactly `uncompressed_size` bytes.
pub fn read_content<R: ReadAt + ?Sized>(source: &R, entry: &CentralDirectoryEntry) -> Result<Vec<u8>> {
    match entry.compression() {
        CompressionMethod::Stored => read_raw_content(source, entry),
        CompressionMethod::Deflate => {
            let raw = read_raw_content(source, entry)?;
            inflate_raw(&raw, entry.uncompressed_size as usize)
        }
        CompressionMethod::Unknown(method) => Err(ZipError::UnsupportedCompressionMethod(method)),
    }
}

/// Decompress raw bytes previously obtained for `entry`.
///
/// Only the first `compressed_size` bytes of `raw` are used; a shorter
/// buffer is rejected.
pub fn decompress(entry: &CentralDirectoryEntry, raw: &[u8]) -> Result<Vec<u8>> {
    let method = entry.compression();
    if method != CompressionMethod::Deflate {
        return Err(ZipError::UnsupportedCompressionMethod(method.as_u16()));
    }

    let compressed_size = entry.compressed_size as usize;
    let input = raw.get(..compressed_size).ok_or_else(|| ZipError::SizeMismatch {
        expected: compressed_size as u64,
        actual: raw.len() as u64,
    })?;
    inflate_raw(input, entry.uncompressed_size as usize)
}

/// Inflate a headerless DEFLATE stream into exactly `uncompressed_size` bytes.
///
/// The stream has to end, consume all of `input`, and fill the output
/// exactly. Anything else is an error and no output is returned.
pub fn inflate_raw(input: &[u8], uncompressed_size: usize) -> Result<Vec<u8>> {
    let mut out = vec![0u8; uncompressed_size];
    let mut inflater = Decompress::new(false);

    loop {
        let in_before = inflater.total_in() as usize;
        let out_before = inflater.total_out() as usize;
        let status = inflater
            .decompress(
                &input[in_before..],
                &mut out[out_before..],
                FlushDecompress::Finish,
            )
            .map_err(|e| ZipError::InflateFailure(e.to_string()))?;

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                let consumed = inflater.total_in() as usize;
                let produced = inflater.total_out() as usize;
                if consumed != in_before || produced != out_before {
                    continue;
                }
                if produced == uncompressed_size {
                    return Err(ZipError::InflateFailure(format!(
                        "stream continues past the declared size of {} bytes",
                        uncompressed_size
                    )));
                }
                return Err(ZipError::InflateFailure(format!(
                    "stream ended unexpectedly after {} of {} input bytes",
                    consumed,
                    input.len()
                )));
            }
        }
    }

    let consumed = inflater.total_in() as usize;
    if consumed != input.len() {
        return Err(ZipError::InflateFailure(format!(
            "{} trailing bytes after the end of the stream",
            input.len() - consumed
        )));
    }

    let produced = inflater.total_out() as usize;
    if produced != uncompressed_size {
        return Err(ZipError::SizeMismatch {
            expected: uncompressed_size as u64,
            actual: produced as u64,
        });
    }

    Ok(out)
}

/// Compare the CRC-32 of `data` with the value recorded for `entry`.
pub fn verify_crc(entry: &CentralDirectoryEntry, data: &[u8]) -> Result<()> {
    let mut crc = Crc::new();
    crc.update(data);
    let actual = crc.sum();
    if actual != entry.crc32 {
        return Err(ZipError::ChecksumMismatch {
            expected: entry.crc32,
            actual,
        });
    }
    Ok(())
}
