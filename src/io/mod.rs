mod http;
mod local;

pub use http::HttpRangeReader;
pub use local::LocalFileReader;

use std::sync::Arc;

use crate::zip::{Result, ZipError};

/// Trait for random access reading from a data source
///
/// Reads are positioned purely by `offset`; implementations keep no cursor of
/// their own. A read that starts at or past the end may return `Ok(0)`, the
/// archive layer turns that into a range or truncation error.
pub trait ReadAt {
    /// Read data at the specified offset into the buffer
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;
}

impl ReadAt for [u8] {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        let skip = self.len().min(usize::try_from(offset).unwrap_or(usize::MAX));
        let data = &self[skip..];
        let len = data.len().min(buf.len());
        buf[..len].copy_from_slice(&data[..len]);
        Ok(len)
    }

    fn size(&self) -> u64 {
        self.len() as u64
    }
}

impl ReadAt for Vec<u8> {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        self.as_slice().read_at(offset, buf)
    }

    fn size(&self) -> u64 {
        self.len() as u64
    }
}

impl<T: ReadAt + ?Sized> ReadAt for &T {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        (**self).read_at(offset, buf)
    }

    fn size(&self) -> u64 {
        (**self).size()
    }
}

impl<T: ReadAt + ?Sized> ReadAt for Arc<T> {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        (**self).read_at(offset, buf)
    }

    fn size(&self) -> u64 {
        (**self).size()
    }
}

/// Fill as much of `buf` as the source can provide starting at `offset`.
///
/// Stops early only when the source reports end of data. Fails with
/// [`ZipError::OutOfRangeRead`] when `offset` lies beyond the source.
pub fn read_at_most<R: ReadAt + ?Sized>(source: &R, offset: u64, buf: &mut [u8]) -> Result<usize> {
    let size = source.size();
    if offset > size {
        return Err(ZipError::OutOfRangeRead { offset, size });
    }

    let mut pos = 0;
    while pos < buf.len() {
        match source.read_at(offset + pos as u64, &mut buf[pos..])? {
            0 => break,
            n => pos += n,
        }
    }
    Ok(pos)
}

/// Read exactly `buf.len()` bytes at `offset` or fail.
///
/// A short read is reported as [`ZipError::TruncatedRead`]; the buffer is
/// never handed back partially filled.
pub fn read_exact_at<R: ReadAt + ?Sized>(source: &R, offset: u64, buf: &mut [u8]) -> Result<()> {
    let read = read_at_most(source, offset, buf)?;
    if read < buf.len() {
        return Err(ZipError::TruncatedRead {
            offset,
            expected: buf.len() as u64,
            actual: read as u64,
        });
    }
    Ok(())
}
