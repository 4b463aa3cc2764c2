//! Sequential reader over the central directory.

use crate::io::{ReadAt, read_exact_at};

use super::error::{Record, Result};
use super::fields::{u16_at, u32_at};
use super::structures::{
    CDFH_SIGNATURE, CDFH_SIZE, CentralDirectoryEntry, EndOfCentralDirectory, verify_signature,
};

/// Forward cursor over the central directory byte range `[cursor, end)`.
///
/// Each [`read_one`](Self::read_one) parses exactly one record and moves past
/// it. Nothing is buffered between calls.
#[derive(Debug)]
pub struct CentralDirectoryReader<'a, R: ReadAt + ?Sized> {
    source: &'a R,
    cursor: u64,
    end: u64,
}

impl<'a, R: ReadAt + ?Sized> CentralDirectoryReader<'a, R> {
    pub fn new(source: &'a R, start: u64, end: u64) -> Self {
        Self {
            source,
            cursor: start,
            end,
        }
    }

    /// Reader spanning the central directory described by `eocd`.
    pub fn from_eocd(source: &'a R, eocd: &EndOfCentralDirectory) -> Self {
        Self::new(source, eocd.cd_offset as u64, eocd.cd_end())
    }

    pub fn is_end(&self) -> bool {
        self.cursor >= self.end
    }

    /// Offset of the next record to be parsed.
    pub fn position(&self) -> u64 {
        self.cursor
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn source(&self) -> &'a R {
        self.source
    }

    /// Parse the record at the cursor and advance past it.
    ///
    /// On error the cursor is left where it was.
    pub fn read_one(&mut self) -> Result<CentralDirectoryEntry> {
        let offset = self.cursor;
        let mut header = [0u8; CDFH_SIZE];
        read_exact_at(self.source, offset, &mut header)?;
        verify_signature(&header, CDFH_SIGNATURE, Record::CentralDirectoryHeader, offset)?;

        let file_name_length = u16_at(&header, 28);
        let extra_field_length = u16_at(&header, 30);
        let comment_length = u16_at(&header, 32);

        let mut pos = offset + CDFH_SIZE as u64;
        let file_name = self.read_field(&mut pos, file_name_length)?;
        let extra_field = self.read_field(&mut pos, extra_field_length)?;
        let comment = self.read_field(&mut pos, comment_length)?;

        let entry = CentralDirectoryEntry {
            flags: u16_at(&header, 8),
            compression_method: u16_at(&header, 10),
            last_mod_time: u16_at(&header, 12),
            last_mod_date: u16_at(&header, 14),
            crc32: u32_at(&header, 16),
            compressed_size: u32_at(&header, 20),
            uncompressed_size: u32_at(&header, 24),
            file_name_length,
            extra_field_length,
            comment_length,
            internal_attrs: u16_at(&header, 36),
            external_attrs: u32_at(&header, 38),
            local_header_offset: u32_at(&header, 42),
            // Non-UTF-8 names are kept readable rather than rejected
            file_name: String::from_utf8_lossy(&file_name).into_owned(),
            extra_field,
            comment: String::from_utf8_lossy(&comment).into_owned(),
        };

        self.cursor = pos;
        log::trace!(
            "central directory entry at {}: {:?} method={} {}/{} bytes",
            offset,
            entry.file_name,
            entry.compression_method,
            entry.compressed_size,
            entry.uncompressed_size
        );

        Ok(entry)
    }

    fn read_field(&self, pos: &mut u64, len: u16) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len as usize];
        read_exact_at(self.source, *pos, &mut buf)?;
        *pos += len as u64;
        Ok(buf)
    }
}
