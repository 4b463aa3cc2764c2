//! Archive facade and lazy entry iteration.

use std::iter::FusedIterator;

use crate::io::ReadAt;

use super::central::CentralDirectoryReader;
use super::error::Result;
use super::extract;
use super::local::content_offset;
use super::locator::find_eocd;
use super::structures::{CentralDirectoryEntry, CompressionMethod, EndOfCentralDirectory};

/// A ZIP archive opened over a borrowed byte source.
///
/// Opening only locates the End of Central Directory record. Entries are
/// parsed one at a time while iterating and their content is read only when
/// asked for.
///
/// ## Example
///
/// ```
/// use lazyunzip::Archive;
///
/// # fn main() -> Result<(), lazyunzip::ZipError> {
/// # let bytes: Vec<u8> = vec![0x50, 0x4b, 0x05, 0x06, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
/// let archive = Archive::open(&bytes)?;
/// for entry in archive.entries() {
///     let entry = entry?;
///     if !entry.is_dir() {
///         let data = entry.read_content()?;
///         println!("{}: {} bytes", entry.file_name(), data.len());
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Archive<'a, R: ReadAt + ?Sized> {
    source: &'a R,
    eocd: EndOfCentralDirectory,
}

impl<'a, R: ReadAt + ?Sized> Archive<'a, R> {
    /// Locate the End of Central Directory record of `source`.
    pub fn open(source: &'a R) -> Result<Self> {
        let eocd = find_eocd(source)?;
        Ok(Self { source, eocd })
    }

    /// Number of entries declared by the End of Central Directory record.
    ///
    /// This is not checked against the records actually present in the
    /// central directory.
    pub fn entry_count(&self) -> usize {
        self.eocd.entry_count as usize
    }

    pub fn eocd(&self) -> &EndOfCentralDirectory {
        &self.eocd
    }

    /// Archive comment bytes.
    pub fn comment(&self) -> &[u8] {
        &self.eocd.comment
    }

    pub fn source(&self) -> &'a R {
        self.source
    }

    /// A fresh iterator positioned at the first central directory record.
    pub fn entries(&self) -> Entries<'a, R> {
        Entries {
            reader: CentralDirectoryReader::from_eocd(self.source, &self.eocd),
            current: None,
            failed: false,
        }
    }
}

/// Forward-only iterator over the central directory of an [`Archive`].
///
/// The record at the current position is parsed on first access, by either
/// [`peek`](Self::peek) or [`next`](Iterator::next), and parsed only once.
/// After an error the iterator is exhausted.
pub struct Entries<'a, R: ReadAt + ?Sized> {
    reader: CentralDirectoryReader<'a, R>,
    current: Option<CentralDirectoryEntry>,
    failed: bool,
}

impl<'a, R: ReadAt + ?Sized> Entries<'a, R> {
    /// True once every record in the central directory has been yielded.
    pub fn is_end(&self) -> bool {
        self.failed || (self.current.is_none() && self.reader.is_end())
    }

    /// Offset of the record at the current position.
    pub fn position(&self) -> u64 {
        match &self.current {
            Some(entry) => self.reader.position() - entry.record_len(),
            None => self.reader.position(),
        }
    }

    /// An exhausted iterator over the same central directory, for comparison.
    pub fn end_marker(&self) -> Self {
        let end = self.reader.end();
        Entries {
            reader: CentralDirectoryReader::new(self.reader.source(), end, end),
            current: None,
            failed: false,
        }
    }

    /// The record at the current position, parsing it if that has not
    /// happened yet.
    pub fn peek(&mut self) -> Option<Result<&CentralDirectoryEntry>> {
        if self.failed {
            return None;
        }
        if self.current.is_none() {
            if self.reader.is_end() {
                return None;
            }
            match self.reader.read_one() {
                Ok(entry) => self.current = Some(entry),
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
        self.current.as_ref().map(Ok)
    }
}

impl<'a, R: ReadAt + ?Sized> Iterator for Entries<'a, R> {
    type Item = Result<Entry<'a, R>>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(e) = self.peek()? {
            return Some(Err(e));
        }
        let record = self.current.take()?;
        Some(Ok(Entry {
            source: self.reader.source(),
            record,
        }))
    }
}

impl<R: ReadAt + ?Sized> FusedIterator for Entries<'_, R> {}

impl<R: ReadAt + ?Sized> PartialEq for Entries<'_, R> {
    /// Two iterators are equal when they sit at the same position of the
    /// same central directory range.
    fn eq(&self, other: &Self) -> bool {
        let self_pos = if self.is_end() {
            self.reader.end()
        } else {
            self.position()
        };
        let other_pos = if other.is_end() {
            other.reader.end()
        } else {
            other.position()
        };
        self.reader.end() == other.reader.end() && self_pos == other_pos
    }
}

/// One archive member: its central directory record plus the source it
/// came from.
///
/// Content is never cached; every read goes back to the source.
#[derive(Debug)]
pub struct Entry<'a, R: ReadAt + ?Sized> {
    source: &'a R,
    record: CentralDirectoryEntry,
}

impl<R: ReadAt + ?Sized> Clone for Entry<'_, R> {
    fn clone(&self) -> Self {
        Self {
            source: self.source,
            record: self.record.clone(),
        }
    }
}

impl<'a, R: ReadAt + ?Sized> Entry<'a, R> {
    pub fn record(&self) -> &CentralDirectoryEntry {
        &self.record
    }

    pub fn into_record(self) -> CentralDirectoryEntry {
        self.record
    }

    pub fn file_name(&self) -> &str {
        &self.record.file_name
    }

    pub fn is_dir(&self) -> bool {
        self.record.is_dir()
    }

    pub fn compression(&self) -> CompressionMethod {
        self.record.compression()
    }

    pub fn compressed_size(&self) -> u64 {
        self.record.compressed_size as u64
    }

    pub fn uncompressed_size(&self) -> u64 {
        self.record.uncompressed_size as u64
    }

    /// Where the content starts, as derived from the local file header.
    pub fn content_offset(&self) -> Result<u64> {
        content_offset(self.source, &self.record)
    }

    /// The stored bytes, still compressed if the entry is compressed.
    pub fn read_raw_content(&self) -> Result<Vec<u8>> {
        extract::read_raw_content(self.source, &self.record)
    }

    /// Inflate bytes obtained from [`read_raw_content`](Self::read_raw_content).
    pub fn decompress(&self, raw: &[u8]) -> Result<Vec<u8>> {
        extract::decompress(&self.record, raw)
    }

    /// The entry's uncompressed content.
    pub fn read_content(&self) -> Result<Vec<u8>> {
        extract::read_content(self.source, &self.record)
    }

    /// Like [`read_content`](Self::read_content), then checks the CRC-32.
    pub fn read_content_checked(&self) -> Result<Vec<u8>> {
        let data = self.read_content()?;
        extract::verify_crc(&self.record, &data)?;
        Ok(data)
    }
}
