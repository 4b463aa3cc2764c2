//! Local file header resolution.
//!
//! The name and extra field lengths are taken from the local header itself.
//! They may legitimately differ from the central directory copy (extra
//! fields in particular often do), so the central values are never used to
//! locate content.

use crate::io::{ReadAt, read_exact_at};

use super::error::{Record, Result, ZipError};
use super::fields::u16_at;
use super::structures::{CentralDirectoryEntry, LFH_SIGNATURE, LFH_SIZE, verify_signature};

/// Variable-length part of a local file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalFileHeader {
    pub file_name_length: u16,
    pub extra_field_length: u16,
}

impl LocalFileHeader {
    /// Read and validate the fixed 30-byte header at `offset`.
    pub fn read<R: ReadAt + ?Sized>(source: &R, offset: u64) -> Result<Self> {
        let mut buf = [0u8; LFH_SIZE];
        read_exact_at(source, offset, &mut buf)?;
        verify_signature(&buf, LFH_SIGNATURE, Record::LocalFileHeader, offset)?;

        Ok(Self {
            file_name_length: u16_at(&buf, 26),
            extra_field_length: u16_at(&buf, 28),
        })
    }

    /// Bytes between the start of the header and the entry content.
    pub fn header_len(&self) -> u64 {
        LFH_SIZE as u64 + self.file_name_length as u64 + self.extra_field_length as u64
    }
}

/// Offset of the first content byte of `entry`.
///
/// # Errors
///
/// [`ZipError::CorruptLocalHeader`] when the computed offset is not inside the
/// source.
pub fn content_offset<R: ReadAt + ?Sized>(source: &R, entry: &CentralDirectoryEntry) -> Result<u64> {
    let header_offset = entry.local_header_offset as u64;
    let header = LocalFileHeader::read(source, header_offset)?;
    let offset = header_offset + header.header_len();

    let size = source.size();
    if offset >= size {
        return Err(ZipError::CorruptLocalHeader {
            header_offset,
            content_offset: offset,
            size,
        });
    }

    log::trace!("content of {:?} starts at {}", entry.file_name, offset);
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zip::central::CentralDirectoryReader;
    use crate::zip::locator::find_eocd;
    use crate::zip::testutil::{Member, ZipBuilder};

    fn first_entry(data: &[u8]) -> CentralDirectoryEntry {
        let eocd = find_eocd(data).unwrap();
        CentralDirectoryReader::from_eocd(data, &eocd)
            .read_one()
            .unwrap()
    }

    #[test]
    fn offset_follows_local_lengths() {
        let member = Member::stored("a.txt", b"payload")
            .with_local_extra(&[1, 2, 3, 4, 5, 6, 7, 8, 9])
            .with_central_extra(&[0xaa, 0xbb]);
        let (data, layout) = ZipBuilder::new()
            .prefix(b"junk before")
            .member(member)
            .build_with_layout();
        let entry = first_entry(&data);

        let offset = content_offset(data.as_slice(), &entry).unwrap();
        assert_eq!(offset as usize, layout.contents[0]);
        assert_eq!(offset as usize, layout.local_headers[0] + 30 + 5 + 9);
        assert_eq!(&data[offset as usize..offset as usize + 7], b"payload");
    }

    #[test]
    fn bad_signature_is_reported() {
        let (mut data, layout) = ZipBuilder::new().stored("a.txt", b"x").build_with_layout();
        data[layout.local_headers[0]] = b'Q';
        let entry = first_entry(&data);

        let err = content_offset(data.as_slice(), &entry).unwrap_err();
        assert!(matches!(
            err,
            ZipError::SignatureMismatch {
                record: Record::LocalFileHeader,
                offset: 0,
                expected: LFH_SIGNATURE,
                ..
            }
        ));
    }

    #[test]
    fn offset_past_end_is_corrupt() {
        let (mut data, layout) = ZipBuilder::new().stored("a.txt", b"x").build_with_layout();
        // Claim a huge extra field in the local header only.
        let extra_len_pos = layout.local_headers[0] + 28;
        data[extra_len_pos..extra_len_pos + 2].copy_from_slice(&u16::MAX.to_le_bytes());
        let entry = first_entry(&data);

        let err = content_offset(data.as_slice(), &entry).unwrap_err();
        assert!(matches!(
            err,
            ZipError::CorruptLocalHeader {
                header_offset: 0,
                ..
            }
        ));
    }
}
