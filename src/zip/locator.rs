//! Locating the End of Central Directory record.
//!
//! The EOCD sits at the very end of the archive unless a trailing comment
//! (up to 65535 bytes) follows it. Two tail windows are searched, a small one
//! that covers the common no-comment case and one large enough for the
//! longest possible comment.

use crate::io::{ReadAt, read_at_most};

use super::error::{Result, ZipError};
use super::fields::{u16_at, u32_at};
use super::structures::EndOfCentralDirectory;

/// Tail window sizes tried in order.
pub const EOCD_SEARCH_WINDOWS: [usize; 2] = [1024, 65 * 1024];

/// Find and parse the End of Central Directory record.
///
/// # Errors
///
/// [`ZipError::CorruptArchive`] if a window yields fewer bytes than a bare
/// record needs, [`ZipError::EocdNotFound`] if neither window
/// contains a complete record.
pub fn find_eocd<R: ReadAt + ?Sized>(source: &R) -> Result<EndOfCentralDirectory> {
    let size = source.size();

    for (attempt, &window) in EOCD_SEARCH_WINDOWS.iter().enumerate() {
        let origin = size.saturating_sub(window as u64);
        let mut buf = vec![0u8; window];

        let read = read_at_most(source, origin, &mut buf)?;
        if read < EndOfCentralDirectory::SIZE {
            return Err(ZipError::CorruptArchive(
                "too few bytes to hold an end of central directory record",
            ));
        }
        buf.truncate(read);

        if attempt > 0 {
            log::debug!(
                "EOCD not in the last {} bytes, widening search to {}",
                EOCD_SEARCH_WINDOWS[attempt - 1],
                window
            );
        }

        if let Some(pos) = find_in_window(&buf) {
            let offset = origin + pos as u64;
            let eocd = EndOfCentralDirectory::from_bytes(&buf[pos..], offset)?;
            log::debug!(
                "found EOCD at offset {}: {} entries, central directory {} bytes at {}",
                offset,
                eocd.entry_count,
                eocd.cd_size,
                eocd.cd_offset
            );
            return Ok(eocd);
        }
    }

    Err(ZipError::EocdNotFound)
}

/// Position of the rightmost EOCD signature in `buf` whose declared comment
/// still fits inside `buf`.
fn find_in_window(buf: &[u8]) -> Option<usize> {
    let last = buf.len().checked_sub(EndOfCentralDirectory::SIZE)?;
    (0..=last).rev().find(|&pos| {
        u32_at(buf, pos) == EndOfCentralDirectory::SIGNATURE && {
            let comment_len =
                u16_at(buf, pos + EndOfCentralDirectory::COMMENT_LEN_POS) as usize;
            pos + EndOfCentralDirectory::SIZE + comment_len <= buf.len()
        }
    })
}
