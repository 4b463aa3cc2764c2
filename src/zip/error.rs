use std::fmt;

use thiserror::Error;

/// Result alias used throughout the archive reader.
pub type Result<T> = std::result::Result<T, ZipError>;

/// The fixed-layout records whose signatures are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    EndOfCentralDirectory,
    CentralDirectoryHeader,
    LocalFileHeader,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Record::EndOfCentralDirectory => "end of central directory",
            Record::CentralDirectoryHeader => "central directory header",
            Record::LocalFileHeader => "local file header",
        })
    }
}

/// Errors produced while reading an archive.
///
/// Every variant is fatal to the operation that raised it. Nothing is
/// retried and no partial data is returned alongside an error.
#[derive(Debug, Error)]
pub enum ZipError {
    #[error("read at offset {offset} is beyond the end of the source ({size} bytes)")]
    OutOfRangeRead { offset: u64, size: u64 },

    #[error("truncated read at offset {offset}: expected {expected} bytes, got {actual}")]
    TruncatedRead {
        offset: u64,
        expected: u64,
        actual: u64,
    },

    #[error("{record} signature mismatch at offset {offset}: expected 0x{expected:08x}, got 0x{actual:08x}")]
    SignatureMismatch {
        record: Record,
        offset: u64,
        expected: u32,
        actual: u32,
    },

    #[error("corrupt archive: {0}")]
    CorruptArchive(&'static str),

    #[error("end of central directory record not found")]
    EocdNotFound,

    #[error(
        "corrupt local file header at offset {header_offset}: content offset {content_offset} is not inside the source ({size} bytes)"
    )]
    CorruptLocalHeader {
        header_offset: u64,
        content_offset: u64,
        size: u64,
    },

    #[error("unsupported compression method: {0}")]
    UnsupportedCompressionMethod(u16),

    #[error("inflate failed: {0}")]
    InflateFailure(String),

    #[error("size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("checksum mismatch: expected 0x{expected:08x}, got 0x{actual:08x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ZipError {
    /// True when the error describes damaged archive structure or content,
    /// as opposed to a failing source or an unsupported feature.
    pub fn is_corruption(&self) -> bool {
        !matches!(
            self,
            ZipError::Io(_) | ZipError::UnsupportedCompressionMethod(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_mismatch_message() {
        let err = ZipError::SignatureMismatch {
            record: Record::LocalFileHeader,
            offset: 12,
            expected: 0x04034b50,
            actual: 0x04034b51,
        };
        assert_eq!(
            err.to_string(),
            "local file header signature mismatch at offset 12: expected 0x04034b50, got 0x04034b51"
        );
        assert!(err.is_corruption());
    }

    #[test]
    fn io_errors_are_not_corruption() {
        let err = ZipError::from(std::io::Error::other("disk on fire"));
        assert!(!err.is_corruption());
        assert!(!ZipError::UnsupportedCompressionMethod(12).is_corruption());
    }
}
