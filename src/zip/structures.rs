use super::error::{Record, Result, ZipError};
use super::fields::{u16_at, u32_at};

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unknown(v) => *v,
        }
    }
}

/// Check the 4-byte signature at the start of `buf`.
pub(crate) fn verify_signature(buf: &[u8], expected: u32, record: Record, offset: u64) -> Result<()> {
    let actual = u32_at(buf, 0);
    if actual != expected {
        return Err(ZipError::SignatureMismatch {
            record,
            offset,
            expected,
            actual,
        });
    }
    Ok(())
}

/// End of Central Directory (EOCD) - 22 bytes plus a trailing comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndOfCentralDirectory {
    pub entry_count: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
    /// Archive comment, exactly as many bytes as the record declares
    pub comment: Vec<u8>,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: u32 = 0x06054b50;
    pub const SIZE: usize = 22;

    /// Offset of the comment length field within the record.
    pub(crate) const COMMENT_LEN_POS: usize = 20;

    /// Decode a record whose fixed part and full comment are in `data`.
    ///
    /// `offset` is where `data` starts in the source and is only used for
    /// error reporting.
    pub fn from_bytes(data: &[u8], offset: u64) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(ZipError::CorruptArchive(
                "end of central directory record is shorter than 22 bytes",
            ));
        }
        verify_signature(data, Self::SIGNATURE, Record::EndOfCentralDirectory, offset)?;

        let comment_len = u16_at(data, Self::COMMENT_LEN_POS) as usize;
        let comment = data
            .get(Self::SIZE..Self::SIZE + comment_len)
            .ok_or_else(|| ZipError::TruncatedRead {
                offset: offset + Self::SIZE as u64,
                expected: comment_len as u64,
                actual: data.len().saturating_sub(Self::SIZE) as u64,
            })?
            .to_vec();

        Ok(Self {
            entry_count: u16_at(data, 10),
            cd_size: u32_at(data, 12),
            cd_offset: u32_at(data, 16),
            comment,
        })
    }

    /// Exclusive upper bound of the central directory.
    pub fn cd_end(&self) -> u64 {
        self.cd_offset as u64 + self.cd_size as u64
    }
}

/// Central Directory File Header (CDFH) - 46 bytes minimum
pub const CDFH_SIGNATURE: u32 = 0x02014b50;
pub const CDFH_SIZE: usize = 46;

/// Local File Header (LFH) - 30 bytes
pub const LFH_SIGNATURE: u32 = 0x04034b50;
pub const LFH_SIZE: usize = 30;

/// One parsed central directory record.
///
/// The three variable-length fields hold exactly the number of bytes declared
/// by the matching `*_length` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CentralDirectoryEntry {
    pub flags: u16,
    pub compression_method: u16,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name_length: u16,
    pub extra_field_length: u16,
    pub comment_length: u16,
    pub internal_attrs: u16,
    pub external_attrs: u32,
    pub local_header_offset: u32,
    pub file_name: String,
    pub extra_field: Vec<u8>,
    pub comment: String,
}

impl CentralDirectoryEntry {
    /// Directory entries have a non-empty name ending with '/'
    pub fn is_dir(&self) -> bool {
        self.file_name.ends_with('/')
    }

    pub fn compression(&self) -> CompressionMethod {
        CompressionMethod::from_u16(self.compression_method)
    }

    /// General purpose flag bit 0. Reported only; entries are never decrypted.
    pub fn is_encrypted(&self) -> bool {
        self.flags & 0x0001 != 0
    }

    /// Total size of this record in the central directory.
    pub fn record_len(&self) -> u64 {
        CDFH_SIZE as u64
            + self.file_name_length as u64
            + self.extra_field_length as u64
            + self.comment_length as u64
    }

    /// Parse modification date to (year, month, day)
    pub fn mod_date(&self) -> (u16, u8, u8) {
        let day = (self.last_mod_date & 0x1F) as u8;
        let month = ((self.last_mod_date >> 5) & 0x0F) as u8;
        let year = ((self.last_mod_date >> 9) & 0x7F) + 1980;
        (year, month, day)
    }

    /// Parse modification time to (hour, minute, second)
    pub fn mod_time(&self) -> (u8, u8, u8) {
        let second = ((self.last_mod_time & 0x1F) * 2) as u8;
        let minute = ((self.last_mod_time >> 5) & 0x3F) as u8;
        let hour = ((self.last_mod_time >> 11) & 0x1F) as u8;
        (hour, minute, second)
    }
}
