//! In-memory ZIP writer for tests.
//!
//! Produces real local headers, central directory records and an EOCD record
//! so the reader is exercised against byte-exact archives.

#![allow(dead_code)]

use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::io::Write;

pub const METHOD_STORED: u16 = 0;
pub const METHOD_DEFLATE: u16 = 8;

/// One member of an archive under construction.
#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    pub content: Vec<u8>,
    pub method: u16,
    pub local_extra: Vec<u8>,
    pub central_extra: Vec<u8>,
    pub comment: Vec<u8>,
    pub flags: u16,
}

impl Member {
    pub fn stored(name: &str, content: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            content: content.to_vec(),
            method: METHOD_STORED,
            local_extra: Vec::new(),
            central_extra: Vec::new(),
            comment: Vec::new(),
            flags: 0,
        }
    }

    pub fn deflated(name: &str, content: &[u8]) -> Self {
        Self {
            method: METHOD_DEFLATE,
            ..Self::stored(name, content)
        }
    }

    pub fn directory(name: &str) -> Self {
        Self::stored(name, b"")
    }

    pub fn with_method(mut self, method: u16) -> Self {
        self.method = method;
        self
    }

    pub fn with_local_extra(mut self, extra: &[u8]) -> Self {
        self.local_extra = extra.to_vec();
        self
    }

    pub fn with_central_extra(mut self, extra: &[u8]) -> Self {
        self.central_extra = extra.to_vec();
        self
    }

    pub fn with_comment(mut self, comment: &[u8]) -> Self {
        self.comment = comment.to_vec();
        self
    }

    pub fn with_flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }
}

/// Byte offsets of every record written, for targeted corruption.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub local_headers: Vec<usize>,
    pub contents: Vec<usize>,
    pub central_headers: Vec<usize>,
    pub cd_offset: usize,
    pub eocd: usize,
}

#[derive(Debug, Default)]
pub struct ZipBuilder {
    prefix: Vec<u8>,
    members: Vec<Member>,
    comment: Vec<u8>,
}

pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = flate2::Crc::new();
    crc.update(data);
    crc.sum()
}

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes placed before the first local header (e.g. a stub executable).
    pub fn prefix(mut self, prefix: &[u8]) -> Self {
        self.prefix = prefix.to_vec();
        self
    }

    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn stored(self, name: &str, content: &[u8]) -> Self {
        self.member(Member::stored(name, content))
    }

    pub fn deflated(self, name: &str, content: &[u8]) -> Self {
        self.member(Member::deflated(name, content))
    }

    pub fn comment(mut self, comment: &[u8]) -> Self {
        self.comment = comment.to_vec();
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.build_with_layout().0
    }

    pub fn build_with_layout(self) -> (Vec<u8>, Layout) {
        let mut out = self.prefix.clone();
        let mut central = Vec::new();
        let mut layout = Layout::default();
        let mut central_offsets = Vec::new();

        for member in &self.members {
            let payload = match member.method {
                METHOD_DEFLATE => deflate(&member.content),
                _ => member.content.clone(),
            };
            let crc = crc32(&member.content);
            let local_offset = out.len();
            layout.local_headers.push(local_offset);

            // local file header
            out.extend_from_slice(&0x04034b50u32.to_le_bytes());
            out.extend_from_slice(&20u16.to_le_bytes());
            out.extend_from_slice(&member.flags.to_le_bytes());
            out.extend_from_slice(&member.method.to_le_bytes());
            out.extend_from_slice(&0x6000u16.to_le_bytes());
            out.extend_from_slice(&0x5721u16.to_le_bytes());
            out.extend_from_slice(&crc.to_le_bytes());
            out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            out.extend_from_slice(&(member.content.len() as u32).to_le_bytes());
            out.extend_from_slice(&(member.name.len() as u16).to_le_bytes());
            out.extend_from_slice(&(member.local_extra.len() as u16).to_le_bytes());
            out.extend_from_slice(member.name.as_bytes());
            out.extend_from_slice(&member.local_extra);
            layout.contents.push(out.len());
            out.extend_from_slice(&payload);

            // central directory header
            central_offsets.push(central.len());
            central.extend_from_slice(&0x02014b50u32.to_le_bytes());
            central.extend_from_slice(&0x031eu16.to_le_bytes());
            central.extend_from_slice(&20u16.to_le_bytes());
            central.extend_from_slice(&member.flags.to_le_bytes());
            central.extend_from_slice(&member.method.to_le_bytes());
            central.extend_from_slice(&0x6000u16.to_le_bytes());
            central.extend_from_slice(&0x5721u16.to_le_bytes());
            central.extend_from_slice(&crc.to_le_bytes());
            central.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            central.extend_from_slice(&(member.content.len() as u32).to_le_bytes());
            central.extend_from_slice(&(member.name.len() as u16).to_le_bytes());
            central.extend_from_slice(&(member.central_extra.len() as u16).to_le_bytes());
            central.extend_from_slice(&(member.comment.len() as u16).to_le_bytes());
            central.extend_from_slice(&0u16.to_le_bytes());
            central.extend_from_slice(&1u16.to_le_bytes());
            central.extend_from_slice(&0o100644u32.wrapping_shl(16).to_le_bytes());
            central.extend_from_slice(&(local_offset as u32).to_le_bytes());
            central.extend_from_slice(member.name.as_bytes());
            central.extend_from_slice(&member.central_extra);
            central.extend_from_slice(&member.comment);
        }

        let cd_offset = out.len();
        layout.cd_offset = cd_offset;
        layout.central_headers = central_offsets.iter().map(|o| o + cd_offset).collect();
        out.extend_from_slice(&central);

        layout.eocd = out.len();
        let count = self.members.len() as u16;
        out.extend_from_slice(&0x06054b50u32.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&(central.len() as u32).to_le_bytes());
        out.extend_from_slice(&(cd_offset as u32).to_le_bytes());
        out.extend_from_slice(&(self.comment.len() as u16).to_le_bytes());
        out.extend_from_slice(&self.comment);

        (out, layout)
    }
}
