//! Little-endian field extraction at fixed record offsets.
//!
//! Callers size their buffers from the record constants before decoding, so
//! an out-of-bounds position here is a programming error and panics.

use byteorder::{ByteOrder, LittleEndian};

pub fn u16_at(buf: &[u8], pos: usize) -> u16 {
    LittleEndian::read_u16(&buf[pos..pos + 2])
}

pub fn u32_at(buf: &[u8], pos: usize) -> u32 {
    LittleEndian::read_u32(&buf[pos..pos + 4])
}
