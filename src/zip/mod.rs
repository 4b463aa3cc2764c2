//! ZIP archive parsing and extraction.
//!
//! This module reads entries out of a ZIP archive through any source that
//! implements [`ReadAt`](crate::io::ReadAt), without loading the archive into
//! memory.
//!
//! ## Architecture
//!
//! Components, leaf first:
//!
//! - [`fields`]: little-endian field decoding at fixed record offsets
//! - [`locator`]: finds the End of Central Directory (EOCD) record in the tail
//! - [`central`]: walks central directory records one at a time
//! - [`local`]: derives where an entry's content starts from its local header
//! - [`extract`]: reads stored bytes and inflates raw DEFLATE streams
//! - [`archive`]: the [`Archive`] facade, the lazy [`Entries`] iterator and
//!   [`Entry`] handles
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! The EOCD is read once when the archive is opened. Central directory
//! records are parsed lazily while iterating, and an entry's local header and
//! content are only touched when its content is requested.
//!
//! ## Supported Features
//!
//! - STORED (no compression) method
//! - DEFLATE compression method
//! - Archive and entry comments, prefixed archives (self-extractors)
//!
//! ## Limitations
//!
//! - No ZIP64 extensions
//! - No encryption support
//! - No multi-disk archive support
//! - No BZIP2, LZMA, or other compression methods

pub mod archive;
pub mod central;
mod error;
pub mod extract;
pub mod fields;
pub mod local;
pub mod locator;
mod structures;

#[cfg(test)]
#[path = "../../tests/common/mod.rs"]
mod testutil;

pub use archive::{Archive, Entries, Entry};
pub use central::CentralDirectoryReader;
pub use error::{Record, Result, ZipError};
pub use local::LocalFileHeader;
pub use locator::{EOCD_SEARCH_WINDOWS, find_eocd};
pub use structures::*;
