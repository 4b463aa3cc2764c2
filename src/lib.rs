//! # lazyunzip
//!
//! Random-access ZIP entry extraction over any positional byte source.
//!
//! An [`Archive`] is opened over a borrowed [`ReadAt`] source. Opening reads
//! only the tail of the source to find the End of Central Directory record;
//! entries are then parsed one at a time while iterating, and an entry's
//! content is read and inflated only when asked for. Nothing is cached, so
//! memory use is bounded by the largest entry actually read.
//!
//! ## Features
//!
//! - Read archives from memory, local files, or HTTP/HTTPS URLs using Range requests
//! - STORED (uncompressed) and DEFLATE compression methods
//! - Trailing archive comments of any length and prefixed archives
//! - Local headers re-validated for every content read
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use lazyunzip::{Archive, LocalFileReader};
//!
//! fn main() -> anyhow::Result<()> {
//!     let reader = LocalFileReader::new(Path::new("archive.zip"))?;
//!     let archive = Archive::open(&reader)?;
//!     println!("{} entries", archive.entry_count());
//!
//!     for entry in archive.entries() {
//!         let entry = entry?;
//!         if !entry.is_dir() {
//!             let content = entry.read_content()?;
//!             println!("{}: {} bytes", entry.file_name(), content.len());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod io;
pub mod zip;

pub use cli::Cli;
pub use io::{HttpRangeReader, LocalFileReader, ReadAt};
pub use zip::{Archive, CentralDirectoryEntry, CompressionMethod, Entries, Entry, ZipError};
