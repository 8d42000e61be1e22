//! # zipcodec
//!
//! A ZIP archive reader and writer.
//!
//! This crate implements the on-disk format directly:
//!
//! - **Headers**: local and central headers, end records (classic and
//!   Zip64) and data descriptors, all bounds-checked on decode
//! - **Compression**: STORED and raw DEFLATE behind a codec trait
//! - **ZipCrypto**: the traditional PKWARE stream cipher
//! - **Names**: UTF-8 or legacy code pages, canonicalized on write and
//!   sanitized on extraction
//!
//! ## Example
//!
//! ```rust
//! use zipcodec::reader::ZipArchive;
//! use zipcodec::source::MemorySource;
//! use zipcodec::writer::{ArchiveInput, write_archive_to_vec};
//!
//! let bytes = write_archive_to_vec(vec![
//!     ArchiveInput::new("notes/todo.txt", Box::new(MemorySource::new(b"ship it".to_vec()))),
//! ])
//! .unwrap();
//!
//! let archive = ZipArchive::open(&bytes).unwrap();
//! let mut entry = archive.by_name("notes/todo.txt").unwrap();
//! assert_eq!(entry.get_data(None).unwrap(), b"ship it");
//! ```
//!
//! ## Extraction
//!
//! Use [`reader::extract_to`] to write entries to disk. Target paths go
//! through [`path::sanitize_extract_path`] and never leave the chosen root.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod crypto;
pub mod decoder;
pub mod entry;
pub mod header;
pub mod method;
pub mod path;
pub mod reader;
pub mod source;
pub mod writer;

// Re-exports
pub use decoder::{LegacyDecoder, TextDecoder, Utf8Decoder};
pub use entry::{EntryData, SkipReason, ZipEntry};
pub use header::{CentralHeader, DataDescriptor, EndOfCentralDirectory, LocalHeader};
pub use method::{CompressionMethod, ZipCompressionLevel};
pub use path::{canonical_name, sanitize_extract_path};
pub use reader::{
    ArchiveOptions, ExtractOptions, ExtractOutcome, ReadEntry, ZipArchive, extract_to, read_entry,
    read_entry_with,
};
pub use source::{ByteSource, FileSource, MemorySource, ReaderSource};
pub use writer::{ArchiveInput, WriterOptions, ZipWriter, write_archive, write_archive_to_vec};
pub use zipcodec_core::{Result, ZipError};
