//! Single-pass archive writer.
//!
//! Each input becomes a local header immediately followed by its data; the
//! matching central directory blocks are retained and emitted after the last
//! entry, closed by the classic end record.
//!
//! ```rust
//! use zipcodec::source::MemorySource;
//! use zipcodec::writer::{ArchiveInput, write_archive_to_vec};
//!
//! let bytes = write_archive_to_vec(vec![
//!     ArchiveInput::new("hello.txt", Box::new(MemorySource::new(b"hi".to_vec()))),
//!     ArchiveInput::directory("docs/"),
//! ])
//! .unwrap();
//! assert_eq!(&bytes[..4], b"PK\x03\x04");
//! ```

use crate::crypto::{SaltSource, TimeSeededSalt};
use crate::decoder::{TextDecoder, Utf8Decoder};
use crate::entry::{ZipEntry, default_attr};
use crate::header::{EndOfCentralDirectory, ZIP64_MARKER_32};
use crate::method::ZipCompressionLevel;
use crate::path::canonical_name;
use crate::source::{ByteSource, FileSource, MemorySource};
use log::{debug, warn};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use zipcodec_core::dostime::dos_time_from_system;
use zipcodec_core::error::{Result, ZipError};

/// One file or directory to be written.
pub struct ArchiveInput {
    /// Entry name; a trailing `/` makes a directory.
    pub name: String,
    /// Modification time.
    pub last_modified: SystemTime,
    /// Unix mode; only the permission bits are kept.
    pub attributes: Option<u32>,
    /// Content, drained when the writer reaches this input.
    pub source: Box<dyn ByteSource>,
}

impl std::fmt::Debug for ArchiveInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveInput")
            .field("name", &self.name)
            .field("last_modified", &self.last_modified)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

impl ArchiveInput {
    /// A file input stamped with the current time.
    pub fn new(name: impl Into<String>, source: Box<dyn ByteSource>) -> Self {
        Self {
            name: name.into(),
            last_modified: SystemTime::now(),
            attributes: None,
            source,
        }
    }

    /// A directory input. A trailing `/` is appended when missing.
    pub fn directory(name: impl Into<String>) -> Self {
        let mut name = name.into();
        if !name.ends_with('/') && !name.ends_with('\\') {
            name.push('/');
        }
        Self::new(name, Box::new(MemorySource::default()))
    }

    /// Describe a path on disk, taking time and mode from its metadata.
    ///
    /// Directories get a trailing `/` on `name`; their contents are not
    /// walked.
    pub fn from_path(path: impl AsRef<Path>, name: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        let mut input = if metadata.is_dir() {
            Self::directory(name)
        } else {
            Self::new(name, Box::new(FileSource::new(path)))
        };
        if let Ok(modified) = metadata.modified() {
            input.last_modified = modified;
        }
        input.attributes = unix_mode(&metadata);
        Ok(input)
    }

    /// Set the modification time.
    #[must_use]
    pub fn with_modified(mut self, time: SystemTime) -> Self {
        self.last_modified = time;
        self
    }

    /// Set the Unix mode.
    #[must_use]
    pub fn with_attributes(mut self, mode: u32) -> Self {
        self.attributes = Some(mode);
        self
    }
}

#[cfg(unix)]
fn unix_mode(metadata: &std::fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(metadata.permissions().mode())
}

#[cfg(not(unix))]
fn unix_mode(_metadata: &std::fs::Metadata) -> Option<u32> {
    None
}

/// Options applied to every entry a [`ZipWriter`] writes.
#[derive(Debug)]
pub struct WriterOptions {
    /// Compression level for file data.
    pub level: ZipCompressionLevel,
    /// Codec for names and comments.
    pub decoder: Arc<dyn TextDecoder>,
    /// Encrypt file data with ZipCrypto.
    pub password: Option<Vec<u8>>,
    /// Also write the second check byte older tools expect.
    pub legacy_check: bool,
    /// Salt for the encryption header.
    pub salt: Box<dyn SaltSource>,
    /// Archive comment.
    pub comment: Vec<u8>,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            level: ZipCompressionLevel::default(),
            decoder: Arc::new(Utf8Decoder),
            password: None,
            legacy_check: false,
            salt: Box::new(TimeSeededSalt::new()),
            comment: Vec::new(),
        }
    }
}

impl WriterOptions {
    /// Set the compression level.
    #[must_use]
    pub fn with_level(mut self, level: ZipCompressionLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the name codec.
    #[must_use]
    pub fn with_decoder(mut self, decoder: Arc<dyn TextDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Encrypt entries with `password`.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<Vec<u8>>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Toggle the legacy second check byte.
    #[must_use]
    pub fn with_legacy_check(mut self, legacy: bool) -> Self {
        self.legacy_check = legacy;
        self
    }

    /// Use a specific salt source.
    #[must_use]
    pub fn with_salt(mut self, salt: Box<dyn SaltSource>) -> Self {
        self.salt = salt;
        self
    }

    /// Set the archive comment.
    #[must_use]
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = self.decoder.encode(comment);
        self
    }
}

/// ZIP archive writer.
#[derive(Debug)]
pub struct ZipWriter<W: Write> {
    writer: Option<W>,
    options: WriterOptions,
    central: Vec<Vec<u8>>,
    offset: u64,
    finished: bool,
}

impl<W: Write> ZipWriter<W> {
    /// Create a writer with default options.
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, WriterOptions::default())
    }

    /// Create a writer with explicit options.
    pub fn with_options(writer: W, options: WriterOptions) -> Self {
        Self {
            writer: Some(writer),
            options,
            central: Vec::new(),
            offset: 0,
            finished: false,
        }
    }

    /// Number of entries written so far.
    pub fn len(&self) -> usize {
        self.central.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.central.is_empty()
    }

    /// Bytes written so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn sink(&mut self) -> Result<&mut W> {
        self.writer
            .as_mut()
            .ok_or_else(|| ZipError::Io(std::io::Error::other("writer already taken")))
    }

    /// Write one entry: local header, then its data.
    pub fn add_entry(&mut self, mut input: ArchiveInput) -> Result<()> {
        if self.finished {
            return Err(ZipError::Io(std::io::Error::other(
                "archive already finished",
            )));
        }

        let name = canonical_name(&input.name);
        if name.is_empty() {
            return Err(ZipError::InvalidEntryName { name: input.name });
        }

        let mut entry = ZipEntry::with_decoder(Arc::clone(&self.options.decoder));
        entry.set_name(&name);
        entry.set_dos_time(dos_time_from_system(input.last_modified));
        entry.set_attr(default_attr(entry.is_directory(), input.attributes));
        entry.set_codec(self.options.level.codec());
        entry.set_password(self.options.password.as_deref());
        entry.set_legacy_check(self.options.legacy_check);

        let data = if entry.is_directory() {
            Vec::new()
        } else {
            input.source.read_all()?
        };
        entry.set_data(data);

        let compressed = entry.get_compressed_data_with(self.options.salt.as_mut())?;
        entry.set_offset(self.offset);
        check_fits("offset", self.offset)?;
        check_fits("compressed size", entry.header().compressed_size)?;
        check_fits("uncompressed size", entry.header().size)?;

        let local = entry.pack_local_header()?;
        let central = entry.pack_central_header()?;

        let sink = self.sink()?;
        sink.write_all(&local)?;
        sink.write_all(&compressed)?;

        debug!(
            "wrote {:?} at {}: {} -> {} bytes, method {}",
            name,
            self.offset,
            entry.header().size,
            compressed.len(),
            entry.header().method()
        );

        self.offset += (local.len() + compressed.len()) as u64;
        self.central.push(central);
        Ok(())
    }

    /// Write the central directory and end record. Idempotent.
    pub fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }

        let cd_offset = self.offset;
        let cd_size: u64 = self.central.iter().map(|b| b.len() as u64).sum();
        let count = self.central.len() as u64;

        let end = EndOfCentralDirectory {
            disk_entries: count,
            total_entries: count,
            size: cd_size,
            offset: cd_offset,
            comment: self.options.comment.clone(),
            zip64: false,
        }
        .encode()?;

        let central = std::mem::take(&mut self.central);
        let sink = self.sink()?;
        for block in &central {
            sink.write_all(block)?;
        }
        sink.write_all(&end)?;
        sink.flush()?;

        debug!(
            "central directory: {} entries, {} bytes at {}",
            count, cd_size, cd_offset
        );
        self.offset += cd_size + end.len() as u64;
        self.finished = true;
        Ok(())
    }

    /// Finish the archive and return the inner writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.finish()?;
        self.writer
            .take()
            .ok_or_else(|| ZipError::Io(std::io::Error::other("writer already taken")))
    }
}

impl<W: Write> Drop for ZipWriter<W> {
    fn drop(&mut self) {
        if self.writer.is_none() {
            return;
        }
        if let Err(e) = self.finish() {
            warn!("failed to finish archive on drop: {e}");
        }
    }
}

fn check_fits(field: &'static str, value: u64) -> Result<()> {
    if value >= u64::from(ZIP64_MARKER_32) {
        return Err(ZipError::zip64_required(field, value));
    }
    Ok(())
}

/// Write `inputs` as a complete archive and return the writer.
pub fn write_archive<W, I>(writer: W, inputs: I) -> Result<W>
where
    W: Write,
    I: IntoIterator<Item = ArchiveInput>,
{
    write_archive_with(writer, inputs, WriterOptions::default())
}

/// [`write_archive`] with explicit options.
pub fn write_archive_with<W, I>(writer: W, inputs: I, options: WriterOptions) -> Result<W>
where
    W: Write,
    I: IntoIterator<Item = ArchiveInput>,
{
    let mut zip = ZipWriter::with_options(writer, options);
    for input in inputs {
        zip.add_entry(input)?;
    }
    zip.into_inner()
}

/// Write `inputs` into a new buffer.
pub fn write_archive_to_vec<I>(inputs: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = ArchiveInput>,
{
    write_archive(Vec::new(), inputs)
}
