//! Archive reading: single entries by central directory offset, and a
//! whole-archive view located through the end record.

use crate::decoder::{TextDecoder, Utf8Decoder};
use crate::entry::{SkipReason, ZipEntry};
use crate::header::{
    CentralRecord, END_RECORD_LEN, END_RECORD_SIG, EndOfCentralDirectory, ZIP64_LOCATOR_LEN,
    Zip64Locator,
};
use crate::path::sanitize_extract_path;
use filetime::FileTime;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use zipcodec_core::dostime::system_time_from_dos;
use zipcodec_core::error::{Result, ZipError};

/// Largest archive comment, which bounds the end record search.
const MAX_COMMENT_LEN: usize = u16::MAX as usize;

/// A decoded entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadEntry {
    /// Entry name.
    pub name: String,
    /// Whether the name marks a directory.
    pub is_directory: bool,
    /// Uncompressed content; empty for directories.
    pub data: Vec<u8>,
}

/// Decode the entry whose central directory block starts at `cd_offset`.
///
/// ```rust
/// use zipcodec::reader::{ZipArchive, read_entry};
/// use zipcodec::source::MemorySource;
/// use zipcodec::writer::{ArchiveInput, write_archive_to_vec};
///
/// let bytes = write_archive_to_vec(vec![ArchiveInput::new(
///     "a.txt",
///     Box::new(MemorySource::new(b"hello".to_vec())),
/// )])
/// .unwrap();
/// let offset = ZipArchive::open(&bytes).unwrap().central_offsets()[0];
/// let entry = read_entry(&bytes, offset, None).unwrap();
/// assert_eq!(entry.name, "a.txt");
/// assert_eq!(entry.data, b"hello");
/// ```
pub fn read_entry(archive: &[u8], cd_offset: u64, password: Option<&[u8]>) -> Result<ReadEntry> {
    read_entry_with(archive, cd_offset, password, Arc::new(Utf8Decoder))
}

/// [`read_entry`] with a specific name codec.
pub fn read_entry_with(
    archive: &[u8],
    cd_offset: u64,
    password: Option<&[u8]>,
    decoder: Arc<dyn TextDecoder>,
) -> Result<ReadEntry> {
    let mut entry = ZipEntry::from_central(archive, cd_offset, decoder)?;
    let data = entry.get_data(password)?.to_vec();
    Ok(ReadEntry {
        name: entry.name(),
        is_directory: entry.is_directory(),
        data,
    })
}

/// Options for opening an archive.
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    /// Codec for names without the UTF-8 flag.
    pub decoder: Arc<dyn TextDecoder>,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            decoder: Arc::new(Utf8Decoder),
        }
    }
}

/// An archive held in memory, with its central directory indexed.
#[derive(Debug)]
pub struct ZipArchive<'a> {
    bytes: &'a [u8],
    end: EndOfCentralDirectory,
    offsets: Vec<u64>,
    options: ArchiveOptions,
}

impl<'a> ZipArchive<'a> {
    /// Locate the end record and index the central directory.
    pub fn open(bytes: &'a [u8]) -> Result<Self> {
        Self::open_with(bytes, ArchiveOptions::default())
    }

    /// [`open`](Self::open) with explicit options.
    pub fn open_with(bytes: &'a [u8], options: ArchiveOptions) -> Result<Self> {
        let end = find_end_record(bytes)?;

        let mut offsets = Vec::with_capacity(end.total_entries.min(4096) as usize);
        let mut at = end.offset;
        for _ in 0..end.total_entries {
            let record = CentralRecord::decode(bytes, at)?;
            offsets.push(at);
            at += record.encoded_len() as u64;
        }

        debug!(
            "opened archive: {} entries, central directory at {}",
            offsets.len(),
            end.offset
        );
        Ok(Self {
            bytes,
            end,
            offsets,
            options,
        })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Whether the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// The end record that was found.
    pub fn end_record(&self) -> &EndOfCentralDirectory {
        &self.end
    }

    /// Archive comment.
    pub fn comment(&self) -> String {
        self.options.decoder.decode(&self.end.comment)
    }

    /// Central directory offset of every entry, in directory order.
    pub fn central_offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// The archive bytes.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Entry at `index`.
    pub fn entry(&self, index: usize) -> Result<ZipEntry<'a>> {
        let offset = *self.offsets.get(index).ok_or_else(|| ZipError::EntryNotFound {
            name: format!("#{index}"),
        })?;
        ZipEntry::from_central(self.bytes, offset, Arc::clone(&self.options.decoder))
    }

    /// All entries, in directory order.
    pub fn entries(&self) -> Result<Vec<ZipEntry<'a>>> {
        (0..self.offsets.len()).map(|i| self.entry(i)).collect()
    }

    /// First entry with the given name.
    pub fn by_name(&self, name: &str) -> Result<ZipEntry<'a>> {
        for i in 0..self.offsets.len() {
            let entry = self.entry(i)?;
            if entry.name() == name {
                return Ok(entry);
            }
        }
        Err(ZipError::entry_not_found(name))
    }

    /// Decode every entry beneath `root`.
    pub fn extract_all(
        &self,
        root: &Path,
        options: &ExtractOptions,
    ) -> Result<Vec<ExtractOutcome>> {
        let mut entries = self.entries()?;
        let mut outcomes = Vec::with_capacity(entries.len());
        for entry in &mut entries {
            outcomes.push(extract_to(root, entry, options)?);
        }
        Ok(outcomes)
    }
}

/// Find the end record, searching backwards over at most one maximal
/// comment. A Zip64 locator right before it redirects to the Zip64 record.
fn find_end_record(bytes: &[u8]) -> Result<EndOfCentralDirectory> {
    if bytes.len() < END_RECORD_LEN {
        return Err(ZipError::invalid_end_record("archive is shorter than an end record"));
    }

    let search_start = bytes.len().saturating_sub(MAX_COMMENT_LEN + END_RECORD_LEN);
    let last = bytes.len() - END_RECORD_LEN;
    let sig = END_RECORD_SIG.to_le_bytes();

    let pos = (search_start..=last)
        .rev()
        .find(|&p| bytes[p..p + 4] == sig)
        .ok_or_else(|| ZipError::invalid_end_record("end of central directory not found"))?;
    let classic = EndOfCentralDirectory::decode(&bytes[pos..])?;

    let locator = pos
        .checked_sub(ZIP64_LOCATOR_LEN)
        .and_then(|at| Zip64Locator::decode(&bytes[at..pos]));
    let Some(locator) = locator else {
        return Ok(classic);
    };

    let at = usize::try_from(locator.end_record_offset)
        .ok()
        .filter(|&at| at < bytes.len())
        .ok_or_else(|| ZipError::invalid_end_record("Zip64 end record offset out of range"))?;
    let mut zip64 = EndOfCentralDirectory::decode(&bytes[at..])?;
    if !zip64.zip64 {
        return Err(ZipError::invalid_end_record(
            "Zip64 locator does not point at a Zip64 end record",
        ));
    }
    zip64.comment = classic.comment;
    debug!("using Zip64 end record at {at}");
    Ok(zip64)
}

/// Options for [`extract_to`].
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Password for encrypted entries.
    pub password: Option<Vec<u8>>,
    /// Replace files that already exist.
    pub overwrite: bool,
    /// Apply the stored Unix permissions.
    pub preserve_permissions: bool,
    /// Keep setuid, setgid and sticky bits when applying permissions.
    pub preserve_special_bits: bool,
    /// Restore the stored modification time.
    pub preserve_mtime: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            password: None,
            overwrite: false,
            preserve_permissions: true,
            preserve_special_bits: false,
            preserve_mtime: true,
        }
    }
}

/// What [`extract_to`] did with an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// A file was written.
    File(PathBuf),
    /// A directory was created.
    Directory(PathBuf),
    /// Nothing was written.
    Skipped(SkipReason),
}

/// Write `entry` beneath `root`.
///
/// The target is computed with [`sanitize_extract_path`], so it never
/// escapes `root`.
pub fn extract_to(
    root: &Path,
    entry: &mut ZipEntry<'_>,
    options: &ExtractOptions,
) -> Result<ExtractOutcome> {
    let name = entry.name();
    let target = sanitize_extract_path(root, &name);

    if entry.is_directory() {
        std::fs::create_dir_all(&target)?;
        let mode = entry.file_attr();
        if options.preserve_permissions && mode != 0 {
            // Stay writable so children can still be extracted.
            apply_mode(&target, mode | 0o700, options)?;
        }
        restore_mtime(&target, entry, options)?;
        debug!("created {}", target.display());
        return Ok(ExtractOutcome::Directory(target));
    }

    if target.exists() && !options.overwrite {
        debug!("skipping {}: already exists", target.display());
        return Ok(ExtractOutcome::Skipped(SkipReason::AlreadyExists));
    }

    let data = entry.get_data(options.password.as_deref())?;
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&target, data)?;

    if options.preserve_permissions {
        apply_mode(&target, entry.file_attr(), options)?;
    }
    restore_mtime(&target, entry, options)?;
    debug!("extracted {} ({} bytes)", target.display(), entry.header().size);
    Ok(ExtractOutcome::File(target))
}

fn restore_mtime(target: &Path, entry: &ZipEntry<'_>, options: &ExtractOptions) -> Result<()> {
    if !options.preserve_mtime {
        return Ok(());
    }
    if let Some(time) = system_time_from_dos(entry.header().time) {
        filetime::set_file_mtime(target, FileTime::from_system_time(time))?;
    }
    Ok(())
}

#[cfg(unix)]
fn apply_mode(target: &Path, mode: u32, options: &ExtractOptions) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    // Archives from non-Unix tools carry no mode.
    if mode & 0o777 == 0 {
        return Ok(());
    }
    let mask = if options.preserve_special_bits { 0o7777 } else { 0o777 };
    std::fs::set_permissions(target, std::fs::Permissions::from_mode(mode & mask))?;
    Ok(())
}

#[cfg(not(unix))]
fn apply_mode(_target: &Path, _mode: u32, _options: &ExtractOptions) -> Result<()> {
    Ok(())
}
