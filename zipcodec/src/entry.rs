//! The archive entry model.
//!
//! A [`ZipEntry`] owns its central header plus name, comment and extra
//! bytes, and carries its payload in one of four states:
//!
//! ```text
//!   Unbound ──set_data──▶ Pending(bytes)
//!      │
//!      └──from_central──▶ Bound(archive) ──get_data──▶ Materialized
//! ```
//!
//! A pending entry holds uncompressed bytes that are compressed (and
//! encrypted) on demand when written. A bound entry borrows the archive it
//! was read from and decodes lazily; the first successful decode is cached.

use crate::crypto::{self, SaltSource, TimeSeededSalt};
use crate::decoder::{TextDecoder, Utf8Decoder};
use crate::header::{
    CentralHeader, CentralRecord, DataDescriptor, FLAG_ENCRYPTED, FLAG_UTF8, LOCAL_HEADER_LEN,
    LocalHeader, ZIP64_EXTRA_FIELD_ID, Zip64Extra, extra_records, read_bytes, resolve_zip64,
};
use crate::method::{DeflateCodec, codec_for};
use chrono::NaiveDateTime;
use log::{debug, warn};
use std::borrow::Cow;
use std::sync::Arc;
use zipcodec_core::crc::crc32;
use zipcodec_core::dostime::{dos_time_now, from_dos_time, to_dos_time};
use zipcodec_core::error::{Result, ZipError};
use zipcodec_core::traits::{CompressionCodec, METHOD_STORED};

/// DOS attribute bit marking a directory.
pub const DOS_DIRECTORY: u32 = 0x10;

/// Unix file type bits for a directory.
pub const UNIX_DIRECTORY: u32 = 0o040000;

/// Unix file type bits for a regular file.
pub const UNIX_REGULAR_FILE: u32 = 0o100000;

/// Default permissions for directories.
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Default permissions for files.
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Pack external attributes: DOS bits low, Unix type and mode high.
///
/// Only the low 12 bits of `mode` are kept.
pub fn default_attr(is_directory: bool, mode: Option<u32>) -> u32 {
    let dos = if is_directory { DOS_DIRECTORY } else { 0 };
    let kind = if is_directory {
        UNIX_DIRECTORY
    } else {
        UNIX_REGULAR_FILE
    };
    let perms = mode.map(|m| m & 0xFFF).unwrap_or(if is_directory {
        DEFAULT_DIR_MODE
    } else {
        DEFAULT_FILE_MODE
    });
    dos | ((kind | perms) << 16)
}

/// Why an entry produced no bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Directories carry no content.
    Directory,
    /// The extraction target already exists.
    AlreadyExists,
}

/// Result of asking an entry for its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryData<'d> {
    /// Decoded, CRC-checked bytes.
    Data(&'d [u8]),
    /// Nothing to return.
    Skipped(SkipReason),
}

#[derive(Debug)]
enum Payload<'a> {
    Unbound,
    Pending(Vec<u8>),
    Bound(&'a [u8]),
    Materialized { archive: &'a [u8], data: Vec<u8> },
}

/// A single archive entry.
#[derive(Debug)]
pub struct ZipEntry<'a> {
    header: CentralHeader,
    raw_name: Vec<u8>,
    comment: Vec<u8>,
    extra: Vec<u8>,
    local_extra: Vec<u8>,
    is_directory: bool,
    decoder: Arc<dyn TextDecoder>,
    codec: Arc<dyn CompressionCodec>,
    password: Option<Vec<u8>>,
    legacy_check: bool,
    payload: Payload<'a>,
}

impl Default for ZipEntry<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ZipEntry<'a> {
    /// Create an empty entry stamped with the current time.
    pub fn new() -> Self {
        Self::with_decoder(Arc::new(Utf8Decoder))
    }

    /// Create an empty entry with a specific name codec.
    pub fn with_decoder(decoder: Arc<dyn TextDecoder>) -> Self {
        let mut header = CentralHeader::default();
        header.time = dos_time_now();
        Self {
            header,
            raw_name: Vec::new(),
            comment: Vec::new(),
            extra: Vec::new(),
            local_extra: Vec::new(),
            is_directory: false,
            decoder,
            codec: Arc::new(DeflateCodec::default()),
            password: None,
            legacy_check: false,
            payload: Payload::Unbound,
        }
    }

    /// Bind an entry to the central directory block at `cd_offset` of
    /// `archive`.
    pub fn from_central(
        archive: &'a [u8],
        cd_offset: u64,
        decoder: Arc<dyn TextDecoder>,
    ) -> Result<Self> {
        let record = CentralRecord::decode(archive, cd_offset)?;
        let mut entry = Self {
            header: record.header,
            raw_name: record.name,
            comment: record.comment,
            extra: record.extra,
            local_extra: Vec::new(),
            is_directory: false,
            decoder,
            codec: Arc::new(DeflateCodec::default()),
            password: None,
            legacy_check: false,
            payload: Payload::Bound(archive),
        };
        // Multi-byte code pages may end a character on 0x5C.
        entry.is_directory = entry.name().ends_with(['/', '\\']);
        Ok(entry)
    }

    /// The central header.
    pub fn header(&self) -> &CentralHeader {
        &self.header
    }

    fn decode_text(&self, bytes: &[u8]) -> String {
        if self.header.flags & FLAG_UTF8 != 0 {
            String::from_utf8_lossy(bytes).into_owned()
        } else {
            self.decoder.decode(bytes)
        }
    }

    /// Full entry name.
    pub fn name(&self) -> String {
        self.decode_text(&self.raw_name)
    }

    /// Raw entry name bytes as stored.
    pub fn raw_name(&self) -> &[u8] {
        &self.raw_name
    }

    /// Last path segment of the name.
    pub fn base_name(&self) -> String {
        let name = self.name();
        name.trim_end_matches(['/', '\\'])
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .to_string()
    }

    /// Set the name. A trailing `/` or `\` marks a directory and resets the
    /// attributes to the defaults for that kind.
    pub fn set_name(&mut self, name: &str) {
        self.raw_name = self.decoder.encode(name);
        self.is_directory = name.ends_with(['/', '\\']);
        self.header.name_len = self.raw_name.len().min(u16::MAX as usize) as u16;
        if self.decoder.efs(name) {
            self.header.flags |= FLAG_UTF8;
        } else {
            self.header.flags &= !FLAG_UTF8;
        }
        self.header.external_attr = default_attr(self.is_directory, None);
    }

    /// Whether the name marks a directory.
    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Modification time.
    pub fn time(&self) -> NaiveDateTime {
        from_dos_time(self.header.time)
    }

    /// Set the modification time.
    pub fn set_time(&mut self, time: &NaiveDateTime) {
        self.header.time = to_dos_time(time);
    }

    /// Set the packed DOS time directly.
    pub fn set_dos_time(&mut self, value: u32) {
        self.header.time = value;
    }

    /// External attributes.
    pub fn attr(&self) -> u32 {
        self.header.external_attr
    }

    /// Set the external attributes.
    pub fn set_attr(&mut self, attr: u32) {
        self.header.external_attr = attr;
    }

    /// Unix permission bits.
    pub fn file_attr(&self) -> u32 {
        self.header.file_attr()
    }

    /// Entry comment.
    pub fn comment(&self) -> String {
        self.decode_text(&self.comment)
    }

    /// Set the entry comment.
    pub fn set_comment(&mut self, comment: &str) -> Result<()> {
        let bytes = self.decoder.encode(comment);
        if bytes.len() > u16::MAX as usize {
            return Err(ZipError::CommentTooLong { len: bytes.len() });
        }
        self.header.comment_len = bytes.len() as u16;
        self.comment = bytes;
        Ok(())
    }

    /// Extra field blob.
    pub fn extra(&self) -> &[u8] {
        &self.extra
    }

    /// Replace the extra field. Zip64 values override marked header fields.
    pub fn set_extra(&mut self, extra: Vec<u8>) -> Result<()> {
        let len = u16::try_from(extra.len())
            .map_err(|_| ZipError::extra_field("extra field longer than 65535 bytes"))?;
        resolve_zip64(&mut self.header, &extra)?;
        self.header.extra_len = len;
        self.extra = extra;
        Ok(())
    }

    /// Codec used when compressing pending data.
    pub fn set_codec(&mut self, codec: Arc<dyn CompressionCodec>) {
        self.codec = codec;
    }

    /// Encrypt pending data with ZipCrypto when written.
    pub fn set_password(&mut self, password: Option<&[u8]>) {
        self.password = password.map(<[u8]>::to_vec);
    }

    /// Also store the second check byte older tools expect.
    pub fn set_legacy_check(&mut self, legacy: bool) {
        self.legacy_check = legacy;
    }

    /// Local header offset.
    pub fn offset(&self) -> u64 {
        self.header.offset
    }

    /// Set the local header offset.
    pub fn set_offset(&mut self, offset: u64) {
        self.header.offset = offset;
    }

    /// Attach uncompressed content, replacing any previous payload.
    pub fn set_data(&mut self, data: impl Into<Vec<u8>>) {
        let data = data.into();
        if !self.is_directory && !data.is_empty() {
            self.header.size = data.len() as u64;
            self.header.crc32 = crc32(&data);
            self.header.set_method(self.codec.method());
        } else {
            self.header.size = 0;
            self.header.crc32 = 0;
            self.header.set_method(METHOD_STORED);
        }
        self.header.compressed_size = 0;
        self.header.flags &= !FLAG_ENCRYPTED;
        self.payload = Payload::Pending(data);
    }

    fn archive(&self) -> Option<&'a [u8]> {
        match self.payload {
            Payload::Bound(archive) | Payload::Materialized { archive, .. } => Some(archive),
            _ => None,
        }
    }

    /// Decode the local header and return the offset of the entry data.
    fn load_local(&mut self, archive: &[u8]) -> Result<(LocalHeader, u64)> {
        let local = LocalHeader::decode(archive, self.header.offset)?;
        let extra_at = self.header.offset as usize
            + LOCAL_HEADER_LEN
            + local.name_len as usize;
        self.local_extra = read_bytes(archive, extra_at, local.extra_len as usize, 0)?.to_vec();
        Ok((local, self.header.offset + local.total_len()))
    }

    /// Offset where the entry data starts: local header, name and local
    /// extra field skipped.
    pub fn real_data_offset(&self) -> Result<u64> {
        match self.archive() {
            Some(archive) => {
                let local = LocalHeader::decode(archive, self.header.offset)?;
                Ok(self.header.offset + local.total_len())
            }
            None => Ok(self.header.offset
                + LOCAL_HEADER_LEN as u64
                + self.raw_name.len() as u64
                + self.local_extra.len() as u64),
        }
    }

    /// The uncompressed content.
    ///
    /// Pending entries return their attached bytes. Bound entries are
    /// decrypted, decompressed and CRC-checked; the result is cached.
    /// Directories always yield no bytes.
    pub fn get_data(&mut self, password: Option<&[u8]>) -> Result<&[u8]> {
        if let Payload::Bound(archive) = self.payload {
            let data = if self.is_directory {
                Vec::new()
            } else {
                self.decompress(archive, password)?
            };
            self.payload = Payload::Materialized { archive, data };
        }

        match &self.payload {
            Payload::Pending(data) | Payload::Materialized { data, .. } => Ok(data),
            Payload::Unbound | Payload::Bound(_) => Ok(&[]),
        }
    }

    /// Like [`get_data`](Self::get_data), but reports directories as skipped.
    pub fn try_data(&mut self, password: Option<&[u8]>) -> Result<EntryData<'_>> {
        if self.is_directory {
            return Ok(EntryData::Skipped(SkipReason::Directory));
        }
        self.get_data(password).map(EntryData::Data)
    }

    fn decompress(&mut self, archive: &'a [u8], password: Option<&[u8]>) -> Result<Vec<u8>> {
        let (local, data_start) = self.load_local(archive)?;
        let compressed_len = usize::try_from(self.header.compressed_size)
            .map_err(|_| ZipError::unexpected_eof(data_start, usize::MAX))?;
        let compressed = read_bytes(archive, data_start as usize, compressed_len, 0)?;
        if compressed.is_empty() {
            self.verify_crc(&[], &local, archive, data_start)?;
            return Ok(Vec::new());
        }

        let processed: Cow<'_, [u8]> = if self.header.is_encrypted() {
            let password = password.ok_or(ZipError::InvalidPasswordParam)?;
            Cow::Owned(crypto::decrypt(compressed, &self.header, password)?)
        } else {
            Cow::Borrowed(compressed)
        };

        let codec = codec_for(self.header.method())?;
        let data = codec.decompress(&processed, self.header.size)?;
        debug!(
            "decoded {:?}: {} -> {} bytes",
            self.name(),
            compressed.len(),
            data.len()
        );

        let data_end = data_start + self.header.compressed_size;
        self.verify_crc(&data, &local, archive, data_end)?;
        Ok(data)
    }

    fn verify_crc(
        &self,
        data: &[u8],
        local: &LocalHeader,
        archive: &[u8],
        data_end: u64,
    ) -> Result<()> {
        let expected = if self.header.has_data_descriptor() || local.has_data_descriptor() {
            let descriptor = DataDescriptor::locate(archive, data_end)?;
            descriptor.check_against(&self.header)?;
            descriptor.crc32
        } else {
            self.header.crc32
        };

        let computed = crc32(data);
        if computed != expected {
            warn!("CRC mismatch in {:?}", self.name());
            return Err(ZipError::bad_crc(expected, computed));
        }
        Ok(())
    }

    /// The bytes stored after the local header.
    ///
    /// Bound entries return what is on disk. Pending entries are compressed,
    /// encrypted when a password is set, and their compressed size recorded.
    pub fn get_compressed_data(&mut self) -> Result<Vec<u8>> {
        let mut salt = TimeSeededSalt::new();
        self.get_compressed_data_with(&mut salt)
    }

    /// [`get_compressed_data`](Self::get_compressed_data) with an explicit
    /// salt source for encryption.
    pub fn get_compressed_data_with(&mut self, salt: &mut dyn SaltSource) -> Result<Vec<u8>> {
        if let Some(archive) = self.archive() {
            let (_, data_start) = self.load_local(archive)?;
            let len = usize::try_from(self.header.compressed_size)
                .map_err(|_| ZipError::unexpected_eof(data_start, usize::MAX))?;
            return Ok(read_bytes(archive, data_start as usize, len, 0)?.to_vec());
        }

        let data = match &self.payload {
            Payload::Pending(data) if !data.is_empty() && !self.is_directory => data,
            _ => {
                self.header.compressed_size = 0;
                return Ok(Vec::new());
            }
        };

        let codec: Arc<dyn CompressionCodec> = if self.header.method() == METHOD_STORED {
            codec_for(METHOD_STORED)?
        } else {
            Arc::clone(&self.codec)
        };
        let mut compressed = codec.compress(data)?;

        if let Some(password) = &self.password {
            self.header.flags |= FLAG_ENCRYPTED;
            compressed = crypto::encrypt(
                &compressed,
                &self.header,
                password,
                salt,
                self.legacy_check,
            );
        }

        self.header.compressed_size = compressed.len() as u64;
        Ok(compressed)
    }

    /// Local header followed by name and local extra field.
    pub fn pack_local_header(&self) -> Result<Vec<u8>> {
        self.header
            .to_local()
            .encode_with(&self.raw_name, &self.local_extra)
    }

    /// Central header followed by name, extra field and comment.
    ///
    /// A Zip64 record is prepended when a size or the offset overflows and
    /// the extra field does not already carry one.
    pub fn pack_central_header(&self) -> Result<Vec<u8>> {
        let mut extra = self.extra.clone();
        if let Some(zip64) = Zip64Extra::for_header(&self.header) {
            let present = extra_records(&self.extra)?
                .iter()
                .any(|(tag, _)| *tag == ZIP64_EXTRA_FIELD_ID);
            if !present {
                let mut with_zip64 = zip64.encode();
                with_zip64.extend_from_slice(&extra);
                extra = with_zip64;
            }
        }

        CentralRecord {
            header: self.header,
            name: self.raw_name.clone(),
            extra,
            comment: self.comment.clone(),
        }
        .encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::FixedSalt;
    use crate::header::FLAG_DATA_DESCRIPTOR;
    use crate::method::StoredCodec;

    /// Lay out a single-entry archive: local header, data, central header.
    fn single_entry_archive(entry: &mut ZipEntry<'_>) -> (Vec<u8>, u64) {
        let data = entry.get_compressed_data_with(&mut FixedSalt([9; 12])).unwrap();
        entry.set_offset(0);
        let mut archive = entry.pack_local_header().unwrap();
        archive.extend_from_slice(&data);
        let cd_offset = archive.len() as u64;
        archive.extend_from_slice(&entry.pack_central_header().unwrap());
        (archive, cd_offset)
    }

    #[test]
    fn test_default_attr() {
        assert_eq!(default_attr(false, None), 0o100644 << 16);
        assert_eq!(default_attr(true, None), (0o040755 << 16) | 0x10);
        assert_eq!(default_attr(false, Some(0o100755)), 0o100755 << 16);
    }

    #[test]
    fn test_set_name_detects_directory() {
        let mut entry = ZipEntry::new();
        entry.set_name("docs/");
        assert!(entry.is_directory());
        assert_eq!(entry.file_attr(), 0o755);
        assert_eq!(entry.attr() & 0xFF, 0x10);
        assert_eq!(entry.base_name(), "docs");

        entry.set_name("docs\\readme.md");
        assert!(!entry.is_directory());
        assert_eq!(entry.file_attr(), 0o644);
        assert_eq!(entry.header().flags & FLAG_UTF8, FLAG_UTF8);
    }

    #[test]
    fn test_trail_byte_backslash_is_not_a_directory() {
        let decoder = Arc::new(crate::decoder::LegacyDecoder::shift_jis());
        let mut entry = ZipEntry::with_decoder(decoder);
        entry.set_name("表");
        assert_eq!(entry.raw_name(), [0x95, 0x5C]);
        assert!(!entry.is_directory());
        assert_eq!(entry.file_attr(), 0o644);

        entry.set_name("表\\");
        assert!(entry.is_directory());
    }

    #[test]
    fn test_set_data_derives_header() {
        let mut entry = ZipEntry::new();
        entry.set_name("a.txt");
        entry.set_data(b"hello".to_vec());
        assert_eq!(entry.header().size, 5);
        assert_eq!(entry.header().crc32, crc32(b"hello"));
        assert_eq!(entry.header().method(), 8);
        assert_eq!(entry.header().version_needed(), 20);
        assert_eq!(entry.get_data(None).unwrap(), b"hello");
    }

    #[test]
    fn test_set_data_empty_is_stored() {
        let mut entry = ZipEntry::new();
        entry.set_name("empty.txt");
        entry.set_data(Vec::new());
        assert_eq!(entry.header().method(), METHOD_STORED);
        assert_eq!(entry.header().version_needed(), 10);
        assert!(entry.get_compressed_data().unwrap().is_empty());
    }

    #[test]
    fn test_directory_data_is_ignored() {
        let mut entry = ZipEntry::new();
        entry.set_name("dir/");
        entry.set_data(b"ignored".to_vec());
        assert_eq!(entry.header().size, 0);
        assert_eq!(entry.header().method(), METHOD_STORED);
        assert_eq!(
            entry.try_data(None).unwrap(),
            EntryData::Skipped(SkipReason::Directory)
        );
    }

    #[test]
    fn test_comment_limits() {
        let mut entry = ZipEntry::new();
        entry.set_comment("fine").unwrap();
        assert_eq!(entry.comment(), "fine");
        let long = "x".repeat(70_000);
        assert!(matches!(
            entry.set_comment(&long),
            Err(ZipError::CommentTooLong { len: 70_000 })
        ));
    }

    #[test]
    fn test_set_extra_rejects_overrun() {
        let mut entry = ZipEntry::new();
        assert!(entry.set_extra(vec![0x01, 0x00, 0x08, 0x00, 0x00]).is_err());
        entry.set_extra(vec![0x99, 0x99, 0x01, 0x00, 0x00]).unwrap();
        assert_eq!(entry.extra().len(), 5);
    }

    #[test]
    fn test_bound_roundtrip() {
        let body = "bound entry payload ".repeat(50);
        let mut entry = ZipEntry::new();
        entry.set_name("x/y.txt");
        entry.set_data(body.as_bytes().to_vec());
        let (archive, cd_offset) = single_entry_archive(&mut entry);

        let mut bound = ZipEntry::from_central(&archive, cd_offset, Arc::new(Utf8Decoder)).unwrap();
        assert_eq!(bound.name(), "x/y.txt");
        assert_eq!(
            bound.real_data_offset().unwrap(),
            (LOCAL_HEADER_LEN + "x/y.txt".len()) as u64
        );
        assert_eq!(bound.get_data(None).unwrap(), body.as_bytes());
        // Second call is served from the cache.
        assert_eq!(bound.get_data(None).unwrap(), body.as_bytes());
        assert_eq!(
            bound.get_compressed_data().unwrap().len() as u64,
            bound.header().compressed_size
        );
    }

    #[test]
    fn test_encrypted_roundtrip() {
        let mut entry = ZipEntry::new();
        entry.set_name("secret.txt");
        entry.set_password(Some(b"pw"));
        entry.set_data(b"classified".to_vec());
        let (archive, cd_offset) = single_entry_archive(&mut entry);

        let mut bound = ZipEntry::from_central(&archive, cd_offset, Arc::new(Utf8Decoder)).unwrap();
        assert!(bound.header().is_encrypted());
        assert!(matches!(
            bound.get_data(None),
            Err(ZipError::InvalidPasswordParam)
        ));
        assert_eq!(bound.get_data(Some(b"pw")).unwrap(), b"classified");
    }

    #[test]
    fn test_bad_crc() {
        let mut entry = ZipEntry::new();
        entry.set_codec(Arc::new(StoredCodec));
        entry.set_name("f.bin");
        entry.set_data(b"abcdef".to_vec());
        let (mut archive, cd_offset) = single_entry_archive(&mut entry);
        // Flip one stored byte.
        archive[LOCAL_HEADER_LEN + 5] ^= 0xFF;

        let mut bound = ZipEntry::from_central(&archive, cd_offset, Arc::new(Utf8Decoder)).unwrap();
        assert!(matches!(
            bound.get_data(None),
            Err(ZipError::BadCrc { .. })
        ));
    }

    #[test]
    fn test_descriptor_flag_without_descriptor() {
        let mut entry = ZipEntry::new();
        entry.set_name("d.txt");
        entry.set_data(b"descriptor".to_vec());
        entry.header.flags |= FLAG_DATA_DESCRIPTOR;
        let (archive, cd_offset) = single_entry_archive(&mut entry);

        let mut bound = ZipEntry::from_central(&archive, cd_offset, Arc::new(Utf8Decoder)).unwrap();
        assert!(matches!(
            bound.get_data(None),
            Err(ZipError::DescriptorNotExist)
        ));
    }

    #[test]
    fn test_descriptor_verified() {
        let mut entry = ZipEntry::new();
        entry.set_name("d.txt");
        entry.set_data(b"descriptor".to_vec());
        entry.header.flags |= FLAG_DATA_DESCRIPTOR;
        let data = entry.get_compressed_data().unwrap();
        entry.set_offset(0);

        let mut archive = entry.pack_local_header().unwrap();
        archive.extend_from_slice(&data);
        let descriptor = DataDescriptor {
            crc32: entry.header().crc32,
            compressed_size: entry.header().compressed_size as u32,
            size: entry.header().size as u32,
        };
        archive.extend_from_slice(&descriptor.encode());
        let cd_offset = archive.len() as u64;
        archive.extend_from_slice(&entry.pack_central_header().unwrap());

        let mut bound = ZipEntry::from_central(&archive, cd_offset, Arc::new(Utf8Decoder)).unwrap();
        assert_eq!(bound.get_data(None).unwrap(), b"descriptor");
    }

    #[test]
    fn test_unknown_method() {
        let mut entry = ZipEntry::new();
        entry.set_name("m.bin");
        entry.set_codec(Arc::new(StoredCodec));
        entry.set_data(b"payload".to_vec());
        entry.header.set_method(14);
        let (archive, cd_offset) = single_entry_archive(&mut entry);

        let mut bound = ZipEntry::from_central(&archive, cd_offset, Arc::new(Utf8Decoder)).unwrap();
        assert!(matches!(
            bound.get_data(None),
            Err(ZipError::UnknownCompressionMethod { method: 14 })
        ));
    }
}
