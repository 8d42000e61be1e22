//! ZIP header structures.
//!
//! Every record is a plain value with an explicit `decode`/`encode` pair.
//! Decoding works on byte slices and bounds-checks each field, so a
//! truncated archive reports [`ZipError::UnexpectedEof`] instead of
//! panicking.

use log::debug;
use zipcodec_core::error::{Result, ZipError};
use zipcodec_core::traits::METHOD_STORED;

/// ZIP local file header signature.
pub const LOCAL_HEADER_SIG: u32 = 0x04034B50;

/// Fixed size of a local file header.
pub const LOCAL_HEADER_LEN: usize = 30;

/// ZIP central directory header signature.
pub const CENTRAL_HEADER_SIG: u32 = 0x02014B50;

/// Fixed size of a central directory header.
pub const CENTRAL_HEADER_LEN: usize = 46;

/// ZIP end of central directory signature.
pub const END_RECORD_SIG: u32 = 0x06054B50;

/// Fixed size of the classic end record, excluding its comment.
pub const END_RECORD_LEN: usize = 22;

/// ZIP64 end of central directory signature.
pub const ZIP64_END_RECORD_SIG: u32 = 0x06064B50;

/// Alternate Zip64 end record signature, accepted when decoding.
pub const ZIP64_END_RECORD_SIG_ALT: u32 = 0x06064B64;

/// Minimum size of a Zip64 end record.
pub const ZIP64_END_RECORD_LEN: usize = 56;

/// ZIP64 end of central directory locator signature.
pub const ZIP64_LOCATOR_SIG: u32 = 0x07064B50;

/// Size of the Zip64 end record locator.
pub const ZIP64_LOCATOR_LEN: usize = 20;

/// Data descriptor signature (optional, PK\x07\x08).
pub const DATA_DESCRIPTOR_SIG: u32 = 0x08074B50;

/// ZIP64 extra field header ID.
pub const ZIP64_EXTRA_FIELD_ID: u16 = 0x0001;

/// Marker value for Zip64 (0xFFFFFFFF for 32-bit fields).
pub const ZIP64_MARKER_32: u32 = 0xFFFF_FFFF;

/// Marker value for Zip64 (0xFFFF for 16-bit fields).
pub const ZIP64_MARKER_16: u16 = 0xFFFF;

/// Flag bit: entry is encrypted.
pub const FLAG_ENCRYPTED: u16 = 0x0001;

/// Flag bit: sizes and CRC follow the data in a descriptor.
pub const FLAG_DATA_DESCRIPTOR: u16 = 0x0008;

/// Flag bit: name and comment are UTF-8.
pub const FLAG_UTF8: u16 = 0x0800;

/// Version made by: Unix host, format version 2.0.
pub const VERSION_MADE_BY: u16 = 0x0314;

pub(crate) fn read_u16(buf: &[u8], at: usize, base: u64) -> Result<u16> {
    buf.get(at..at + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or_else(|| ZipError::unexpected_eof(base + at as u64, 2))
}

pub(crate) fn read_u32(buf: &[u8], at: usize, base: u64) -> Result<u32> {
    buf.get(at..at + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| ZipError::unexpected_eof(base + at as u64, 4))
}

pub(crate) fn read_u64(buf: &[u8], at: usize, base: u64) -> Result<u64> {
    buf.get(at..at + 8)
        .map(|b| u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
        .ok_or_else(|| ZipError::unexpected_eof(base + at as u64, 8))
}

pub(crate) fn read_bytes(buf: &[u8], at: usize, len: usize, base: u64) -> Result<&[u8]> {
    at.checked_add(len)
        .and_then(|end| buf.get(at..end))
        .ok_or_else(|| ZipError::unexpected_eof(base + at as u64, len))
}

/// Clamp a 64-bit value into a 32-bit field, writing the marker on overflow.
fn clamp32(value: u64) -> u32 {
    if value >= u64::from(ZIP64_MARKER_32) {
        ZIP64_MARKER_32
    } else {
        value as u32
    }
}

fn len16(field: &'static str, len: usize) -> Result<u16> {
    u16::try_from(len).map_err(|_| ZipError::zip64_required(field, len as u64))
}

/// ZIP local file header (fixed 30-byte part).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocalHeader {
    /// Minimum version needed to extract.
    pub version_needed: u16,
    /// General purpose bit flag.
    pub flags: u16,
    /// Compression method.
    pub method: u16,
    /// Packed DOS date/time.
    pub time: u32,
    /// CRC-32 of uncompressed data.
    pub crc32: u32,
    /// Compressed size.
    pub compressed_size: u32,
    /// Uncompressed size.
    pub size: u32,
    /// File name length.
    pub name_len: u16,
    /// Extra field length.
    pub extra_len: u16,
}

impl LocalHeader {
    /// Decode the header starting at `offset` in `archive`.
    pub fn decode(archive: &[u8], offset: u64) -> Result<Self> {
        let at = usize::try_from(offset).map_err(|_| ZipError::InvalidLocalHeader { offset })?;
        let buf = archive
            .get(at..)
            .filter(|b| b.len() >= LOCAL_HEADER_LEN)
            .ok_or(ZipError::InvalidLocalHeader { offset })?;
        if read_u32(buf, 0, offset)? != LOCAL_HEADER_SIG {
            return Err(ZipError::InvalidLocalHeader { offset });
        }

        Ok(Self {
            version_needed: read_u16(buf, 4, offset)?,
            flags: read_u16(buf, 6, offset)?,
            method: read_u16(buf, 8, offset)?,
            time: read_u32(buf, 10, offset)?,
            crc32: read_u32(buf, 14, offset)?,
            compressed_size: read_u32(buf, 18, offset)?,
            size: read_u32(buf, 22, offset)?,
            name_len: read_u16(buf, 26, offset)?,
            extra_len: read_u16(buf, 28, offset)?,
        })
    }

    /// Encode the fixed part.
    pub fn encode(&self) -> [u8; LOCAL_HEADER_LEN] {
        let mut buf = [0u8; LOCAL_HEADER_LEN];
        buf[0..4].copy_from_slice(&LOCAL_HEADER_SIG.to_le_bytes());
        buf[4..6].copy_from_slice(&self.version_needed.to_le_bytes());
        buf[6..8].copy_from_slice(&self.flags.to_le_bytes());
        buf[8..10].copy_from_slice(&self.method.to_le_bytes());
        buf[10..14].copy_from_slice(&self.time.to_le_bytes());
        buf[14..18].copy_from_slice(&self.crc32.to_le_bytes());
        buf[18..22].copy_from_slice(&self.compressed_size.to_le_bytes());
        buf[22..26].copy_from_slice(&self.size.to_le_bytes());
        buf[26..28].copy_from_slice(&self.name_len.to_le_bytes());
        buf[28..30].copy_from_slice(&self.extra_len.to_le_bytes());
        buf
    }

    /// Encode the fixed part followed by `name` and `extra`.
    ///
    /// The length fields are taken from the slices.
    pub fn encode_with(&self, name: &[u8], extra: &[u8]) -> Result<Vec<u8>> {
        let header = Self {
            name_len: len16("file name length", name.len())?,
            extra_len: len16("extra field length", extra.len())?,
            ..*self
        };
        let mut out = Vec::with_capacity(LOCAL_HEADER_LEN + name.len() + extra.len());
        out.extend_from_slice(&header.encode());
        out.extend_from_slice(name);
        out.extend_from_slice(extra);
        Ok(out)
    }

    /// Total bytes occupied by the header, name and extra field.
    pub fn total_len(&self) -> u64 {
        LOCAL_HEADER_LEN as u64 + u64::from(self.name_len) + u64::from(self.extra_len)
    }

    /// Whether a data descriptor follows the entry data.
    pub fn has_data_descriptor(&self) -> bool {
        self.flags & FLAG_DATA_DESCRIPTOR != 0
    }
}

/// ZIP central directory header (fixed 46-byte part), with Zip64 values
/// already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CentralHeader {
    /// Version made by.
    pub version_made_by: u16,
    version_needed: u16,
    /// General purpose bit flag.
    pub flags: u16,
    method: u16,
    /// Packed DOS date/time.
    pub time: u32,
    /// CRC-32 of uncompressed data.
    pub crc32: u32,
    /// Compressed size.
    pub compressed_size: u64,
    /// Uncompressed size.
    pub size: u64,
    /// File name length.
    pub name_len: u16,
    /// Extra field length.
    pub extra_len: u16,
    /// File comment length.
    pub comment_len: u16,
    /// Disk number start.
    pub disk_start: u32,
    /// Internal file attributes.
    pub internal_attr: u16,
    /// External file attributes.
    pub external_attr: u32,
    /// Offset of the local header.
    pub offset: u64,
}

impl Default for CentralHeader {
    fn default() -> Self {
        Self {
            version_made_by: VERSION_MADE_BY,
            version_needed: 10,
            flags: FLAG_UTF8,
            method: METHOD_STORED,
            time: 0,
            crc32: 0,
            compressed_size: 0,
            size: 0,
            name_len: 0,
            extra_len: 0,
            comment_len: 0,
            disk_start: 0,
            internal_attr: 0,
            external_attr: 0,
            offset: 0,
        }
    }
}

impl CentralHeader {
    /// Compression method.
    pub fn method(&self) -> u16 {
        self.method
    }

    /// Minimum version needed to extract.
    pub fn version_needed(&self) -> u16 {
        self.version_needed
    }

    /// Set the compression method.
    ///
    /// STORED forces version-needed to 10; every other method forces 20.
    pub fn set_method(&mut self, method: u16) {
        self.version_needed = if method == METHOD_STORED { 10 } else { 20 };
        self.method = method;
    }

    /// Whether the entry is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.flags & FLAG_ENCRYPTED != 0
    }

    /// Whether a data descriptor follows the entry data.
    pub fn has_data_descriptor(&self) -> bool {
        self.flags & FLAG_DATA_DESCRIPTOR != 0
    }

    /// Unix permission bits from the high half of the external attributes.
    pub fn file_attr(&self) -> u32 {
        (self.external_attr >> 16) & 0xFFF
    }

    /// Whether any value needs a Zip64 extra field to be stored.
    pub fn needs_zip64(&self) -> bool {
        self.size >= u64::from(ZIP64_MARKER_32)
            || self.compressed_size >= u64::from(ZIP64_MARKER_32)
            || self.offset >= u64::from(ZIP64_MARKER_32)
            || self.disk_start >= u32::from(ZIP64_MARKER_16)
    }

    /// Build the local header that mirrors this central header.
    pub fn to_local(&self) -> LocalHeader {
        LocalHeader {
            version_needed: self.version_needed,
            flags: self.flags,
            method: self.method,
            time: self.time,
            crc32: self.crc32,
            compressed_size: clamp32(self.compressed_size),
            size: clamp32(self.size),
            name_len: self.name_len,
            extra_len: 0,
        }
    }

    /// Encode the fixed 46-byte part, writing overflow markers where a value
    /// does not fit.
    pub fn encode(&self) -> [u8; CENTRAL_HEADER_LEN] {
        let disk_start = if self.disk_start >= u32::from(ZIP64_MARKER_16) {
            ZIP64_MARKER_16
        } else {
            self.disk_start as u16
        };

        let mut buf = [0u8; CENTRAL_HEADER_LEN];
        buf[0..4].copy_from_slice(&CENTRAL_HEADER_SIG.to_le_bytes());
        buf[4..6].copy_from_slice(&self.version_made_by.to_le_bytes());
        buf[6..8].copy_from_slice(&self.version_needed.to_le_bytes());
        buf[8..10].copy_from_slice(&self.flags.to_le_bytes());
        buf[10..12].copy_from_slice(&self.method.to_le_bytes());
        buf[12..16].copy_from_slice(&self.time.to_le_bytes());
        buf[16..20].copy_from_slice(&self.crc32.to_le_bytes());
        buf[20..24].copy_from_slice(&clamp32(self.compressed_size).to_le_bytes());
        buf[24..28].copy_from_slice(&clamp32(self.size).to_le_bytes());
        buf[28..30].copy_from_slice(&self.name_len.to_le_bytes());
        buf[30..32].copy_from_slice(&self.extra_len.to_le_bytes());
        buf[32..34].copy_from_slice(&self.comment_len.to_le_bytes());
        buf[34..36].copy_from_slice(&disk_start.to_le_bytes());
        buf[36..38].copy_from_slice(&self.internal_attr.to_le_bytes());
        buf[38..42].copy_from_slice(&self.external_attr.to_le_bytes());
        buf[42..46].copy_from_slice(&clamp32(self.offset).to_le_bytes());
        buf
    }

    /// Decode the fixed part at `offset`, leaving overflow markers in place.
    fn decode_raw(archive: &[u8], offset: u64) -> Result<Self> {
        let at = usize::try_from(offset).map_err(|_| ZipError::InvalidCentralHeader { offset })?;
        let buf = archive
            .get(at..)
            .filter(|b| b.len() >= CENTRAL_HEADER_LEN)
            .ok_or(ZipError::InvalidCentralHeader { offset })?;
        if read_u32(buf, 0, offset)? != CENTRAL_HEADER_SIG {
            return Err(ZipError::InvalidCentralHeader { offset });
        }

        Ok(Self {
            version_made_by: read_u16(buf, 4, offset)?,
            version_needed: read_u16(buf, 6, offset)?,
            flags: read_u16(buf, 8, offset)?,
            method: read_u16(buf, 10, offset)?,
            time: read_u32(buf, 12, offset)?,
            crc32: read_u32(buf, 16, offset)?,
            compressed_size: u64::from(read_u32(buf, 20, offset)?),
            size: u64::from(read_u32(buf, 24, offset)?),
            name_len: read_u16(buf, 28, offset)?,
            extra_len: read_u16(buf, 30, offset)?,
            comment_len: read_u16(buf, 32, offset)?,
            disk_start: u32::from(read_u16(buf, 34, offset)?),
            internal_attr: read_u16(buf, 36, offset)?,
            external_attr: read_u32(buf, 38, offset)?,
            offset: u64::from(read_u32(buf, 42, offset)?),
        })
    }
}

/// Iterate the tag/length/value records of an extra field blob.
///
/// Fewer than four trailing bytes are treated as padding.
pub fn extra_records(extra: &[u8]) -> Result<Vec<(u16, &[u8])>> {
    let mut records = Vec::new();
    let mut pos = 0usize;
    while pos + 4 <= extra.len() {
        let tag = u16::from_le_bytes([extra[pos], extra[pos + 1]]);
        let len = u16::from_le_bytes([extra[pos + 2], extra[pos + 3]]) as usize;
        pos += 4;
        let data = extra.get(pos..pos + len).ok_or_else(|| {
            ZipError::extra_field(format!(
                "record {tag:#06x} declares {len} bytes but only {} remain",
                extra.len() - pos
            ))
        })?;
        records.push((tag, data));
        pos += len;
    }
    Ok(records)
}

/// Zip64 extended information extra field.
///
/// Each value is present only when the matching central field holds the
/// overflow marker, in the order size, compressed size, offset, disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Zip64Extra {
    /// Uncompressed size.
    pub size: Option<u64>,
    /// Compressed size.
    pub compressed_size: Option<u64>,
    /// Local header offset.
    pub offset: Option<u64>,
    /// Disk number start.
    pub disk_start: Option<u32>,
}

impl Zip64Extra {
    /// Build the record needed for `header`, if any.
    pub fn for_header(header: &CentralHeader) -> Option<Self> {
        if !header.needs_zip64() {
            return None;
        }
        let big = |v: u64| (v >= u64::from(ZIP64_MARKER_32)).then_some(v);
        Some(Self {
            size: big(header.size),
            compressed_size: big(header.compressed_size),
            offset: big(header.offset),
            disk_start: (header.disk_start >= u32::from(ZIP64_MARKER_16))
                .then_some(header.disk_start),
        })
    }

    /// Parse the Zip64 record body for a header whose raw fields are given.
    fn parse(data: &[u8], raw: &CentralHeader) -> Result<Self> {
        let mut pos = 0usize;
        let mut next64 = |wanted: bool| -> Result<Option<u64>> {
            if !wanted {
                return Ok(None);
            }
            let v = read_u64(data, pos, 0)
                .map_err(|_| ZipError::extra_field("Zip64 record is too short"))?;
            pos += 8;
            Ok(Some(v))
        };

        let size = next64(raw.size == u64::from(ZIP64_MARKER_32))?;
        let compressed_size = next64(raw.compressed_size == u64::from(ZIP64_MARKER_32))?;
        let offset = next64(raw.offset == u64::from(ZIP64_MARKER_32))?;
        let disk_start = if raw.disk_start == u32::from(ZIP64_MARKER_16) {
            Some(
                read_u32(data, pos, 0)
                    .map_err(|_| ZipError::extra_field("Zip64 record is too short"))?,
            )
        } else {
            None
        };

        Ok(Self {
            size,
            compressed_size,
            offset,
            disk_start,
        })
    }

    /// Encode as a complete tag/length/value record.
    pub fn encode(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(28);
        for value in [self.size, self.compressed_size, self.offset].into_iter().flatten() {
            body.extend_from_slice(&value.to_le_bytes());
        }
        if let Some(disk) = self.disk_start {
            body.extend_from_slice(&disk.to_le_bytes());
        }

        let mut out = Vec::with_capacity(4 + body.len());
        out.extend_from_slice(&ZIP64_EXTRA_FIELD_ID.to_le_bytes());
        out.extend_from_slice(&(body.len() as u16).to_le_bytes());
        out.extend_from_slice(&body);
        out
    }
}

/// Substitute Zip64 values from `extra` into a header that still carries
/// overflow markers.
pub fn resolve_zip64(header: &mut CentralHeader, extra: &[u8]) -> Result<()> {
    let marked = header.size == u64::from(ZIP64_MARKER_32)
        || header.compressed_size == u64::from(ZIP64_MARKER_32)
        || header.offset == u64::from(ZIP64_MARKER_32)
        || header.disk_start == u32::from(ZIP64_MARKER_16);

    let records = extra_records(extra)?;
    let Some((_, data)) = records.iter().find(|(tag, _)| *tag == ZIP64_EXTRA_FIELD_ID) else {
        if marked {
            return Err(ZipError::extra_field(
                "overflow marker without a Zip64 extra field",
            ));
        }
        return Ok(());
    };

    let zip64 = Zip64Extra::parse(data, header)?;
    if let Some(v) = zip64.size {
        header.size = v;
    }
    if let Some(v) = zip64.compressed_size {
        header.compressed_size = v;
    }
    if let Some(v) = zip64.offset {
        header.offset = v;
    }
    if let Some(v) = zip64.disk_start {
        header.disk_start = v;
    }
    Ok(())
}

/// A central directory block: fixed header plus name, extra and comment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CentralRecord {
    /// Fixed header with Zip64 values resolved.
    pub header: CentralHeader,
    /// Raw file name bytes.
    pub name: Vec<u8>,
    /// Extra field blob.
    pub extra: Vec<u8>,
    /// Raw comment bytes.
    pub comment: Vec<u8>,
}

impl CentralRecord {
    /// Decode the central directory block at `offset`.
    pub fn decode(archive: &[u8], offset: u64) -> Result<Self> {
        let mut header = CentralHeader::decode_raw(archive, offset)?;
        let at = offset as usize + CENTRAL_HEADER_LEN;
        let name_len = header.name_len as usize;
        let extra_len = header.extra_len as usize;
        let comment_len = header.comment_len as usize;

        let name = read_bytes(archive, at, name_len, 0)?.to_vec();
        let extra = read_bytes(archive, at + name_len, extra_len, 0)?.to_vec();
        let comment = read_bytes(archive, at + name_len + extra_len, comment_len, 0)?.to_vec();

        resolve_zip64(&mut header, &extra)?;
        debug!(
            "central header at {}: method {}, {} -> {} bytes, local offset {}",
            offset,
            header.method,
            header.compressed_size,
            header.size,
            header.offset
        );

        Ok(Self {
            header,
            name,
            extra,
            comment,
        })
    }

    /// Encode the fixed header followed by name, extra and comment.
    ///
    /// The length fields are taken from the vectors.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let header = CentralHeader {
            name_len: len16("file name length", self.name.len())?,
            extra_len: len16("extra field length", self.extra.len())?,
            comment_len: u16::try_from(self.comment.len()).map_err(|_| {
                ZipError::CommentTooLong {
                    len: self.comment.len(),
                }
            })?,
            ..self.header
        };

        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&header.encode());
        out.extend_from_slice(&self.name);
        out.extend_from_slice(&self.extra);
        out.extend_from_slice(&self.comment);
        Ok(out)
    }

    /// Number of bytes [`encode`](Self::encode) produces.
    pub fn encoded_len(&self) -> usize {
        CENTRAL_HEADER_LEN + self.name.len() + self.extra.len() + self.comment.len()
    }
}

/// End of central directory record, classic or Zip64.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EndOfCentralDirectory {
    /// Entries on this disk.
    pub disk_entries: u64,
    /// Total entries.
    pub total_entries: u64,
    /// Size of the central directory in bytes.
    pub size: u64,
    /// Offset of the first central directory header.
    pub offset: u64,
    /// Archive comment (classic form only).
    pub comment: Vec<u8>,
    /// Whether this is the 56-byte Zip64 form.
    pub zip64: bool,
}

impl EndOfCentralDirectory {
    /// Decode a classic or Zip64 end record at the start of `buf`.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let sig = read_u32(buf, 0, 0)
            .map_err(|_| ZipError::invalid_end_record("record is shorter than its signature"))?;

        match sig {
            END_RECORD_SIG => {
                if buf.len() < END_RECORD_LEN {
                    return Err(ZipError::invalid_end_record("classic record is truncated"));
                }
                let comment_len = read_u16(buf, 20, 0)? as usize;
                // Tolerate a comment that runs past the end of the file.
                let end = (END_RECORD_LEN + comment_len).min(buf.len());
                Ok(Self {
                    disk_entries: u64::from(read_u16(buf, 8, 0)?),
                    total_entries: u64::from(read_u16(buf, 10, 0)?),
                    size: u64::from(read_u32(buf, 12, 0)?),
                    offset: u64::from(read_u32(buf, 16, 0)?),
                    comment: buf[END_RECORD_LEN..end].to_vec(),
                    zip64: false,
                })
            }
            ZIP64_END_RECORD_SIG | ZIP64_END_RECORD_SIG_ALT => {
                if buf.len() < ZIP64_END_RECORD_LEN {
                    return Err(ZipError::invalid_end_record("Zip64 record is truncated"));
                }
                Ok(Self {
                    disk_entries: read_u64(buf, 24, 0)?,
                    total_entries: read_u64(buf, 32, 0)?,
                    size: read_u64(buf, 40, 0)?,
                    offset: read_u64(buf, 48, 0)?,
                    comment: Vec::new(),
                    zip64: true,
                })
            }
            other => Err(ZipError::invalid_end_record(format!(
                "unexpected signature {other:#010x}"
            ))),
        }
    }

    /// Encode the record.
    ///
    /// The classic form fails with [`ZipError::Zip64Required`] when a count,
    /// size or offset overflows its field.
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.zip64 {
            let mut out = Vec::with_capacity(ZIP64_END_RECORD_LEN);
            out.extend_from_slice(&ZIP64_END_RECORD_SIG.to_le_bytes());
            out.extend_from_slice(&((ZIP64_END_RECORD_LEN - 12) as u64).to_le_bytes());
            out.extend_from_slice(&VERSION_MADE_BY.to_le_bytes());
            out.extend_from_slice(&45u16.to_le_bytes());
            out.extend_from_slice(&0u32.to_le_bytes());
            out.extend_from_slice(&0u32.to_le_bytes());
            out.extend_from_slice(&self.disk_entries.to_le_bytes());
            out.extend_from_slice(&self.total_entries.to_le_bytes());
            out.extend_from_slice(&self.size.to_le_bytes());
            out.extend_from_slice(&self.offset.to_le_bytes());
            return Ok(out);
        }

        let count16 = |field: &'static str, v: u64| {
            u16::try_from(v)
                .ok()
                .filter(|&c| c != ZIP64_MARKER_16)
                .ok_or_else(|| ZipError::zip64_required(field, v))
        };
        let value32 = |field: &'static str, v: u64| {
            u32::try_from(v)
                .ok()
                .filter(|&c| c != ZIP64_MARKER_32)
                .ok_or_else(|| ZipError::zip64_required(field, v))
        };
        let comment_len = u16::try_from(self.comment.len()).map_err(|_| {
            ZipError::CommentTooLong {
                len: self.comment.len(),
            }
        })?;

        let mut out = Vec::with_capacity(END_RECORD_LEN + self.comment.len());
        out.extend_from_slice(&END_RECORD_SIG.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&count16("entries on disk", self.disk_entries)?.to_le_bytes());
        out.extend_from_slice(&count16("total entries", self.total_entries)?.to_le_bytes());
        out.extend_from_slice(&value32("central directory size", self.size)?.to_le_bytes());
        out.extend_from_slice(&value32("central directory offset", self.offset)?.to_le_bytes());
        out.extend_from_slice(&comment_len.to_le_bytes());
        out.extend_from_slice(&self.comment);
        Ok(out)
    }
}

/// Zip64 end of central directory locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zip64Locator {
    /// Disk holding the Zip64 end record.
    pub disk: u32,
    /// Offset of the Zip64 end record.
    pub end_record_offset: u64,
    /// Total number of disks.
    pub total_disks: u32,
}

impl Zip64Locator {
    /// Decode a locator, returning `None` when the signature is absent.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < ZIP64_LOCATOR_LEN || read_u32(buf, 0, 0).ok()? != ZIP64_LOCATOR_SIG {
            return None;
        }
        Some(Self {
            disk: read_u32(buf, 4, 0).ok()?,
            end_record_offset: read_u64(buf, 8, 0).ok()?,
            total_disks: read_u32(buf, 16, 0).ok()?,
        })
    }

    /// Encode the locator.
    pub fn encode(&self) -> [u8; ZIP64_LOCATOR_LEN] {
        let mut buf = [0u8; ZIP64_LOCATOR_LEN];
        buf[0..4].copy_from_slice(&ZIP64_LOCATOR_SIG.to_le_bytes());
        buf[4..8].copy_from_slice(&self.disk.to_le_bytes());
        buf[8..16].copy_from_slice(&self.end_record_offset.to_le_bytes());
        buf[16..20].copy_from_slice(&self.total_disks.to_le_bytes());
        buf
    }
}

/// Data descriptor trailing an entry whose flag bit 3 is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataDescriptor {
    /// CRC-32 of uncompressed data.
    pub crc32: u32,
    /// Compressed size.
    pub compressed_size: u32,
    /// Uncompressed size.
    pub size: u32,
}

impl DataDescriptor {
    /// Locate and decode the descriptor that starts at `data_end`.
    ///
    /// A signed descriptor is recognized by its `PK\x07\x08` marker. An
    /// unsigned one is accepted when the next record's `PK` starts 12 bytes
    /// later. A local or central signature right at `data_end` means the
    /// descriptor is missing.
    pub fn locate(archive: &[u8], data_end: u64) -> Result<Self> {
        let at = usize::try_from(data_end).map_err(|_| ZipError::DescriptorUnknown)?;
        let sig = read_u32(archive, at, 0).map_err(|_| ZipError::DescriptorUnknown)?;

        if sig == LOCAL_HEADER_SIG || sig == CENTRAL_HEADER_SIG {
            return Err(ZipError::DescriptorNotExist);
        }

        let fields_at = if sig == DATA_DESCRIPTOR_SIG {
            at + 4
        } else if read_u16(archive, at + 12, 0).ok() == Some(0x4B50) {
            log::warn!("unsigned data descriptor at offset {data_end}");
            at
        } else {
            return Err(ZipError::DescriptorUnknown);
        };

        let field = |off: usize| {
            read_u32(archive, fields_at + off, 0).map_err(|_| ZipError::DescriptorUnknown)
        };
        Ok(Self {
            crc32: field(0)?,
            compressed_size: field(4)?,
            size: field(8)?,
        })
    }

    /// Encode with the optional signature.
    pub fn encode(&self) -> [u8; 16] {
        let mut buf = [0u8; 16];
        buf[0..4].copy_from_slice(&DATA_DESCRIPTOR_SIG.to_le_bytes());
        buf[4..8].copy_from_slice(&self.crc32.to_le_bytes());
        buf[8..12].copy_from_slice(&self.compressed_size.to_le_bytes());
        buf[12..16].copy_from_slice(&self.size.to_le_bytes());
        buf
    }

    /// Check the descriptor against the central directory values.
    pub fn check_against(&self, header: &CentralHeader) -> Result<()> {
        if u64::from(self.compressed_size) != header.compressed_size {
            return Err(ZipError::descriptor_faulty("compressed size differs"));
        }
        if u64::from(self.size) != header.size {
            return Err(ZipError::descriptor_faulty("size differs"));
        }
        if self.crc32 != header.crc32 {
            return Err(ZipError::descriptor_faulty("CRC-32 differs"));
        }
        Ok(())
    }
}
