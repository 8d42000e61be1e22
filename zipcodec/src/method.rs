//! Compression methods: STORED passthrough and raw DEFLATE.
//!
//! DEFLATE is delegated to `flate2`; this module only binds it to the ZIP
//! method ids and enforces the declared output size on decode.

use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use std::io::{Read, Write};
use std::sync::Arc;
use zipcodec_core::error::{Result, ZipError};
use zipcodec_core::traits::{CompressionCodec, METHOD_DEFLATED, METHOD_STORED};

/// ZIP compression methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    /// Stored (no compression).
    Stored,
    /// Deflate compression.
    Deflate,
    /// Unknown method.
    Unknown(u16),
}

impl CompressionMethod {
    /// Create from a u16 value.
    pub fn from_u16(value: u16) -> Self {
        match value {
            METHOD_STORED => Self::Stored,
            METHOD_DEFLATED => Self::Deflate,
            _ => Self::Unknown(value),
        }
    }

    /// The on-disk method id.
    pub fn to_u16(self) -> u16 {
        match self {
            Self::Stored => METHOD_STORED,
            Self::Deflate => METHOD_DEFLATED,
            Self::Unknown(id) => id,
        }
    }

    /// Short display name.
    pub fn name(self) -> String {
        match self {
            Self::Stored => "Stored".to_string(),
            Self::Deflate => "Deflate".to_string(),
            Self::Unknown(id) => format!("Unknown({id})"),
        }
    }
}

/// ZIP compression level for writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZipCompressionLevel {
    /// Store without compression (method 0).
    Store,
    /// Fast compression (deflate level 1).
    Fast,
    /// Normal compression (deflate level 6).
    #[default]
    Normal,
    /// Best compression (deflate level 9).
    Best,
}

impl ZipCompressionLevel {
    /// The codec that implements this level.
    pub fn codec(self) -> Arc<dyn CompressionCodec> {
        match self {
            Self::Store => Arc::new(StoredCodec),
            Self::Fast => Arc::new(DeflateCodec::new(1)),
            Self::Normal => Arc::new(DeflateCodec::new(6)),
            Self::Best => Arc::new(DeflateCodec::new(9)),
        }
    }
}

/// Method 0: bytes are copied unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoredCodec;

impl CompressionCodec for StoredCodec {
    fn method(&self) -> u16 {
        METHOD_STORED
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn decompress(&self, data: &[u8], expected_size: u64) -> Result<Vec<u8>> {
        let len = if expected_size > 0 {
            data.len().min(usize::try_from(expected_size).unwrap_or(usize::MAX))
        } else {
            data.len()
        };
        Ok(data[..len].to_vec())
    }
}

/// Method 8: raw DEFLATE without zlib framing.
#[derive(Debug, Clone, Copy)]
pub struct DeflateCodec {
    level: u32,
}

impl DeflateCodec {
    /// Create a codec for compression level `level` (0-9).
    pub fn new(level: u32) -> Self {
        Self {
            level: level.min(9),
        }
    }

    /// The configured level.
    pub fn level(&self) -> u32 {
        self.level
    }
}

impl Default for DeflateCodec {
    fn default() -> Self {
        Self::new(6)
    }
}

impl CompressionCodec for DeflateCodec {
    fn method(&self) -> u16 {
        METHOD_DEFLATED
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = DeflateEncoder::new(
            Vec::with_capacity(data.len() / 2 + 64),
            Compression::new(self.level),
        );
        encoder.write_all(data)?;
        Ok(encoder.finish()?)
    }

    fn decompress(&self, data: &[u8], expected_size: u64) -> Result<Vec<u8>> {
        let decoder = DeflateDecoder::new(data);
        let mut out = Vec::new();
        let result = if expected_size > 0 {
            out.reserve(usize::try_from(expected_size).unwrap_or(0).min(64 << 20));
            decoder.take(expected_size).read_to_end(&mut out)
        } else {
            let mut decoder = decoder;
            decoder.read_to_end(&mut out)
        };
        result.map_err(|e| ZipError::corrupted(format!("inflate failed: {e}")))?;
        Ok(out)
    }
}

/// Look up the codec for a method id.
pub fn codec_for(method: u16) -> Result<Arc<dyn CompressionCodec>> {
    match CompressionMethod::from_u16(method) {
        CompressionMethod::Stored => Ok(Arc::new(StoredCodec)),
        CompressionMethod::Deflate => Ok(Arc::new(DeflateCodec::default())),
        CompressionMethod::Unknown(method) => Err(ZipError::UnknownCompressionMethod { method }),
    }
}
