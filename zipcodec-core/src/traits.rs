//! Core traits for compression codecs.
//!
//! ZIP entries pick their codec by the 16-bit method id in the header. The
//! archive crate supplies the concrete STORED and DEFLATE implementations.

use crate::error::Result;

/// ZIP method id for uncompressed data.
pub const METHOD_STORED: u16 = 0;

/// ZIP method id for raw DEFLATE.
pub const METHOD_DEFLATED: u16 = 8;

/// A whole-buffer compression codec bound to one ZIP method id.
pub trait CompressionCodec: Send + Sync + std::fmt::Debug {
    /// The method id written into headers for data produced by this codec.
    fn method(&self) -> u16;

    /// Compress `data`.
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decompress `data`.
    ///
    /// When `expected_size` is non-zero the output is never allowed to grow
    /// past it.
    fn decompress(&self, data: &[u8], expected_size: u64) -> Result<Vec<u8>>;
}
