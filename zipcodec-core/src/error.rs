//! Error types for zipcodec operations.
//!
//! Every failure the codec can report is a variant of [`ZipError`]. Parsing
//! is bounds-checked, so malformed or truncated archives surface as errors
//! rather than panics.

use std::io;
use thiserror::Error;

/// The main error type for zipcodec operations.
#[derive(Debug, Error)]
pub enum ZipError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Local file header signature did not match.
    #[error("Invalid local file header at offset {offset}")]
    InvalidLocalHeader {
        /// Byte offset where the header was expected.
        offset: u64,
    },

    /// Central directory header signature did not match.
    #[error("Invalid central directory header at offset {offset}")]
    InvalidCentralHeader {
        /// Byte offset where the header was expected.
        offset: u64,
    },

    /// End of central directory record is missing or malformed.
    #[error("Invalid end of central directory record: {message}")]
    InvalidEndRecord {
        /// Description of the problem.
        message: String,
    },

    /// The ZipCrypto verification byte did not match.
    #[error("Wrong password")]
    WrongPassword,

    /// CRC-32 of the decoded payload does not match the recorded value.
    #[error("Bad CRC: expected {expected:#010x}, computed {computed:#010x}")]
    BadCrc {
        /// Expected CRC value from the archive.
        expected: u32,
        /// CRC value computed over the decoded data.
        computed: u32,
    },

    /// Flag bit 3 is set but the next record directly follows the data.
    #[error("Data descriptor does not exist")]
    DescriptorNotExist,

    /// Flag bit 3 is set but no descriptor layout could be recognized.
    #[error("Data descriptor has an unknown layout")]
    DescriptorUnknown,

    /// Descriptor values disagree with the central directory.
    #[error("Data descriptor is faulty: {message}")]
    DescriptorFaulty {
        /// Which field disagreed.
        message: String,
    },

    /// Compression method other than STORED or DEFLATE.
    #[error("Unknown compression method: {method}")]
    UnknownCompressionMethod {
        /// Method identifier from the header.
        method: u16,
    },

    /// Extra field records could not be parsed.
    #[error("Extra field parse error: {message}")]
    ExtraFieldParseError {
        /// Description of the parse failure.
        message: String,
    },

    /// Entry comment longer than a 16-bit length field can hold.
    #[error("Comment too long: {len} bytes (max 65535)")]
    CommentTooLong {
        /// Length of the rejected comment.
        len: usize,
    },

    /// An encrypted entry was read without a password.
    #[error("Encrypted entry requires a password")]
    InvalidPasswordParam,

    /// A structure extends past the end of the available bytes.
    #[error("Unexpected end of data at offset {offset}: need {needed} more bytes")]
    UnexpectedEof {
        /// Byte offset where the read started.
        offset: u64,
        /// Number of bytes that were needed.
        needed: usize,
    },

    /// Compressed stream could not be decoded.
    #[error("Corrupted data: {message}")]
    CorruptedData {
        /// Description of the corruption.
        message: String,
    },

    /// A value does not fit in a classic 32-bit (or 16-bit) field.
    #[error("{field} value {value} requires Zip64, which the writer does not emit")]
    Zip64Required {
        /// Name of the overflowing field.
        field: &'static str,
        /// The overflowing value.
        value: u64,
    },

    /// Entry not found in archive.
    #[error("Entry not found: {name}")]
    EntryNotFound {
        /// Name of the missing entry.
        name: String,
    },

    /// An input name that normalizes to nothing.
    #[error("Invalid entry name: {name:?}")]
    InvalidEntryName {
        /// The name as supplied.
        name: String,
    },
}

/// Result type alias for zipcodec operations.
pub type Result<T> = std::result::Result<T, ZipError>;

impl ZipError {
    /// Create an invalid end record error.
    pub fn invalid_end_record(message: impl Into<String>) -> Self {
        Self::InvalidEndRecord {
            message: message.into(),
        }
    }

    /// Create a bad CRC error.
    pub fn bad_crc(expected: u32, computed: u32) -> Self {
        Self::BadCrc { expected, computed }
    }

    /// Create a faulty descriptor error.
    pub fn descriptor_faulty(message: impl Into<String>) -> Self {
        Self::DescriptorFaulty {
            message: message.into(),
        }
    }

    /// Create an extra field parse error.
    pub fn extra_field(message: impl Into<String>) -> Self {
        Self::ExtraFieldParseError {
            message: message.into(),
        }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(offset: u64, needed: usize) -> Self {
        Self::UnexpectedEof { offset, needed }
    }

    /// Create a corrupted data error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::CorruptedData {
            message: message.into(),
        }
    }

    /// Create a Zip64-required error.
    pub fn zip64_required(field: &'static str, value: u64) -> Self {
        Self::Zip64Required { field, value }
    }

    /// Create an entry not found error.
    pub fn entry_not_found(name: impl Into<String>) -> Self {
        Self::EntryNotFound { name: name.into() }
    }
}
