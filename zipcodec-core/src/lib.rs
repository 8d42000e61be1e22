//! # zipcodec core
//!
//! Core components shared by the zipcodec archive crate and CLI.
//!
//! - [`crc`]: CRC-32 as used by ZIP and ZipCrypto
//! - [`dostime`]: MS-DOS packed date/time
//! - [`traits`]: Compression codec trait
//! - [`error`]: Error types
//!
//! ## Example
//!
//! ```rust
//! use zipcodec_core::crc::Crc32;
//! use zipcodec_core::dostime::{from_dos_time, to_dos_time};
//!
//! let crc = Crc32::compute(b"Hello, World!");
//! assert_eq!(crc, 0xEC4AC3D0);
//!
//! let when = from_dos_time(0x5862_4F55);
//! assert_eq!(to_dos_time(&when), 0x5862_4F55);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod crc;
pub mod dostime;
pub mod error;
pub mod traits;

// Re-exports for convenience
pub use crc::{Crc32, crc32, crc32_update};
pub use dostime::{from_dos_time, to_dos_time};
pub use error::{Result, ZipError};
pub use traits::{CompressionCodec, METHOD_DEFLATED, METHOD_STORED};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::crc::{Crc32, crc32};
    pub use crate::dostime::{from_dos_time, to_dos_time};
    pub use crate::error::{Result, ZipError};
    pub use crate::traits::CompressionCodec;
}
