//! Text codecs for entry names and comments.
//!
//! Names are raw bytes on disk. Flag bit 11 marks them as UTF-8; without it
//! readers fall back to whatever legacy code page the archive came from.

use encoding_rs::{Encoding, IBM866, SHIFT_JIS};
use std::fmt::Debug;

/// Converts between entry text and its on-disk bytes.
pub trait TextDecoder: Send + Sync + Debug {
    /// Decode raw name or comment bytes.
    fn decode(&self, bytes: &[u8]) -> String;

    /// Encode text for storage.
    fn encode(&self, text: &str) -> Vec<u8>;

    /// Whether entries written with this codec should set the UTF-8 flag.
    fn efs(&self, _name: &str) -> bool {
        false
    }
}

/// UTF-8 names with the language-encoding flag set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Decoder;

impl TextDecoder for Utf8Decoder {
    fn decode(&self, bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    fn encode(&self, text: &str) -> Vec<u8> {
        text.as_bytes().to_vec()
    }

    fn efs(&self, _name: &str) -> bool {
        true
    }
}

/// A legacy single- or multi-byte code page backed by `encoding_rs`.
#[derive(Debug, Clone, Copy)]
pub struct LegacyDecoder {
    encoding: &'static Encoding,
}

impl LegacyDecoder {
    /// Use an explicit encoding.
    pub fn new(encoding: &'static Encoding) -> Self {
        Self { encoding }
    }

    /// Look up an encoding by WHATWG label, such as `"shift_jis"`.
    pub fn for_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.as_bytes()).map(Self::new)
    }

    /// Shift_JIS, common in archives produced on Japanese systems.
    pub fn shift_jis() -> Self {
        Self::new(SHIFT_JIS)
    }

    /// IBM866, the closest `encoding_rs` offers to the DOS code pages.
    pub fn cp866() -> Self {
        Self::new(IBM866)
    }

    /// Name of the underlying encoding.
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }
}

impl TextDecoder for LegacyDecoder {
    fn decode(&self, bytes: &[u8]) -> String {
        let (decoded, _) = self.encoding.decode_without_bom_handling(bytes);
        decoded.into_owned()
    }

    fn encode(&self, text: &str) -> Vec<u8> {
        let (encoded, _, _) = self.encoding.encode(text);
        encoded.into_owned()
    }
}
