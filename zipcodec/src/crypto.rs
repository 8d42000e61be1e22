//! The traditional PKWARE stream cipher ("ZipCrypto").
//!
//! Three 32-bit keys are stirred by every plaintext byte; the keystream is
//! derived from the third. The scheme falls to known-plaintext attacks and
//! is only here to read and write archives that already rely on it.
//!
//! ## Layout
//!
//! An encrypted payload is a 12-byte salt followed by the ciphertext. The
//! last salt byte is a check byte: the high byte of the CRC-32, or the high
//! byte of the DOS time when the entry streams its sizes in a data
//! descriptor.
//!
//! ## Example
//!
//! ```rust
//! use zipcodec::crypto::{FixedSalt, decrypt, encrypt};
//! use zipcodec::header::CentralHeader;
//!
//! let mut header = CentralHeader::default();
//! header.crc32 = 0xA1B2_C3D4;
//!
//! let sealed = encrypt(b"payload", &header, b"secret", &mut FixedSalt::default(), false);
//! assert_eq!(sealed.len(), 7 + 12);
//! assert_eq!(decrypt(&sealed, &header, b"secret").unwrap(), b"payload");
//! ```

use crate::header::CentralHeader;
use log::warn;
use std::time::{SystemTime, UNIX_EPOCH};
use zipcodec_core::crc::crc32_update;
use zipcodec_core::error::{Result, ZipError};

/// Key state before any password byte is mixed in.
const INITIAL_KEYS: [u32; 3] = [0x1234_5678, 0x2345_6789, 0x3456_7890];

/// Multiplier of the key1 linear congruential step.
const KEY1_MULTIPLIER: u32 = 0x0808_8405;

/// Salt bytes in front of every encrypted payload.
pub const ENCRYPTION_HEADER_SIZE: usize = 12;

/// ZipCrypto cipher state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipCrypto {
    keys: [u32; 3],
}

impl ZipCrypto {
    /// Key the cipher with `password`.
    #[must_use]
    pub fn new(password: &[u8]) -> Self {
        password.iter().fold(Self::default(), |mut cipher, &b| {
            cipher.mix(b);
            cipher
        })
    }

    fn mix(&mut self, plain: u8) {
        let [k0, k1, k2] = &mut self.keys;
        *k0 = crc32_update(*k0, plain);
        *k1 = k1
            .wrapping_add(*k0 & 0xFF)
            .wrapping_mul(KEY1_MULTIPLIER)
            .wrapping_add(1);
        *k2 = crc32_update(*k2, (*k1 >> 24) as u8);
    }

    fn keystream(&self) -> u8 {
        let t = (self.keys[2] | 2) as u16;
        (t.wrapping_mul(t ^ 1) >> 8) as u8
    }

    /// Encrypt one byte.
    pub fn encrypt_byte(&mut self, plain: u8) -> u8 {
        let out = plain ^ self.keystream();
        self.mix(plain);
        out
    }

    /// Decrypt one byte.
    pub fn decrypt_byte(&mut self, cipher: u8) -> u8 {
        let plain = cipher ^ self.keystream();
        self.mix(plain);
        plain
    }

    /// Encrypt `buffer` in place.
    pub fn encrypt_buffer(&mut self, buffer: &mut [u8]) {
        buffer.iter_mut().for_each(|b| *b = self.encrypt_byte(*b));
    }

    /// Decrypt `buffer` in place.
    pub fn decrypt_buffer(&mut self, buffer: &mut [u8]) {
        buffer.iter_mut().for_each(|b| *b = self.decrypt_byte(*b));
    }

    /// Current keys as `(key0, key1, key2)`.
    #[must_use]
    pub fn keys(&self) -> (u32, u32, u32) {
        let [k0, k1, k2] = self.keys;
        (k0, k1, k2)
    }
}

impl Default for ZipCrypto {
    fn default() -> Self {
        Self { keys: INITIAL_KEYS }
    }
}

/// Source of the 12 salt bytes that prefix an encrypted payload.
pub trait SaltSource: Send + std::fmt::Debug {
    /// Fill `salt` with fresh bytes.
    fn fill(&mut self, salt: &mut [u8; ENCRYPTION_HEADER_SIZE]);
}

/// Clock-seeded xorshift64 salt generator.
#[derive(Debug, Clone)]
pub struct TimeSeededSalt {
    state: u64,
}

impl TimeSeededSalt {
    /// Seed from the current time.
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::with_seed(seed)
    }

    /// Seed explicitly. A zero seed is replaced, since xorshift would stall.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }
}

impl Default for TimeSeededSalt {
    fn default() -> Self {
        Self::new()
    }
}

impl SaltSource for TimeSeededSalt {
    fn fill(&mut self, salt: &mut [u8; ENCRYPTION_HEADER_SIZE]) {
        for byte in salt.iter_mut() {
            self.state ^= self.state << 13;
            self.state ^= self.state >> 7;
            self.state ^= self.state << 17;
            *byte = (self.state >> 32) as u8;
        }
    }
}

/// Salt that repeats the same bytes every time, for reproducible output.
#[derive(Debug, Clone, Default)]
pub struct FixedSalt(pub [u8; ENCRYPTION_HEADER_SIZE]);

impl SaltSource for FixedSalt {
    fn fill(&mut self, salt: &mut [u8; ENCRYPTION_HEADER_SIZE]) {
        *salt = self.0;
    }
}

/// The byte stored in the last salt position.
pub fn check_byte(header: &CentralHeader) -> u8 {
    if header.has_data_descriptor() {
        (header.time >> 8) as u8
    } else {
        (header.crc32 >> 24) as u8
    }
}

/// The byte older tools also stored in the second-to-last salt position.
pub fn legacy_check_byte(header: &CentralHeader) -> u8 {
    if header.has_data_descriptor() {
        header.time as u8
    } else {
        (header.crc32 >> 16) as u8
    }
}

/// Decrypt a salted payload, verifying the check byte.
pub fn decrypt(data: &[u8], header: &CentralHeader, password: &[u8]) -> Result<Vec<u8>> {
    if data.len() < ENCRYPTION_HEADER_SIZE {
        return Err(ZipError::unexpected_eof(
            data.len() as u64,
            ENCRYPTION_HEADER_SIZE - data.len(),
        ));
    }

    let mut cipher = ZipCrypto::new(password);
    let mut salt = [0u8; ENCRYPTION_HEADER_SIZE];
    salt.copy_from_slice(&data[..ENCRYPTION_HEADER_SIZE]);
    cipher.decrypt_buffer(&mut salt);

    let expected = check_byte(header);
    if salt[ENCRYPTION_HEADER_SIZE - 1] != expected {
        warn!(
            "password check failed: expected {:#04x}, got {:#04x}",
            expected,
            salt[ENCRYPTION_HEADER_SIZE - 1]
        );
        return Err(ZipError::WrongPassword);
    }

    let mut plain = data[ENCRYPTION_HEADER_SIZE..].to_vec();
    cipher.decrypt_buffer(&mut plain);
    Ok(plain)
}

/// Encrypt a payload, returning salt followed by ciphertext.
///
/// With `legacy` set, the second-to-last salt byte also carries a check
/// value, as pre-2.04g PKZIP expected.
pub fn encrypt(
    data: &[u8],
    header: &CentralHeader,
    password: &[u8],
    salt_source: &mut dyn SaltSource,
    legacy: bool,
) -> Vec<u8> {
    let mut salt = [0u8; ENCRYPTION_HEADER_SIZE];
    salt_source.fill(&mut salt);
    salt[ENCRYPTION_HEADER_SIZE - 1] = check_byte(header);
    if legacy {
        salt[ENCRYPTION_HEADER_SIZE - 2] = legacy_check_byte(header);
    }

    let mut out = Vec::with_capacity(ENCRYPTION_HEADER_SIZE + data.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(data);

    let mut cipher = ZipCrypto::new(password);
    cipher.encrypt_buffer(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::FLAG_DATA_DESCRIPTOR;

    fn header_with_crc(crc: u32) -> CentralHeader {
        let mut header = CentralHeader::default();
        header.crc32 = crc;
        header.time = 0x5862_4F55;
        header
    }

    #[test]
    fn test_initial_keys() {
        assert_eq!(
            ZipCrypto::new(b"").keys(),
            (0x12345678, 0x23456789, 0x34567890)
        );
        assert_ne!(ZipCrypto::new(b"pw").keys(), ZipCrypto::new(b"").keys());
    }

    #[test]
    fn test_byte_roundtrip() {
        let plaintext = b"The quick brown fox jumps over the lazy dog";
        let mut buffer = plaintext.to_vec();
        ZipCrypto::new(b"secret").encrypt_buffer(&mut buffer);
        assert_ne!(&buffer[..], &plaintext[..]);
        ZipCrypto::new(b"secret").decrypt_buffer(&mut buffer);
        assert_eq!(&buffer[..], &plaintext[..]);
    }

    #[test]
    fn test_salted_roundtrip() {
        let header = header_with_crc(0xCBF43926);
        let sealed = encrypt(
            b"123456789",
            &header,
            b"pw",
            &mut TimeSeededSalt::with_seed(7),
            false,
        );
        assert_eq!(sealed.len(), 9 + ENCRYPTION_HEADER_SIZE);
        assert_eq!(decrypt(&sealed, &header, b"pw").unwrap(), b"123456789");
    }

    #[test]
    fn test_empty_payload() {
        let header = header_with_crc(0);
        let sealed = encrypt(b"", &header, b"pw", &mut FixedSalt::default(), false);
        assert_eq!(sealed.len(), ENCRYPTION_HEADER_SIZE);
        assert!(decrypt(&sealed, &header, b"pw").unwrap().is_empty());
    }

    #[test]
    fn test_fixed_salt_is_deterministic() {
        let header = header_with_crc(0x1234_5678);
        let mut salt = FixedSalt([3; 12]);
        let a = encrypt(b"data", &header, b"pw", &mut salt, false);
        let b = encrypt(b"data", &header, b"pw", &mut salt, false);
        assert_eq!(a, b);
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let header = header_with_crc(0xCBF43926);
        let mut salt = FixedSalt([0x5A; 12]);
        // Find a password whose check byte differs; nearly every one does.
        let sealed = encrypt(b"secret data", &header, b"right", &mut salt, false);
        let rejected = [&b"wrong"[..], b"guess", b"hunter2", b"letmein"]
            .iter()
            .filter(|pw| matches!(decrypt(&sealed, &header, pw), Err(ZipError::WrongPassword)))
            .count();
        assert!(rejected >= 3);
    }

    #[test]
    fn test_descriptor_uses_time_check_byte() {
        let mut header = header_with_crc(0xAA00_0000);
        header.flags |= FLAG_DATA_DESCRIPTOR;
        assert_eq!(check_byte(&header), 0x4F);
        assert_eq!(legacy_check_byte(&header), 0x55);

        let sealed = encrypt(b"x", &header, b"pw", &mut FixedSalt::default(), false);
        let mut salt = sealed[..12].to_vec();
        ZipCrypto::new(b"pw").decrypt_buffer(&mut salt);
        assert_eq!(salt[11], 0x4F);
    }

    #[test]
    fn test_legacy_mode_sets_second_check_byte() {
        let header = header_with_crc(0xAB_CD_12_34);
        let sealed = encrypt(b"x", &header, b"pw", &mut FixedSalt::default(), true);
        let mut salt = sealed[..12].to_vec();
        ZipCrypto::new(b"pw").decrypt_buffer(&mut salt);
        assert_eq!(salt[11], 0xAB);
        assert_eq!(salt[10], 0xCD);
    }

    #[test]
    fn test_short_input() {
        let header = header_with_crc(0);
        assert!(matches!(
            decrypt(&[0u8; 11], &header, b"pw"),
            Err(ZipError::UnexpectedEof { .. })
        ));
    }
}
