//! CRC-32 (ISO 3309) as used by ZIP.
//!
//! The table is built at compile time from the reflected polynomial
//! `0xEDB88320`. The register is seeded with all ones and complemented on
//! output. [`crc32_update`] exposes the raw single-byte step, which the
//! ZipCrypto key schedule drives directly without the pre/post inversion.

/// Reflected CRC-32 polynomial.
const POLYNOMIAL: u32 = 0xEDB8_8320;

const fn make_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut bit = 0;
        while bit < 8 {
            let mask = (c & 1).wrapping_neg();
            c = (c >> 1) ^ (POLYNOMIAL & mask);
            bit += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

/// One entry per low byte of the register.
const CRC32_TABLE: [u32; 256] = make_table();

/// Advance a raw CRC register by one byte.
///
/// No seeding or final inversion happens here.
#[inline]
pub fn crc32_update(crc: u32, byte: u8) -> u32 {
    CRC32_TABLE[usize::from(crc as u8 ^ byte)] ^ (crc >> 8)
}

/// Compute the CRC-32 of `data`.
pub fn crc32(data: &[u8]) -> u32 {
    !data.iter().fold(!0u32, |reg, &b| crc32_update(reg, b))
}

/// Running CRC-32 over data that arrives in pieces.
///
/// ```rust
/// use zipcodec_core::crc::Crc32;
///
/// let mut crc = Crc32::new();
/// crc.update(b"Hello, ");
/// crc.update(b"World!");
/// assert_eq!(crc.finalize(), 0xEC4AC3D0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc32 {
    register: u32,
}

impl Crc32 {
    /// Start a new checksum.
    pub fn new() -> Self {
        Self { register: !0 }
    }

    /// Discard everything fed so far.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Feed more bytes.
    pub fn update(&mut self, data: &[u8]) {
        self.register = data
            .iter()
            .fold(self.register, |reg, &b| crc32_update(reg, b));
    }

    /// Checksum of the bytes fed so far.
    pub fn value(&self) -> u32 {
        !self.register
    }

    /// Consume the hasher and return the checksum.
    pub fn finalize(self) -> u32 {
        self.value()
    }

    /// Checksum of `data` in one call.
    pub fn compute(data: &[u8]) -> u32 {
        crc32(data)
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_empty() {
        assert_eq!(crc32(b""), 0x00000000);
    }

    #[test]
    fn test_crc32_check() {
        // Standard CRC-32 check value for "123456789"
        assert_eq!(crc32(b"123456789"), 0xCBF43926);
    }

    #[test]
    fn test_crc32_hello_world() {
        assert_eq!(Crc32::compute(b"Hello, World!"), 0xEC4AC3D0);
    }

    #[test]
    fn test_crc32_incremental() {
        let mut crc = Crc32::new();
        crc.update(b"Hello");
        crc.update(b", ");
        assert_eq!(crc.value(), Crc32::compute(b"Hello, "));
        crc.update(b"World!");
        assert_eq!(crc.finalize(), 0xEC4AC3D0);
    }

    #[test]
    fn test_crc32_reset() {
        let mut crc = Crc32::new();
        crc.update(b"garbage");
        crc.reset();
        crc.update(b"123456789");
        assert_eq!(crc.finalize(), 0xCBF43926);
    }

    #[test]
    fn test_crc32_table_correctness() {
        assert_eq!(CRC32_TABLE[0], 0x00000000);
        assert_eq!(CRC32_TABLE[1], 0x77073096);
        assert_eq!(CRC32_TABLE[255], 0x2D02EF8D);
    }

    #[test]
    fn test_update_matches_manual_register() {
        let mut reg = 0xFFFFFFFFu32;
        for &b in b"123456789" {
            reg = crc32_update(reg, b);
        }
        assert_eq!(reg ^ 0xFFFFFFFF, 0xCBF43926);
    }
}
