//! Bit-order correction
//!
//! The display samples SIN least-significant bit first. Hardware SPI
//! peripherals shift most-significant bit first, so every byte headed for an
//! SPI link is mirrored through [`BIT_REVERSE`] before it leaves.

/// Byte bit-reversal lookup, built at compile time
pub static BIT_REVERSE: [u8; 256] = build_table();

const fn build_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut value = i as u8;
        let mut reversed = 0u8;
        let mut bit = 0;
        while bit < 8 {
            reversed = (reversed << 1) | (value & 1);
            value >>= 1;
            bit += 1;
        }
        table[i] = reversed;
        i += 1;
    }
    table
}

/// Reverse the bit order of one byte
#[inline]
pub fn reverse(byte: u8) -> u8 {
    BIT_REVERSE[byte as usize]
}

/// Reverse each byte of a 16-bit field independently
///
/// The byte order is kept; only the bits inside each byte are mirrored.
#[inline]
pub fn reverse_u16(value: u16) -> u16 {
    let [lo, hi] = value.to_le_bytes();
    u16::from_le_bytes([reverse(lo), reverse(hi)])
}

/// Reverse every byte of `data` in place
pub fn reverse_in_place(data: &mut [u8]) {
    for byte in data {
        *byte = reverse(*byte);
    }
}
