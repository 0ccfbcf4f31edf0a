//! Implements the 5-bit CRC protecting data frames.
//!
//! The checksum is a shift register division by x^5 + x^2 + 1, fed one symbol at a time
//! with the register's MSB holding the first checksum bit.

/// Feedback taps applied when the bit shifted out differs from the input.
const TAPS: u8 = 0b00101;

/// 5-bit CRC calculator.
pub struct Crc5 {
    /// Current register contents, first checksum bit in bit 4.
    reg: u8,
}

impl Crc5 {
    /// Construct a new `Crc5` with a cleared register.
    pub fn new() -> Crc5 {
        Crc5 { reg: 0 }
    }

    /// Feed in a single bit.
    pub fn feed_bit(&mut self, bit: u8) -> &mut Self {
        debug_assert!(bit >> 1 == 0);

        let inv = bit ^ self.reg >> 4;
        self.reg = self.reg << 1 & 0x1f;

        if inv == 1 {
            self.reg ^= TAPS;
        }

        self
    }

    /// Feed in the given bits.
    pub fn feed_bits(&mut self, bits: &[u8]) -> &mut Self {
        for &bit in bits {
            self.feed_bit(bit);
        }

        self
    }

    /// Get the checksum as 5 bits, MSB first.
    pub fn finish(&self) -> [u8; 5] {
        let mut out = [0; 5];

        for (i, bit) in out.iter_mut().enumerate() {
            *bit = self.reg >> (4 - i) & 1;
        }

        out
    }
}

/// Check the given data symbols against the checksum that follows them.
pub fn check(bits: &[u8], crc: &[u8]) -> bool {
    Crc5::new().feed_bits(bits).finish()[..] == crc[..]
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::consts::CRC_COVERAGE;

    fn input() -> [u8; CRC_COVERAGE] {
        let mut bits = [0; CRC_COVERAGE];

        for (i, b) in bits.iter_mut().enumerate() {
            *b = (i * 11 % 7 > 3) as u8;
        }

        bits
    }

    #[test]
    fn test_impulse() {
        // A single one walks through the register and picks up the taps.
        assert_eq!(Crc5::new().feed_bit(1).finish(), [0, 0, 1, 0, 1]);
        assert_eq!(Crc5::new().feed_bits(&[1, 0]).finish(), [0, 1, 0, 1, 0]);
        assert_eq!(Crc5::new().feed_bits(&[1, 0, 0, 0]).finish(), [0, 1, 1, 0, 1]);
        assert_eq!(Crc5::new().feed_bits(&[0; 10]).finish(), [0; 5]);
    }

    #[test]
    fn test_valid() {
        let data = input();
        let crc = Crc5::new().feed_bits(&data).finish();

        assert!(check(&data, &crc));

        // A message followed by its checksum leaves a zero remainder.
        let mut word = data.to_vec();
        word.extend_from_slice(&crc);
        assert_eq!(Crc5::new().feed_bits(&word).finish(), [0; 5]);
    }

    #[test]
    fn test_single_flip() {
        let data = input();
        let crc = Crc5::new().feed_bits(&data).finish();

        for i in 0..CRC_COVERAGE {
            let mut bad = data;
            bad[i] ^= 1;
            assert!(!check(&bad, &crc));
        }

        for i in 0..5 {
            let mut bad = crc;
            bad[i] ^= 1;
            assert!(!check(&data, &bad));
        }
    }
}
