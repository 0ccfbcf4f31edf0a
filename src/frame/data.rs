//! Validation and field extraction for decoded data frames.
//!
//! A decoded frame carries two convolutionally protected sub-streams of 26 and 48
//! symbols. Every protected symbol is sent as the XOR of a bit pair, and every pair's
//! first bit repeats the parity of the three symbols ending at that pair.

use crate::bits::reverse_octets;
use crate::consts::{CRC_COVERAGE, DATA_SYMBOLS, FRAME_DATA_LEN, PAYLOAD_BITS};

use super::crc;
use super::{ChannelType, DecodedFrame};

/// Length of the first sub-stream.
const B1_LEN: usize = 26;
/// Length of the second sub-stream.
const B2_LEN: usize = 48;

/// Access Status Bits carried by every data frame.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(Serialize))]
pub struct Asb {
    pub x: u8,
    pub y: u8,
}

/// Symbols recovered from a decoded frame.
#[derive(Copy, Clone)]
pub struct DataUnit {
    symbols: [u8; DATA_SYMBOLS],
    /// Whether every structural parity check passed.
    parity: bool,
}

impl DataUnit {
    /// Split the given frame into its sub-streams and run the parity checks.
    pub fn new(frame: &DecodedFrame) -> DataUnit {
        let d = frame.bits();
        let mut symbols = [0; DATA_SYMBOLS];

        let parity = {
            let (b1, b2) = symbols.split_at_mut(B1_LEN);
            first_stream(d, b1) & second_stream(d, b2) & tail_ok(d)
        };

        DataUnit { symbols, parity }
    }

    pub fn symbols(&self) -> &[u8; DATA_SYMBOLS] { &self.symbols }

    /// Whether the structural parity checks passed.
    pub fn parity_ok(&self) -> bool { self.parity }

    /// Whether the trailing checksum matches the covered symbols.
    pub fn crc_ok(&self) -> bool {
        crc::check(&self.symbols[..CRC_COVERAGE], &self.symbols[CRC_COVERAGE..])
    }

    /// First symbol of the unit, which identifies the frame type, or `None` if the unit
    /// failed the parity checks.
    pub fn marker(&self) -> Option<u8> {
        if self.parity {
            Some(self.symbols[0])
        } else {
            None
        }
    }

    /// Check if the unit is a genuine frame of the given channel type.
    pub fn is_valid(&self, channel_type: ChannelType) -> bool {
        self.marker() == Some(channel_type.frame_marker()) && self.crc_ok() &&
            !self.is_blank()
    }

    /// Whether every symbol is zero, which trivially satisfies parity and CRC.
    pub fn is_blank(&self) -> bool {
        self.symbols.iter().all(|&s| s == 0)
    }

    /// Frame number within the superframe, 0 to 3.
    pub fn frame_number(&self) -> u8 { self.symbols[2] << 1 | self.symbols[1] }

    pub fn asb(&self) -> Asb {
        Asb {
            x: self.symbols[67],
            y: self.symbols[68],
        }
    }

    /// Frame payload with the bit order of each octet reversed into the order used by
    /// the superframe layer.
    pub fn payload(&self) -> [u8; PAYLOAD_BITS] {
        let mut out = [0; PAYLOAD_BITS];
        reverse_octets(&self.symbols[3..3 + PAYLOAD_BITS], &mut out);
        out
    }
}

/// Recover the first sub-stream and check its parity.
fn first_stream(d: &[u8; FRAME_DATA_LEN], b1: &mut [u8]) -> bool {
    debug_assert!(b1.len() == B1_LEN);

    b1[B1_LEN - 1] = d[0] ^ d[1];

    for j in 1..B1_LEN {
        b1[j - 1] = d[2 * j] ^ d[2 * j + 1];
    }

    (3..23).all(|j| d[2 * j] == b1[j] ^ b1[j - 1] ^ b1[j - 2])
}

/// Recover the second sub-stream and check its parity.
fn second_stream(d: &[u8; FRAME_DATA_LEN], b2: &mut [u8]) -> bool {
    debug_assert!(b2.len() == B2_LEN);

    b2[0] = d[53];

    for j in 2..=B2_LEN {
        b2[j - 1] = d[2 * j + 52] ^ d[2 * j + 53];
    }

    d[52] == d[53] && (3..45).all(|j| d[2 * j + 52] == b2[j] ^ b2[j - 1] ^ b2[j - 2])
}

/// Check the repeated bits closing the frame.
fn tail_ok(d: &[u8; FRAME_DATA_LEN]) -> bool {
    d[150] == d[151] && d[148] ^ d[149] == d[150]
}
