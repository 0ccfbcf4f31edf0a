//! Frame scrambling with the 127-bit maximal-length sequence.

use crate::consts::{FRAME_DATA_LEN, SCRAMB_LEN};

/// Scrambling sequence, `s[k] = s[k-1] ^ s[k-7]` seeded with seven ones.
const SCRAMB_TABLE: [u8; SCRAMB_LEN] = [
    1, 1, 1, 1, 1, 1, 1, 0,
    1, 0, 1, 0, 1, 0, 0, 1,
    1, 0, 0, 1, 1, 1, 0, 1,
    1, 1, 0, 1, 0, 0, 1, 0,
    1, 1, 0, 0, 0, 1, 1, 0,
    1, 1, 1, 1, 0, 1, 1, 0,
    1, 0, 1, 1, 0, 1, 1, 0,
    0, 1, 0, 0, 1, 0, 0, 0,
    1, 1, 1, 0, 0, 0, 0, 1,
    0, 1, 1, 1, 1, 1, 0, 0,
    1, 0, 1, 0, 1, 1, 1, 0,
    0, 1, 1, 0, 1, 0, 0, 0,
    1, 0, 0, 1, 1, 1, 1, 0,
    0, 0, 1, 0, 1, 0, 0, 0,
    0, 1, 1, 0, 0, 0, 0, 0,
    1, 0, 0, 0, 0, 0, 0,
];

/// XOR the scrambling sequence, rotated by the given offset, into the frame payload.
///
/// Offset 0 leaves the payload untouched. The transform is its own inverse.
pub fn descramble(bits: &mut [u8; FRAME_DATA_LEN], scr: usize) {
    assert!(scr <= SCRAMB_LEN);

    if scr == 0 {
        return;
    }

    for (k, bit) in bits.iter_mut().enumerate() {
        *bit ^= SCRAMB_TABLE[(k + scr) % SCRAMB_LEN];
    }
}

/// Generates the scrambling sequence bit by bit.
#[cfg(test)]
struct Sequence {
    /// Last 7 bits of the sequence, oldest in bit 6.
    state: u8,
}

#[cfg(test)]
impl Sequence {
    pub fn new() -> Sequence {
        Sequence { state: 0x7f }
    }
}

#[cfg(test)]
impl Iterator for Sequence {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let oldest = self.state >> 6;
        let next = oldest ^ self.state & 1;

        self.state = (self.state << 1 | next) & 0x7f;

        Some(oldest)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_table() {
        let mut seq = Sequence::new();

        for &bit in SCRAMB_TABLE.iter() {
            assert_eq!(seq.next().unwrap(), bit);
        }

        // Maximal length: the state only comes back round after a full period.
        assert_eq!(seq.state, 0x7f);

        let mut seq = Sequence::new();
        for _ in 0..SCRAMB_LEN - 1 {
            seq.next();
            assert!(seq.state != 0x7f);
        }
    }

    #[test]
    fn test_identity() {
        let mut bits = [1; FRAME_DATA_LEN];
        descramble(&mut bits, 0);
        assert!(bits.iter().all(|&b| b == 1));
    }

    #[test]
    fn test_offset() {
        let mut bits = [0; FRAME_DATA_LEN];
        descramble(&mut bits, 7);

        assert_eq!(&bits[..4], &[0, 1, 0, 1]);
        assert_eq!(bits[120], SCRAMB_TABLE[0]);
        assert_eq!(bits[127], SCRAMB_TABLE[7]);
    }

    #[test]
    fn test_round_trip() {
        let orig = {
            let mut bits = [0; FRAME_DATA_LEN];
            for (i, b) in bits.iter_mut().enumerate() {
                *b = (i * 5 % 3 == 1) as u8;
            }
            bits
        };

        for scr in 0..=SCRAMB_LEN {
            let mut bits = orig;
            descramble(&mut bits, scr);
            if scr != 0 {
                assert!(bits[..] != orig[..]);
            }
            descramble(&mut bits, scr);
            assert_eq!(&bits[..], &orig[..]);
        }
    }

    #[test]
    fn test_distinct_offsets() {
        let mut zero = [0; FRAME_DATA_LEN];
        let mut last = [0; FRAME_DATA_LEN];
        descramble(&mut zero, 0);
        descramble(&mut last, SCRAMB_LEN);

        assert!(zero[..] != last[..]);
    }
}
