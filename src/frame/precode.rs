//! Removal of the UHF differential precoding.

use crate::consts::FRAME_DATA_LEN;

/// Distance back to the bit each payload bit was precoded against.
const DIFF_PRECOD_UHF: [usize; FRAME_DATA_LEN] = [
    1, 1, 1, 1, 1, 1, 1, 2,
    1, 1, 2, 1, 1, 2, 1, 1,
    2, 1, 1, 2, 1, 1, 2, 1,
    1, 2, 1, 1, 2, 1, 1, 2,
    1, 1, 2, 1, 1, 2, 1, 1,
    2, 1, 1, 2, 1, 1, 2, 1,
    1, 2, 1, 1, 2, 1, 1, 2,
    1, 1, 2, 1, 1, 2, 1, 1,
    2, 1, 1, 2, 1, 1, 2, 1,
    1, 2, 1, 1, 2, 1, 1, 1,
    1, 1, 1, 2, 1, 1, 2, 1,
    1, 2, 1, 1, 2, 1, 1, 2,
    1, 1, 2, 1, 1, 2, 1, 1,
    2, 1, 1, 2, 1, 1, 2, 1,
    1, 2, 1, 1, 2, 1, 1, 2,
    1, 1, 2, 1, 1, 2, 1, 1,
    2, 1, 1, 2, 1, 1, 2, 1,
    1, 2, 1, 1, 2, 1, 1, 2,
    1, 1, 2, 1, 1, 2, 1, 1,
];

/// Undo differential precoding in place.
///
/// Runs from the end so every bit is combined with the still-precoded bit it refers to.
pub fn decode(bits: &mut [u8; FRAME_DATA_LEN]) {
    for j in (1..FRAME_DATA_LEN).rev() {
        bits[j] ^= bits[j - DIFF_PRECOD_UHF[j]];
    }
}

#[cfg(test)]
pub fn encode(bits: &mut [u8; FRAME_DATA_LEN]) {
    for j in 1..FRAME_DATA_LEN {
        bits[j] ^= bits[j - DIFF_PRECOD_UHF[j]];
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_table() {
        // Positions precoded two bits back, in steps of 3 with a gap around the middle
        // of the frame.
        let wide = (7..77).step_by(3).chain((83..150).step_by(3)).collect::<Vec<usize>>();

        assert_eq!(wide.len(), 47);

        for (i, &d) in DIFF_PRECOD_UHF.iter().enumerate() {
            assert_eq!(d, if wide.contains(&i) { 2 } else { 1 });
        }
    }

    #[test]
    fn test_decode() {
        let mut bits = [0; FRAME_DATA_LEN];
        bits[6] = 1;
        decode(&mut bits);

        // Bit 7 refers two back, skipping over bit 6.
        assert_eq!(&bits[5..10], &[0, 1, 0, 0, 0]);
        assert!(bits[10..].iter().all(|&b| b == 0));

        let mut bits = [0; FRAME_DATA_LEN];
        bits[5] = 1;
        decode(&mut bits);
        assert_eq!(&bits[4..9], &[0, 1, 1, 1, 0]);
    }

    #[test]
    fn test_inverse() {
        let orig = {
            let mut bits = [0; FRAME_DATA_LEN];
            for (i, b) in bits.iter_mut().enumerate() {
                *b = (i % 7 < 3) as u8;
            }
            bits
        };

        let mut bits = orig;
        encode(&mut bits);
        assert!(bits[..] != orig[..]);
        decode(&mut bits);
        assert_eq!(&bits[..], &orig[..]);
    }
}
