//! Deinterleaving of voice and data frame payloads.

use crate::consts::FRAME_DATA_LEN;

pub trait Redirector {
    /// Redirect the given output index to the payload index it's read from.
    fn redirect(idx: usize) -> usize;
}

/// Redirects to undo voice frame interleaving.
pub struct VoiceRedirector;

impl Redirector for VoiceRedirector {
    fn redirect(idx: usize) -> usize {
        const REDIRECTS: [usize; FRAME_DATA_LEN] = [
            1, 77, 38, 114, 20, 96, 59, 135,
            3, 79, 41, 117, 23, 99, 62, 138,
            5, 81, 44, 120, 26, 102, 65, 141,
            8, 84, 47, 123, 29, 105, 68, 144,
            11, 87, 50, 126, 32, 108, 71, 147,
            14, 90, 53, 129, 35, 111, 74, 150,
            17, 93, 56, 132, 37, 113, 73, 4,
            0, 76, 40, 119, 19, 95, 58, 137,
            151, 80, 42, 115, 24, 100, 60, 133,
            12, 88, 48, 121, 30, 106, 66, 139,
            18, 91, 51, 124, 28, 104, 67, 146,
            10, 89, 52, 131, 34, 110, 70, 149,
            13, 97, 57, 130, 36, 112, 75, 148,
            6, 82, 39, 116, 16, 92, 55, 134,
            2, 78, 43, 122, 22, 98, 61, 140,
            9, 85, 45, 118, 27, 103, 63, 136,
            15, 83, 46, 125, 25, 101, 64, 143,
            7, 86, 49, 128, 31, 107, 69, 142,
            21, 94, 54, 127, 33, 109, 72, 145,
        ];

        REDIRECTS[idx]
    }
}

/// Redirects to undo data frame interleaving.
pub struct DataRedirector;

impl Redirector for DataRedirector {
    fn redirect(idx: usize) -> usize {
        const REDIRECTS: [usize; FRAME_DATA_LEN] = [
            1, 77, 38, 114, 20, 96, 59, 135,
            3, 79, 41, 117, 23, 99, 62, 138,
            5, 81, 44, 120, 26, 102, 65, 141,
            8, 84, 47, 123, 29, 105, 68, 144,
            11, 87, 50, 126, 32, 108, 71, 147,
            14, 90, 53, 129, 35, 111, 74, 150,
            17, 93, 56, 132, 37, 112, 76, 148,
            2, 88, 40, 115, 19, 97, 58, 133,
            4, 75, 43, 118, 22, 100, 61, 136,
            7, 85, 46, 121, 25, 103, 64, 139,
            10, 82, 49, 124, 28, 106, 67, 142,
            13, 91, 52, 127, 31, 109, 73, 145,
            16, 94, 55, 130, 34, 113, 70, 151,
            0, 80, 39, 116, 21, 95, 57, 134,
            6, 78, 42, 119, 24, 98, 60, 137,
            9, 83, 45, 122, 27, 101, 63, 140,
            12, 86, 48, 125, 30, 104, 66, 143,
            15, 89, 51, 128, 33, 107, 69, 146,
            18, 92, 54, 131, 36, 110, 72, 149,
        ];

        REDIRECTS[idx]
    }
}

struct Indexes<R: Redirector>(std::ops::Range<usize>, std::marker::PhantomData<R>);

impl<R: Redirector> Indexes<R> {
    pub fn new() -> Indexes<R> {
        Indexes(0..FRAME_DATA_LEN, std::marker::PhantomData)
    }
}

impl<R: Redirector> Iterator for Indexes<R> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(R::redirect)
    }
}

/// Yields the bits of a frame payload in deinterleaved order.
pub struct Deinterleaver<'a, R: Redirector> {
    bits: &'a [u8; FRAME_DATA_LEN],
    idx: Indexes<R>,
}

impl<'a, R: Redirector> Deinterleaver<'a, R> {
    pub fn new(bits: &'a [u8; FRAME_DATA_LEN]) -> Deinterleaver<'a, R> {
        Deinterleaver {
            bits,
            idx: Indexes::new(),
        }
    }
}

impl<'a, R: Redirector> Iterator for Deinterleaver<'a, R> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        self.idx.next().map(|idx| self.bits[idx])
    }
}

#[cfg(test)]
pub fn interleave<R: Redirector>(bits: &[u8; FRAME_DATA_LEN]) -> [u8; FRAME_DATA_LEN] {
    let mut out = [0; FRAME_DATA_LEN];

    for (j, idx) in Indexes::<R>::new().enumerate() {
        out[idx] = bits[j];
    }

    out
}

#[cfg(test)]
mod test {
    use super::*;

    fn check_permutation<R: Redirector>() {
        let mut visited = [0u32; FRAME_DATA_LEN];

        for idx in Indexes::<R>::new() {
            visited[idx] += 1;
        }

        for &v in visited.iter() {
            assert_eq!(v, 1);
        }
    }

    #[test]
    fn test_permutations() {
        check_permutation::<VoiceRedirector>();
        check_permutation::<DataRedirector>();
    }

    #[test]
    fn test_deinterleave() {
        let mut bits = [0; FRAME_DATA_LEN];
        bits[77] = 1;
        bits[149] = 1;

        let out = Deinterleaver::<DataRedirector>::new(&bits).collect::<Vec<u8>>();

        assert_eq!(out.len(), FRAME_DATA_LEN);
        assert_eq!(out[1], 1);
        assert_eq!(out[151], 1);
        assert_eq!(out.iter().filter(|&&b| b == 1).count(), 2);
    }

    #[test]
    fn test_tables_differ() {
        let mut bits = [0; FRAME_DATA_LEN];
        bits[4] = 1;

        let voice = Deinterleaver::<VoiceRedirector>::new(&bits).collect::<Vec<u8>>();
        let data = Deinterleaver::<DataRedirector>::new(&bits).collect::<Vec<u8>>();

        assert_eq!(voice[55], 1);
        assert_eq!(data[64], 1);
        assert!(voice != data);
    }

    #[test]
    fn test_inverse() {
        let mut bits = [0; FRAME_DATA_LEN];
        for (i, b) in bits.iter_mut().enumerate() {
            *b = (i % 3 == 0) as u8;
        }

        let int = interleave::<DataRedirector>(&bits);
        let out = Deinterleaver::<DataRedirector>::new(&int).collect::<Vec<u8>>();
        assert_eq!(&out[..], &bits[..]);
    }
}
