//! Utilities for working with unpacked bit streams, where every byte holds a single bit
//! in its LSB.

use num::PrimInt;

/// Read the given bits, MSB first, into an integer.
pub fn to_int<T: PrimInt>(bits: &[u8]) -> T {
    assert!(bits.len() <= T::zero().count_zeros() as usize);

    bits.iter().fold(T::zero(), |word, &bit| {
        debug_assert!(bit >> 1 == 0);
        word << 1 | if bit == 0 { T::zero() } else { T::one() }
    })
}

/// Copy `src` into `dst`, reversing the bit order within each octet.
pub fn reverse_octets(src: &[u8], dst: &mut [u8]) {
    assert!(src.len() % 8 == 0);
    assert!(src.len() == dst.len());

    for (s, d) in src.chunks(8).zip(dst.chunks_mut(8)) {
        for (i, bit) in s.iter().rev().enumerate() {
            d[i] = *bit;
        }
    }
}

/// Groups bits into full bytes, MSB first. The source must be a multiple of 8 bits.
pub struct Bytes<T: Iterator<Item = u8>> {
    /// Source of bits.
    src: T,
}

impl<T: Iterator<Item = u8>> Bytes<T> {
    /// Construct a new `Bytes` over the given bit source.
    pub fn new(src: T) -> Bytes<T> {
        Bytes { src }
    }
}

impl<T: Iterator<Item = u8>> Iterator for Bytes<T> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let (byte, added) = (&mut self.src)
            .take(8)
            .fold((0u8, 0), |(byte, added), bit| (byte << 1 | bit & 1, added + 1));

        // It's okay if there are no more source bits here, because we're on a safe
        // boundary.
        if added == 0 {
            return None;
        }

        assert!(added == 8, "incomplete source");

        Some(byte)
    }
}

/// Iterates over the bits of a byte source, MSB to LSB.
pub struct Bits<T: Iterator<Item = u8>> {
    /// Source of bytes.
    src: T,
    /// Byte currently being split.
    buf: u8,
    /// Bit-level index into the current byte.
    idx: u8,
}

impl<T: Iterator<Item = u8>> Bits<T> {
    /// Construct a new `Bits` over the given byte source.
    pub fn new(src: T) -> Bits<T> {
        Bits {
            src,
            buf: 0,
            idx: 0,
        }
    }
}

impl<T: Iterator<Item = u8>> Iterator for Bits<T> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.idx == 0 {
            self.buf = self.src.next()?;
        }

        let bit = self.buf >> (7 - self.idx) & 1;

        self.idx += 1;
        self.idx %= 8;

        Some(bit)
    }
}
