//! Bounded accumulator for demodulated bits.

use crate::consts::BUFFER_BITS;

/// Append-only store of incoming bits with a fixed capacity.
///
/// Bits past capacity are dropped at the input, and the consumed prefix is discarded by
/// the frame synchronizer after every parse step.
pub struct BitBuffer {
    bits: Vec<u8>,
    capacity: usize,
}

impl BitBuffer {
    /// Create a new `BitBuffer` holding up to the given number of bits.
    pub fn new(capacity: usize) -> BitBuffer {
        BitBuffer {
            bits: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append as many of the given bits as fit and return how many were accepted.
    pub fn feed(&mut self, bits: &[u8]) -> usize {
        let len = std::cmp::min(bits.len(), self.space());
        self.bits.extend(bits[..len].iter().map(|b| b & 1));
        len
    }

    /// Drop the given number of bits from the front.
    pub fn consume(&mut self, len: usize) {
        let len = std::cmp::min(len, self.bits.len());
        self.bits.drain(..len);
    }

    pub fn clear(&mut self) { self.bits.clear(); }

    pub fn bits(&self) -> &[u8] { &self.bits[..] }
    pub fn len(&self) -> usize { self.bits.len() }
    pub fn space(&self) -> usize { self.capacity - self.bits.len() }
}

impl Default for BitBuffer {
    fn default() -> Self { BitBuffer::new(BUFFER_BITS) }
}
