//! Frame synchronization over the demodulated bit stream.
//!
//! Acquisition looks for two frame synchronization sequences one frame apart in the raw
//! stream. Matching before differential decoding means only the sequence itself has to
//! be considered, not its inversion. Once synchronized, every frame's sequence is
//! checked in place and errors accumulate until sync is declared lost.

use crate::buffer::BitBuffer;
use crate::consts::{FRAME_DATA_LEN, FRAME_DSYNC, FRAME_HDR_LEN, FRAME_LEN, MAX_FRAME_SYNC_ERR};
use crate::frame::RawFrame;

use self::SyncState::*;

/// Events produced by the synchronizer.
pub enum SyncEvent {
    /// Frame synchronization was found. Everything downstream starts afresh.
    Acquired,
    /// Frame synchronization was lost and acquisition restarts.
    Lost,
    /// A frame was received.
    Frame(RawFrame),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum SyncState {
    Unsynchronized,
    Synchronized,
}

/// Locates frames in a stream of demodulated bits.
pub struct FrameSync {
    buf: BitBuffer,
    state: SyncState,
    /// Errors in the last frame synchronization sequence.
    last_sync_err: usize,
    /// Cumulative framing error.
    total_sync_err: usize,
}

impl FrameSync {
    pub fn new() -> FrameSync {
        FrameSync {
            buf: BitBuffer::default(),
            state: Unsynchronized,
            last_sync_err: 0,
            total_sync_err: 0,
        }
    }

    /// Append demodulated bits, returning how many fit into the buffer.
    pub fn feed(&mut self, bits: &[u8]) -> usize { self.buf.feed(bits) }

    /// Number of bits that can currently be fed.
    pub fn space(&self) -> usize { self.buf.space() }

    pub fn synchronized(&self) -> bool { self.state == Synchronized }
    pub fn last_sync_err(&self) -> usize { self.last_sync_err }
    pub fn total_sync_err(&self) -> usize { self.total_sync_err }

    /// Drop synchronization and all buffered bits.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.state = Unsynchronized;
        self.last_sync_err = 0;
        self.total_sync_err = 0;
    }

    /// Advance the state machine over the buffered bits, returning the next event if
    /// enough bits are available.
    pub fn poll(&mut self) -> Option<SyncEvent> {
        match self.state {
            Unsynchronized => if self.find_sync() {
                self.state = Synchronized;
                Some(SyncEvent::Acquired)
            } else {
                None
            },
            Synchronized => self.next_frame(),
        }
    }

    /// Scan for two consecutive synchronization sequences, discarding every bit before
    /// the match, or every scanned bit if there is none.
    fn find_sync(&mut self) -> bool {
        let (offs, found) = {
            let bits = self.buf.bits();
            let mut offs = 0;
            let mut found = false;

            while offs + FRAME_LEN + FRAME_HDR_LEN < bits.len() {
                let err = sync_err(&bits[offs..]) + sync_err(&bits[offs + FRAME_LEN..]);

                if err <= MAX_FRAME_SYNC_ERR {
                    found = true;
                    break;
                }

                offs += 1;
            }

            (offs, found)
        };

        self.buf.consume(offs);

        if found {
            self.last_sync_err = 0;
            self.total_sync_err = 0;
        }

        found
    }

    fn next_frame(&mut self) -> Option<SyncEvent> {
        if self.buf.len() < FRAME_LEN {
            return None;
        }

        let err = sync_err(self.buf.bits());

        if err + self.last_sync_err > MAX_FRAME_SYNC_ERR {
            self.total_sync_err = 1 + 2 * self.total_sync_err;

            if self.total_sync_err >= FRAME_LEN {
                self.state = Unsynchronized;
                return Some(SyncEvent::Lost);
            }
        } else {
            self.total_sync_err = 0;
        }

        self.last_sync_err = err;

        let frame = integrate(&self.buf.bits()[FRAME_HDR_LEN..FRAME_LEN]);
        self.buf.consume(FRAME_LEN);

        Some(SyncEvent::Frame(RawFrame::new(frame)))
    }
}

impl Default for FrameSync {
    fn default() -> Self { FrameSync::new() }
}

/// Count the errors in the synchronization sequence of the frame starting at the given
/// bits. The first header bit isn't part of the sequence.
fn sync_err(bits: &[u8]) -> usize {
    FRAME_DSYNC.iter().zip(bits[1..].iter()).filter(|&(a, b)| a != b).count()
}

/// Recover bit levels from the demodulated transitions.
fn integrate(bits: &[u8]) -> [u8; FRAME_DATA_LEN] {
    let mut out = [0; FRAME_DATA_LEN];
    let mut last = 0;

    for (o, &b) in out.iter_mut().zip(bits.iter()) {
        last ^= b;
        *o = last;
    }

    out
}
