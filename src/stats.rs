//! Runtime statistics.

use crate::error::TetrapolError;
use crate::frame::resolve::Resolution;

/// Tracks the outcome of scrambling resolution.
#[derive(Copy, Clone, Default, Debug)]
pub struct FrameStats {
    /// Frames with exactly one matching offset.
    pub accepted: usize,
    /// Frames with no matching offset.
    pub unmatched: usize,
    /// Frames with more than one matching offset.
    pub ambiguous: usize,
}

impl FrameStats {
    /// Record the outcome of the offset search for one frame.
    pub fn record(&mut self, res: &Resolution) {
        match *res {
            Resolution::Unique(_) => self.accepted += 1,
            Resolution::Unmatched => self.unmatched += 1,
            Resolution::Ambiguous(_) => self.ambiguous += 1,
        }
    }

    /// Total number of frames searched.
    pub fn total(&self) -> usize { self.accepted + self.unmatched + self.ambiguous }

    fn merge(&mut self, other: &mut FrameStats) {
        self.accepted += other.accepted;
        self.unmatched += other.unmatched;
        self.ambiguous += other.ambiguous;

        *other = FrameStats::default();
    }
}

/// Tracks frame synchronization changes.
#[derive(Copy, Clone, Default, Debug)]
pub struct SyncStats {
    pub acquired: usize,
    pub lost: usize,
}

impl SyncStats {
    fn merge(&mut self, other: &mut SyncStats) {
        self.acquired += other.acquired;
        self.lost += other.lost;

        *other = SyncStats::default();
    }
}

/// Tracks link layer decoding.
#[derive(Copy, Clone, Default, Debug)]
pub struct LinkStats {
    /// TSDUs delivered to the application layer.
    pub tsdus: usize,
    /// Link units dropped as malformed or unsupported.
    pub dropped: usize,
    /// Incomplete segmented TSDUs thrown away.
    pub abandoned: usize,
}

impl LinkStats {
    fn merge(&mut self, other: &mut LinkStats) {
        self.tsdus += other.tsdus;
        self.dropped += other.dropped;
        self.abandoned += other.abandoned;

        *other = LinkStats::default();
    }
}

/// Records various runtime statistics.
#[derive(Copy, Clone, Default, Debug)]
pub struct Stats {
    pub frames: FrameStats,
    pub sync: SyncStats,
    pub link: LinkStats,
}

impl Stats {
    /// Merge in the stats from the given object and reset the other stats back to
    /// default.
    pub fn merge<T: HasStats>(&mut self, other: &mut T) {
        let stats = other.stats();

        self.frames.merge(&mut stats.frames);
        self.sync.merge(&mut stats.sync);
        self.link.merge(&mut stats.link);
    }

    /// Clear all stats.
    pub fn clear(&mut self) {
        *self = Stats::default();
    }

    /// Record the given error into the current stats.
    pub fn record_err(&mut self, err: TetrapolError) {
        use crate::error::TetrapolError::*;

        match err {
            SegmentOverflow => self.link.abandoned += 1,
            BlockTooShort | UnsupportedControl(_) | InvalidSegmentation | UnsupportedExtension |
                ReservedBitSet | SegmentedInformation | LengthOverrun => self.link.dropped += 1,
        }
    }
}

/// Indicates that a type captures statistics.
pub trait HasStats {
    /// Retrieve captured statistics.
    fn stats(&mut self) -> &mut Stats;
}
