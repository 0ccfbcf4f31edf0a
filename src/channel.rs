//! Physical channel session, joining frame synchronization, scrambling resolution, and
//! link decoding for one channel.
//!
//! Every piece of mutable per-channel state lives here, so channels decoded side by side
//! share nothing.

use crate::consts::MULTIFRAME_LEN;
use crate::error::TetrapolError;
use crate::frame::resolve::{DataFrame, Resolution, Resolver};
use crate::frame::{ChannelConfig, RawFrame};
use crate::hdlc::{LinkBlock, LinkDecoder};
use crate::stats::{HasStats, Stats};
use crate::sync::{FrameSync, SyncEvent};
use crate::tpdu::{TsduContext, TsduSink};

/// Accepted frame handed to the superframe layer.
#[derive(Copy, Clone)]
#[cfg_attr(feature = "ser", derive(Serialize))]
pub struct ChannelFrame {
    pub frame: DataFrame,
    /// Multiframe counter, if known.
    pub multiframe: Option<u8>,
}

/// Groups accepted frames into link blocks.
pub trait FrameSink {
    /// Handle the given frame, returning a link block if it completed one.
    fn push_frame(&mut self, frame: &ChannelFrame) -> Option<LinkBlock>;

    /// Forget any frames collected so far.
    fn reset(&mut self);
}

/// Events that can occur on a channel.
pub enum ChannelEvent {
    /// Frame synchronization was acquired.
    SyncAcquired,
    /// Frame synchronization was lost.
    SyncLost,
    /// A frame was accepted and handed to the frame sink.
    Frame(ChannelFrame),
    /// A frame was rejected after the given number of scrambling offsets, other than 1,
    /// matched.
    Rejected(usize),
    /// A TSDU was handed to the TSDU sink.
    Tsdu(TsduContext),
    /// A link block was dropped.
    Dropped(TetrapolError),
}

/// Decodes one physical channel from demodulated bits to TSDUs.
pub struct Channel<F: FrameSink, T: TsduSink> {
    sync: FrameSync,
    resolver: Resolver,
    /// Multiframe counter, unknown until set from above.
    multiframe: Option<u8>,
    link: LinkDecoder,
    /// Link block waiting to be decoded.
    block: Option<LinkBlock>,
    frames: F,
    tsdus: T,
    stats: Stats,
}

impl<F: FrameSink, T: TsduSink> Channel<F, T> {
    /// Create a new unsynchronized channel delivering into the given sinks.
    pub fn new(config: ChannelConfig, frames: F, tsdus: T) -> Channel<F, T> {
        Channel {
            sync: FrameSync::new(),
            resolver: Resolver::new(config),
            multiframe: None,
            link: LinkDecoder::new(),
            block: None,
            frames,
            tsdus,
            stats: Stats::default(),
        }
    }

    pub fn config(&self) -> ChannelConfig { self.resolver.config() }
    pub fn synchronized(&self) -> bool { self.sync.synchronized() }
    pub fn multiframe(&self) -> Option<u8> { self.multiframe }

    pub fn frame_sink(&self) -> &F { &self.frames }
    pub fn tsdu_sink(&self) -> &T { &self.tsdus }

    /// Consume the channel, returning its sinks.
    pub fn into_sinks(self) -> (F, T) { (self.frames, self.tsdus) }

    /// Switch to a new configuration, dropping everything decoded under the old one.
    pub fn reconfigure(&mut self, config: ChannelConfig) {
        self.resolver.set_config(config);
        self.reset_downstream();
    }

    /// Set the multiframe counter of the most recently received frame.
    pub fn set_multiframe(&mut self, mf: u8) {
        self.multiframe = Some(mf % MULTIFRAME_LEN);
    }

    /// Append demodulated bits, returning how many were accepted. Bits that don't fit
    /// must be fed again after processing.
    pub fn feed(&mut self, bits: &[u8]) -> usize { self.sync.feed(bits) }

    /// Number of bits that can currently be fed.
    pub fn space(&self) -> usize { self.sync.space() }

    /// Drop synchronization and all decoding state.
    pub fn reset(&mut self) {
        self.sync.reset();
        self.reset_downstream();
    }

    /// Decode everything possible from the buffered bits.
    pub fn process(&mut self) {
        while let Some(_) = self.poll() {}
    }

    /// Advance decoding over the buffered bits, returning the next event, or `None` if
    /// more bits are needed.
    pub fn poll(&mut self) -> Option<ChannelEvent> {
        if let Some(block) = self.block.take() {
            if let Some(e) = self.decode_block(&block) {
                return Some(e);
            }
        }

        Some(match self.sync.poll()? {
            SyncEvent::Acquired => {
                info!("frame sync acquired");
                self.stats.sync.acquired += 1;
                self.reset_downstream();
                ChannelEvent::SyncAcquired
            },
            SyncEvent::Lost => {
                info!("frame sync lost");
                self.stats.sync.lost += 1;
                self.reset_downstream();
                ChannelEvent::SyncLost
            },
            SyncEvent::Frame(raw) => self.handle_frame(&raw),
        })
    }

    fn handle_frame(&mut self, raw: &RawFrame) -> ChannelEvent {
        self.multiframe = self.multiframe.map(|m| (m + 1) % MULTIFRAME_LEN);

        let res = self.resolver.resolution(raw);
        self.stats.frames.record(&res);

        let frame = match res {
            Resolution::Unique(f) => f,
            Resolution::Ambiguous(n) => {
                trace!("frame matched {} scrambling offsets", n);
                self.reset_downstream();
                return ChannelEvent::Rejected(n);
            },
            Resolution::Unmatched => {
                trace!("frame matched no scrambling offset");
                self.reset_downstream();
                return ChannelEvent::Rejected(0);
            },
        };

        debug!("frame mf={:?} fn={} asb={}{} scr={}", self.multiframe, frame.number,
               frame.asb.x, frame.asb.y, frame.scrambling);

        let out = ChannelFrame {
            frame,
            multiframe: self.multiframe,
        };

        self.block = self.frames.push_frame(&out);

        ChannelEvent::Frame(out)
    }

    fn decode_block(&mut self, block: &LinkBlock) -> Option<ChannelEvent> {
        let res = self.link.decode(block);
        self.stats.merge(&mut self.link);

        match res {
            Ok(Some(tsdu)) => {
                self.stats.link.tsdus += 1;
                self.tsdus.process(&tsdu.data, &tsdu.ctx);
                Some(ChannelEvent::Tsdu(tsdu.ctx))
            },
            Ok(None) => None,
            Err(e) => {
                warn!("dropping link block: {}", e);
                self.stats.record_err(e);
                Some(ChannelEvent::Dropped(e))
            },
        }
    }

    /// Reset everything that depends on frame continuity.
    fn reset_downstream(&mut self) {
        self.multiframe = None;
        self.block = None;
        self.frames.reset();
        self.link.reset();
        self.stats.merge(&mut self.link);
    }
}

impl<F: FrameSink, T: TsduSink> HasStats for Channel<F, T> {
    fn stats(&mut self) -> &mut Stats { &mut self.stats }
}
