//! Blind recovery of the per-frame scrambling offset.
//!
//! The offset isn't signalled, so every frame is decoded with all possible offsets and
//! accepted only when exactly one of them yields a genuine frame.

use crate::consts::{PAYLOAD_BITS, SCRAMB_OFFSETS};

use super::data::{Asb, DataUnit};
use super::{ChannelConfig, FrameDecoder, RawFrame};

/// Fields of a frame whose scrambling was resolved.
#[derive(Copy, Clone)]
#[cfg_attr(feature = "ser", derive(Serialize))]
pub struct DataFrame {
    /// Payload bits, in superframe order.
    #[cfg_attr(feature = "ser", serde(with = "serde_bits"))]
    pub payload: [u8; PAYLOAD_BITS],
    /// Frame number within the superframe, 0 to 3.
    pub number: u8,
    pub asb: Asb,
    /// Scrambling offset the frame was sent with.
    pub scrambling: u8,
}

impl DataFrame {
    fn new(unit: &DataUnit, scr: usize) -> DataFrame {
        DataFrame {
            payload: unit.payload(),
            number: unit.frame_number(),
            asb: unit.asb(),
            scrambling: scr as u8,
        }
    }
}

/// Outcome of the offset search for one frame.
#[derive(Copy, Clone)]
pub enum Resolution {
    /// Exactly one offset produced a genuine frame.
    Unique(DataFrame),
    /// The given number of offsets, at least 2, produced a genuine frame.
    Ambiguous(usize),
    /// No offset produced a genuine frame.
    Unmatched,
}

impl Resolution {
    pub fn frame(self) -> Option<DataFrame> {
        match self {
            Resolution::Unique(f) => Some(f),
            _ => None,
        }
    }
}

/// Searches scrambling offsets using the channel's frame decoder.
#[derive(Copy, Clone)]
pub struct Resolver {
    decoder: FrameDecoder,
}

impl Resolver {
    pub fn new(config: ChannelConfig) -> Resolver {
        Resolver {
            decoder: FrameDecoder::new(config),
        }
    }

    pub fn config(&self) -> ChannelConfig { self.decoder.config() }
    pub fn set_config(&mut self, config: ChannelConfig) { self.decoder.set_config(config); }

    /// Decode the frame with a single offset, returning the unit if it's genuine.
    pub fn trial(&self, raw: &RawFrame, scr: usize) -> Option<DataUnit> {
        let unit = DataUnit::new(&self.decoder.decode(raw, scr));

        if unit.is_valid(self.decoder.config().channel_type) {
            Some(unit)
        } else {
            None
        }
    }

    /// Try every offset on the given frame.
    pub fn resolution(&self, raw: &RawFrame) -> Resolution {
        tally((0..SCRAMB_OFFSETS).filter_map(|scr| self.trial(raw, scr).map(|u| (scr, u))))
    }

    /// Resolve the given frame, returning its fields only if exactly one offset matched.
    pub fn resolve(&self, raw: &RawFrame) -> Option<DataFrame> {
        self.resolution(raw).frame()
    }
}

/// Reduce the matching offsets of one frame, with their units, to a resolution.
fn tally<I: Iterator<Item = (usize, DataUnit)>>(matches: I) -> Resolution {
    let (count, found) = matches.fold((0, None), |(count, found), (scr, unit)| {
        (count + 1, found.or(Some(DataFrame::new(&unit, scr))))
    });

    match (count, found) {
        (1, Some(f)) => Resolution::Unique(f),
        (0, _) => Resolution::Unmatched,
        (n, _) => Resolution::Ambiguous(n),
    }
}

#[cfg(feature = "ser")]
mod serde_bits {
    use serde::Serializer;

    use crate::consts::PAYLOAD_BITS;

    pub fn serialize<S: Serializer>(bits: &[u8; PAYLOAD_BITS], s: S)
        -> Result<S::Ok, S::Error>
    {
        s.collect_seq(bits.iter())
    }
}
