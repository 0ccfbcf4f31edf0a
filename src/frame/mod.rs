//! Physical channel frame decoding: descrambling, precoding removal, deinterleaving, and
//! validation of the resulting data frames.

use collect_slice::CollectSlice;

use crate::consts::FRAME_DATA_LEN;

use self::interleave::{DataRedirector, Deinterleaver, VoiceRedirector};

pub mod crc;
pub mod data;
pub mod interleave;
pub mod precode;
pub mod resolve;
pub mod scramble;

/// Radio band of the channel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(Serialize))]
pub enum Band {
    Vhf,
    /// Band using differential precoding of the frame payload.
    Uhf,
}

/// Logical channel type carried by the frames.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(Serialize))]
pub enum ChannelType {
    Voice,
    Data,
}

impl ChannelType {
    /// Value of the first decoded symbol in a frame of this type.
    pub fn frame_marker(&self) -> u8 {
        match *self {
            ChannelType::Voice => 0,
            ChannelType::Data => 1,
        }
    }
}

/// Parameters a physical channel is decoded with.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(Serialize))]
pub struct ChannelConfig {
    pub band: Band,
    pub channel_type: ChannelType,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        ChannelConfig {
            band: Band::Uhf,
            channel_type: ChannelType::Data,
        }
    }
}

/// Payload bits of one received frame, header stripped.
#[derive(Copy, Clone)]
pub struct RawFrame([u8; FRAME_DATA_LEN]);

impl RawFrame {
    pub fn new(bits: [u8; FRAME_DATA_LEN]) -> RawFrame { RawFrame(bits) }
    pub fn bits(&self) -> &[u8; FRAME_DATA_LEN] { &self.0 }
}

/// Frame payload after descrambling, precoding removal, and deinterleaving with one
/// trial scrambling offset.
#[derive(Copy, Clone)]
pub struct DecodedFrame([u8; FRAME_DATA_LEN]);

impl DecodedFrame {
    pub fn new(bits: [u8; FRAME_DATA_LEN]) -> DecodedFrame { DecodedFrame(bits) }
    pub fn bits(&self) -> &[u8; FRAME_DATA_LEN] { &self.0 }
}

/// Decodes raw frames according to the channel configuration.
#[derive(Copy, Clone)]
pub struct FrameDecoder {
    config: ChannelConfig,
}

impl FrameDecoder {
    pub fn new(config: ChannelConfig) -> FrameDecoder {
        FrameDecoder { config }
    }

    pub fn config(&self) -> ChannelConfig { self.config }
    pub fn set_config(&mut self, config: ChannelConfig) { self.config = config; }

    /// Decode the given frame assuming it was scrambled with the given offset.
    pub fn decode(&self, raw: &RawFrame, scr: usize) -> DecodedFrame {
        let mut tmp = *raw.bits();

        scramble::descramble(&mut tmp, scr);

        if self.config.band == Band::Uhf {
            precode::decode(&mut tmp);
        }

        let mut out = [0; FRAME_DATA_LEN];

        match self.config.channel_type {
            ChannelType::Voice => Deinterleaver::<VoiceRedirector>::new(&tmp)
                .collect_slice_checked(&mut out[..]),
            ChannelType::Data => Deinterleaver::<DataRedirector>::new(&tmp)
                .collect_slice_checked(&mut out[..]),
        }

        DecodedFrame(out)
    }
}
