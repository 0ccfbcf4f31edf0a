//! Link layer: addressing and HDLC framing of assembled link blocks.

use crate::bits::to_int;
use crate::error::{Result, TetrapolError};
use crate::stats::{HasStats, Stats};
use crate::tpdu::{TpduDecoder, Tsdu};

/// Bits of link addressing that precede the control octet.
const ADDR_BITS: usize = 16;
/// Bits of the HDLC control octet.
const CONTROL_BITS: usize = 8;

/// Link block assembled from consecutive data frames.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LinkBlock {
    /// Block bits, one per byte.
    pub bits: Vec<u8>,
    /// Multiframe counter of the frame that completed the block.
    pub multiframe: Option<u8>,
}

/// Link address of a mobile or base station.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(Serialize))]
pub struct LinkAddress(u16);

impl LinkAddress {
    /// Parse an address from the given 16 bits.
    pub fn new(bits: &[u8]) -> LinkAddress {
        LinkAddress(to_int(&bits[..ADDR_BITS]))
    }

    pub fn raw(&self) -> u16 { self.0 }

    /// Address type flag.
    pub fn z(&self) -> u8 { (self.0 >> 15) as u8 }
    /// Address group.
    pub fn y(&self) -> u8 { (self.0 >> 12 & 0x7) as u8 }
    /// Address within the group.
    pub fn x(&self) -> u16 { self.0 & 0xFFF }
}

/// Command of a supervisory frame.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Supervisory {
    ReceiveReady,
    ReceiveNotReady,
    Reject,
}

impl Supervisory {
    /// Parse a command from the given 2 bits.
    pub fn from_bits(bits: u8) -> Option<Supervisory> {
        use self::Supervisory::*;

        assert!(bits >> 2 == 0);

        match bits {
            0 => Some(ReceiveReady),
            1 => Some(ReceiveNotReady),
            2 => Some(Reject),
            _ => None,
        }
    }
}

/// Command of an unnumbered frame.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Unnumbered {
    Information,
    Disconnect,
    Ack,
    SetNormalResponse,
    /// Unnumbered information on a control channel with circuit data.
    InformationCd,
    /// Unnumbered information on a voice channel.
    InformationVch,
}

impl Unnumbered {
    /// Parse a command from the given 5 modifier bits.
    pub fn from_bits(bits: u8) -> Option<Unnumbered> {
        use self::Unnumbered::*;

        assert!(bits >> 5 == 0);

        match bits {
            0 => Some(Information),
            8 => Some(Disconnect),
            12 => Some(Ack),
            16 => Some(SetNormalResponse),
            20 => Some(InformationCd),
            24 => Some(InformationVch),
            _ => None,
        }
    }

    /// Whether the frame's information field holds a DU TPDU.
    pub fn carries_data(&self) -> bool {
        use self::Unnumbered::*;

        match *self {
            Information | InformationCd | InformationVch => true,
            Disconnect | Ack | SetNormalResponse => false,
        }
    }
}

/// Decoded HDLC control octet.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum HdlcControl {
    /// Numbered information frame.
    Information { recv_seq: u8, send_seq: u8 },
    /// Acknowledgement on the data channel.
    Ack { recv_seq: u8 },
    Supervisory { recv_seq: u8, cmd: Supervisory },
    Unnumbered(Unnumbered),
    /// Control octet with no supported interpretation.
    Unsupported(u8),
}

impl HdlcControl {
    /// Parse the given control octet.
    pub fn from_bits(c: u8) -> HdlcControl {
        let recv_seq = c >> 5;

        if c & 1 == 0 {
            HdlcControl::Information { recv_seq, send_seq: c >> 1 & 0x7 }
        } else if c & 0xF == 0b1101 {
            HdlcControl::Ack { recv_seq }
        } else if c & 0b11 == 0b01 {
            match Supervisory::from_bits(c >> 2 & 0b11) {
                Some(cmd) => HdlcControl::Supervisory { recv_seq, cmd },
                None => HdlcControl::Unsupported(c),
            }
        } else {
            match Unnumbered::from_bits((c & 0xE0) >> 3 | (c & 0x0C) >> 2) {
                Some(u) => HdlcControl::Unnumbered(u),
                None => HdlcControl::Unsupported(c),
            }
        }
    }
}

/// Fields of an HDLC frame within a link block.
pub struct HdlcFrame<'a> {
    pub addr: LinkAddress,
    pub control: HdlcControl,
    /// Information field bits.
    pub info: &'a [u8],
}

impl<'a> HdlcFrame<'a> {
    /// Split the given link block bits into HDLC fields.
    pub fn new(bits: &'a [u8]) -> Result<HdlcFrame<'a>> {
        let start = ADDR_BITS + CONTROL_BITS;

        if bits.len() < start {
            return Err(TetrapolError::BlockTooShort);
        }

        Ok(HdlcFrame {
            addr: LinkAddress::new(&bits[..ADDR_BITS]),
            control: HdlcControl::from_bits(to_int(&bits[ADDR_BITS..start])),
            info: &bits[start..],
        })
    }
}

/// Routes link blocks to the transport decoder according to their HDLC framing.
pub struct LinkDecoder {
    tpdu: TpduDecoder,
}

impl LinkDecoder {
    pub fn new() -> LinkDecoder {
        LinkDecoder {
            tpdu: TpduDecoder::new(),
        }
    }

    /// Throw away any partially reassembled TSDU.
    pub fn reset(&mut self) { self.tpdu.reset(); }

    /// Number of octets held for a TSDU in reassembly, if any.
    pub fn pending(&self) -> Option<usize> { self.tpdu.pending() }

    /// Decode the given block, returning a TSDU if one was completed.
    pub fn decode(&mut self, block: &LinkBlock) -> Result<Option<Tsdu>> {
        let frame = HdlcFrame::new(&block.bits)?;
        let addr = frame.addr;

        debug!("ADDR={}/{}/{:#05x} {:?}", addr.z(), addr.y(), addr.x(), frame.control);

        match frame.control {
            HdlcControl::Information { .. } =>
                self.tpdu.decode_i(frame.info, block.multiframe),
            HdlcControl::Unnumbered(u) if u.carries_data() =>
                self.tpdu.decode_du(frame.info, block.multiframe),
            HdlcControl::Unnumbered(_) | HdlcControl::Ack { .. } |
                HdlcControl::Supervisory { .. } => Ok(None),
            HdlcControl::Unsupported(c) => Err(TetrapolError::UnsupportedControl(c)),
        }
    }
}

impl Default for LinkDecoder {
    fn default() -> Self { LinkDecoder::new() }
}

impl HasStats for LinkDecoder {
    fn stats(&mut self) -> &mut Stats { self.tpdu.stats() }
}
