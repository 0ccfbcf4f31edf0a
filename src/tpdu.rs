//! Transport PDU decoding and reassembly of segmented TSDUs.
//!
//! Unacknowledged data (DU) TPDUs arrive in unnumbered information frames and may be
//! segmented, in which case the segments are collected until the final one arrives.
//! Information frame TPDUs carry connection management and, optionally, data.

use crate::bits::{to_int, Bytes};
use crate::consts::MAX_TSDU_OCTETS;
use crate::error::{Result, TetrapolError};
use crate::stats::{HasStats, Stats};

/// How a TSDU was carried.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(Serialize))]
pub enum TsduSource {
    /// A single unsegmented DU.
    Unsegmented,
    /// A DU reassembled from segments.
    Reassembled,
    /// Data carried in an information frame.
    Information,
}

/// Channel metadata accompanying a TSDU.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(Serialize))]
pub struct TsduContext {
    /// Multiframe counter of the block that started the TSDU.
    pub multiframe: Option<u8>,
    /// DU priority.
    pub prio: Option<u8>,
    /// DU transport service access point.
    pub id_tsap: Option<u8>,
    pub source: TsduSource,
}

/// A complete application message.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(Serialize))]
pub struct Tsdu {
    pub data: Vec<u8>,
    pub ctx: TsduContext,
}

/// Receives complete application messages.
pub trait TsduSink {
    /// Handle the given TSDU bytes.
    fn process(&mut self, tsdu: &[u8], ctx: &TsduContext);
}

/// Header of an unacknowledged data TPDU.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DuHeader {
    pub ext: bool,
    pub seg: bool,
    pub prio: u8,
    pub id_tsap: u8,
}

impl DuHeader {
    /// Parse the header from the first 8 bits of the given TPDU.
    pub fn new(bits: &[u8]) -> DuHeader {
        DuHeader {
            ext: bits[0] == 1,
            seg: bits[1] == 1,
            prio: to_int(&bits[2..4]),
            id_tsap: to_int(&bits[4..8]),
        }
    }
}

/// Connection management function of an information frame TPDU.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TpduCode {
    ConnectRequest,
    ConnectConfirm,
    FastConnectRequest,
    DisconnectRequest,
    FastDisconnectRequest,
    DisconnectConfirm,
    Data,
    DataExpedited,
    Unknown(u8),
}

impl TpduCode {
    /// Parse a code from the given 5 bits.
    pub fn from_bits(bits: u8) -> TpduCode {
        use self::TpduCode::*;

        assert!(bits >> 5 == 0);

        match bits {
            0b00000..=0b00111 => ConnectRequest,
            0b01000..=0b01111 => ConnectConfirm,
            0b10000..=0b10111 => FastConnectRequest,
            24 => DisconnectRequest,
            25 => FastDisconnectRequest,
            26 => DisconnectConfirm,
            27 => Data,
            28 => DataExpedited,
            _ => Unknown(bits),
        }
    }
}

/// Header of an information frame TPDU.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct IHeader {
    pub ext: bool,
    pub seg: bool,
    /// Whether the TPDU carries data.
    pub d: bool,
    pub code: TpduCode,
    pub par_field: u8,
    pub dest_ref: u8,
}

impl IHeader {
    /// Parse the header from the first 16 bits of the given TPDU.
    pub fn new(bits: &[u8]) -> IHeader {
        IHeader {
            ext: bits[0] == 1,
            seg: bits[1] == 1,
            d: bits[2] == 1,
            code: TpduCode::from_bits(to_int(&bits[3..8])),
            par_field: to_int(&bits[8..12]),
            dest_ref: to_int(&bits[12..16]),
        }
    }
}

/// TSDU being reassembled from segments.
struct Reassembly {
    seg_ref: u8,
    multiframe: Option<u8>,
    prio: u8,
    id_tsap: u8,
    octets: Vec<u8>,
}

/// Decodes TPDUs for one channel, holding at most one TSDU in reassembly.
pub struct TpduDecoder {
    cur: Option<Reassembly>,
    stats: Stats,
}

impl TpduDecoder {
    pub fn new() -> TpduDecoder {
        TpduDecoder {
            cur: None,
            stats: Stats::default(),
        }
    }

    /// Throw away any TSDU in reassembly.
    pub fn reset(&mut self) {
        if let Some(r) = self.cur.take() {
            debug!("dropping {} octets of segment {}", r.octets.len(), r.seg_ref);
            self.stats.link.abandoned += 1;
        }
    }

    /// Number of octets collected for the TSDU in reassembly, if any.
    pub fn pending(&self) -> Option<usize> {
        self.cur.as_ref().map(|r| r.octets.len())
    }

    /// Decode an unacknowledged data TPDU, returning a TSDU if one was completed.
    pub fn decode_du(&mut self, bits: &[u8], multiframe: Option<u8>) -> Result<Option<Tsdu>> {
        if bits.len() < 8 {
            return Err(TetrapolError::BlockTooShort);
        }

        let hdr = DuHeader::new(bits);
        let octets = bits.len() / 8;

        if !hdr.ext {
            debug!("DU EXT=0 SEG={} PRIO={} ID_TSAP={} LEN={}",
                   hdr.seg as u8, hdr.prio, hdr.id_tsap, octets);

            if hdr.seg {
                return Err(TetrapolError::InvalidSegmentation);
            }

            // Short DUs fill the block, longer ones give their length.
            let data = if octets > 3 {
                length_prefixed(bits, 8)?
            } else {
                pack(&bits[8..octets * 8])
            };

            return Ok(Some(Tsdu {
                data,
                ctx: TsduContext {
                    multiframe,
                    prio: Some(hdr.prio),
                    id_tsap: Some(hdr.id_tsap),
                    source: TsduSource::Unsegmented,
                },
            }));
        }

        if bits.len() < 24 {
            return Err(TetrapolError::BlockTooShort);
        }

        if bits[8] != 1 || bits[16] != 0 {
            return Err(TetrapolError::UnsupportedExtension);
        }

        if bits[17] != 0 {
            return Err(TetrapolError::ReservedBitSet);
        }

        let seg_ref: u8 = to_int(&bits[9..16]);
        let packet_num: u8 = to_int(&bits[18..24]);

        debug!("DU EXT=1 SEG={} PRIO={} ID_TSAP={} SEGM_REF={} PACKET_NUM={}",
               hdr.seg as u8, hdr.prio, hdr.id_tsap, seg_ref, packet_num);

        if hdr.seg {
            let chunk = pack(&bits[24..octets * 8]);
            self.push(seg_ref, multiframe, &hdr, &chunk)?;
            return Ok(None);
        }

        let chunk = length_prefixed(bits, 24)?;
        self.push(seg_ref, multiframe, &hdr, &chunk)?;

        let r = match self.cur.take() {
            Some(r) => r,
            None => return Ok(None),
        };

        debug!("reassembled {} octets", r.octets.len());

        Ok(Some(Tsdu {
            data: r.octets,
            ctx: TsduContext {
                multiframe: r.multiframe,
                prio: Some(r.prio),
                id_tsap: Some(r.id_tsap),
                source: TsduSource::Reassembled,
            },
        }))
    }

    /// Decode an information frame TPDU, returning a TSDU if it carried data.
    pub fn decode_i(&mut self, bits: &[u8], multiframe: Option<u8>) -> Result<Option<Tsdu>> {
        if bits.len() < 16 {
            return Err(TetrapolError::BlockTooShort);
        }

        let hdr = IHeader::new(bits);

        debug!("I {:?} EXT={} SEG={} D={} PAR_FIELD={} DEST_REF={}",
               hdr.code, hdr.ext as u8, hdr.seg as u8, hdr.d as u8, hdr.par_field,
               hdr.dest_ref);

        // TODO: reassemble segmented information frames once their segment header layout
        // is known.
        if hdr.seg {
            return Err(TetrapolError::SegmentedInformation);
        }

        if !hdr.d {
            return Ok(None);
        }

        Ok(Some(Tsdu {
            data: length_prefixed(bits, 16)?,
            ctx: TsduContext {
                multiframe,
                prio: None,
                id_tsap: None,
                source: TsduSource::Information,
            },
        }))
    }

    /// Append a segment to the TSDU in reassembly, starting a new one if needed.
    fn push(&mut self, seg_ref: u8, multiframe: Option<u8>, hdr: &DuHeader, chunk: &[u8])
        -> Result<()>
    {
        let stale = match self.cur {
            Some(ref r) => r.seg_ref != seg_ref,
            None => false,
        };

        if stale {
            warn!("segment reassembly interrupted by segment {}", seg_ref);
            self.reset();
        }

        let fits = {
            let r = self.cur.get_or_insert_with(|| Reassembly {
                seg_ref,
                multiframe,
                prio: hdr.prio,
                id_tsap: hdr.id_tsap,
                octets: Vec::new(),
            });

            if r.octets.len() + chunk.len() > MAX_TSDU_OCTETS {
                false
            } else {
                r.octets.extend_from_slice(chunk);
                true
            }
        };

        if fits {
            Ok(())
        } else {
            self.cur = None;
            Err(TetrapolError::SegmentOverflow)
        }
    }
}

impl Default for TpduDecoder {
    fn default() -> Self { TpduDecoder::new() }
}

impl HasStats for TpduDecoder {
    fn stats(&mut self) -> &mut Stats { &mut self.stats }
}

/// Extract the octets following the 8-bit octet count at the given bit position.
fn length_prefixed(bits: &[u8], pos: usize) -> Result<Vec<u8>> {
    if bits.len() < pos + 8 {
        return Err(TetrapolError::BlockTooShort);
    }

    let len = to_int::<usize>(&bits[pos..pos + 8]);
    let start = pos + 8;
    let stop = start + len * 8;

    if stop > bits.len() {
        return Err(TetrapolError::LengthOverrun);
    }

    Ok(pack(&bits[start..stop]))
}

fn pack(bits: &[u8]) -> Vec<u8> {
    Bytes::new(bits.iter().cloned()).collect()
}

#[cfg(test)]
pub mod test_tpdu {
    use crate::bits::Bits;

    /// Expand bytes into bits.
    pub fn bits(bytes: &[u8]) -> Vec<u8> {
        Bits::new(bytes.iter().cloned()).collect()
    }

    /// Build a DU segment header with the given SEG bit, segmentation reference, and
    /// packet number.
    pub fn segment(seg: bool, seg_ref: u8, packet: u8) -> Vec<u8> {
        bits(&[
            0b1000_0101 | (seg as u8) << 6,
            0b1000_0000 | seg_ref,
            packet,
        ])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use super::test_tpdu::*;

    #[test]
    fn test_du_header() {
        let h = DuHeader::new(&bits(&[0b0110_1001]));
        assert!(!h.ext);
        assert!(h.seg);
        assert_eq!(h.prio, 0b10);
        assert_eq!(h.id_tsap, 0b1001);
    }

    #[test]
    fn test_tpdu_code() {
        assert_eq!(TpduCode::from_bits(0b00101), TpduCode::ConnectRequest);
        assert_eq!(TpduCode::from_bits(0b01010), TpduCode::ConnectConfirm);
        assert_eq!(TpduCode::from_bits(0b10001), TpduCode::FastConnectRequest);
        assert_eq!(TpduCode::from_bits(24), TpduCode::DisconnectRequest);
        assert_eq!(TpduCode::from_bits(25), TpduCode::FastDisconnectRequest);
        assert_eq!(TpduCode::from_bits(26), TpduCode::DisconnectConfirm);
        assert_eq!(TpduCode::from_bits(27), TpduCode::Data);
        assert_eq!(TpduCode::from_bits(28), TpduCode::DataExpedited);
        assert_eq!(TpduCode::from_bits(30), TpduCode::Unknown(30));
    }

    #[test]
    fn test_du_short() {
        let mut d = TpduDecoder::new();
        let t = d.decode_du(&bits(&[0b0001_0011, 0xAB, 0xCD]), Some(7)).unwrap().unwrap();

        assert_eq!(t.data, vec![0xAB, 0xCD]);
        assert_eq!(t.ctx, TsduContext {
            multiframe: Some(7),
            prio: Some(1),
            id_tsap: Some(3),
            source: TsduSource::Unsegmented,
        });
        assert!(d.pending().is_none());
    }

    #[test]
    fn test_du_long() {
        let mut d = TpduDecoder::new();
        let t = d.decode_du(&bits(&[0x02, 3, 1, 2, 3, 0xff, 0xff]), None).unwrap().unwrap();

        assert_eq!(t.data, vec![1, 2, 3]);
        assert_eq!(t.ctx.id_tsap, Some(2));
        assert!(d.pending().is_none());

        assert_eq!(d.decode_du(&bits(&[0x02, 9, 1, 2, 3]), None),
                   Err(TetrapolError::LengthOverrun));
    }

    #[test]
    fn test_reassembly() {
        let mut d = TpduDecoder::new();

        let mut s1 = segment(true, 17, 0);
        s1.extend(bits(&[1, 2, 3]));
        let mut s2 = segment(true, 17, 1);
        s2.extend(bits(&[4, 5]));
        let mut s3 = segment(false, 17, 2);
        s3.extend(bits(&[2, 6, 7, 0xEE, 0xEE]));

        assert_eq!(d.decode_du(&s1, Some(10)), Ok(None));
        assert_eq!(d.pending(), Some(3));
        assert_eq!(d.decode_du(&s2, Some(11)), Ok(None));
        assert_eq!(d.pending(), Some(5));

        let t = d.decode_du(&s3, Some(12)).unwrap().unwrap();
        assert_eq!(t.data, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(t.ctx.multiframe, Some(10));
        assert_eq!(t.ctx.source, TsduSource::Reassembled);
        assert_eq!(t.ctx.id_tsap, Some(5));
        assert!(d.pending().is_none());

        // Nothing is left over for the next TSDU.
        let mut s4 = segment(false, 17, 0);
        s4.extend(bits(&[1, 9]));
        assert_eq!(d.decode_du(&s4, None).unwrap().unwrap().data, vec![9]);
    }

    #[test]
    fn test_new_reference_abandons() {
        let mut d = TpduDecoder::new();

        let mut s1 = segment(true, 1, 0);
        s1.extend(bits(&[1, 2, 3]));
        let mut s2 = segment(false, 2, 0);
        s2.extend(bits(&[1, 8]));

        assert_eq!(d.decode_du(&s1, None), Ok(None));
        assert_eq!(d.decode_du(&s2, None).unwrap().unwrap().data, vec![8]);
        assert_eq!(d.stats().link.abandoned, 1);
    }

    #[test]
    fn test_reset() {
        let mut d = TpduDecoder::new();

        let mut s1 = segment(true, 1, 0);
        s1.extend(bits(&[1, 2, 3]));

        assert_eq!(d.decode_du(&s1, None), Ok(None));
        d.reset();
        assert!(d.pending().is_none());

        let mut s2 = segment(false, 1, 1);
        s2.extend(bits(&[1, 4]));
        assert_eq!(d.decode_du(&s2, None).unwrap().unwrap().data, vec![4]);
    }

    #[test]
    fn test_overflow() {
        let mut d = TpduDecoder::new();
        let mut seg = segment(true, 3, 0);
        seg.extend(bits(&[0x55; 250]));

        for _ in 0..5 {
            assert_eq!(d.decode_du(&seg, None), Ok(None));
        }

        assert_eq!(d.pending(), Some(1250));
        assert_eq!(d.decode_du(&seg, None), Err(TetrapolError::SegmentOverflow));
        assert!(d.pending().is_none());
    }

    #[test]
    fn test_malformed_du() {
        let mut d = TpduDecoder::new();

        assert_eq!(d.decode_du(&bits(&[0x80]), None), Err(TetrapolError::BlockTooShort));
        assert_eq!(d.decode_du(&bits(&[0x40, 0]), None),
                   Err(TetrapolError::InvalidSegmentation));
        assert_eq!(d.decode_du(&bits(&[0x80, 0x01, 0x00, 0]), None),
                   Err(TetrapolError::UnsupportedExtension));
        assert_eq!(d.decode_du(&bits(&[0x80, 0x81, 0x80, 0]), None),
                   Err(TetrapolError::UnsupportedExtension));
        assert_eq!(d.decode_du(&bits(&[0x80, 0x81, 0x40, 0]), None),
                   Err(TetrapolError::ReservedBitSet));
        assert!(d.pending().is_none());
    }

    #[test]
    fn test_information() {
        let mut d = TpduDecoder::new();

        // D=1, DT, length 2.
        let t = d.decode_i(&bits(&[0b0011_1011, 0x12, 2, 0xA, 0xB]), Some(4)).unwrap().unwrap();
        assert_eq!(t.data, vec![0xA, 0xB]);
        assert_eq!(t.ctx.source, TsduSource::Information);
        assert_eq!(t.ctx.multiframe, Some(4));
        assert_eq!(t.ctx.prio, None);

        // Connect request without data.
        assert_eq!(d.decode_i(&bits(&[0b0000_0001, 0x00]), None), Ok(None));

        assert_eq!(d.decode_i(&bits(&[0b0111_1011, 0, 1, 0]), None),
                   Err(TetrapolError::SegmentedInformation));
        assert_eq!(d.decode_i(&bits(&[0b0011_1011]), None), Err(TetrapolError::BlockTooShort));
    }

    #[test]
    fn test_i_header() {
        let h = IHeader::new(&bits(&[0b1011_1011, 0b0110_1001]));
        assert!(h.ext);
        assert!(!h.seg);
        assert!(h.d);
        assert_eq!(h.code, TpduCode::Data);
        assert_eq!(h.par_field, 0b0110);
        assert_eq!(h.dest_ref, 0b1001);
    }
}
