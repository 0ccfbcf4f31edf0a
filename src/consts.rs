/// Bits in the frame header (synchronization sequence).
pub const FRAME_HDR_LEN: usize = 8;
/// Bits in the frame payload.
pub const FRAME_DATA_LEN: usize = 152;
/// Bits in a whole frame, header included.
pub const FRAME_LEN: usize = FRAME_HDR_LEN + FRAME_DATA_LEN;
/// Differentially encoded frame synchronization sequence, compared against header bits
/// 1 to 7.
pub const FRAME_DSYNC: [u8; 7] = [1, 0, 1, 0, 0, 1, 1];
/// Maximum combined errors over two consecutive frame synchronization sequences.
pub const MAX_FRAME_SYNC_ERR: usize = 1;
/// Number of frames the bit accumulator can hold.
pub const BUFFER_FRAMES: usize = 10;
/// Bits the accumulator can hold.
pub const BUFFER_BITS: usize = BUFFER_FRAMES * FRAME_LEN;
/// Length of the scrambling sequence.
pub const SCRAMB_LEN: usize = 127;
/// Number of scrambling offsets tried for each frame.
pub const SCRAMB_OFFSETS: usize = 128;
/// Number of symbols in a decoded data frame.
pub const DATA_SYMBOLS: usize = 74;
/// Symbols covered by the data frame CRC.
pub const CRC_COVERAGE: usize = 69;
/// Bits in the data frame CRC.
pub const CRC_BITS: usize = 5;
/// Bits of frame payload forwarded to the superframe layer.
pub const PAYLOAD_BITS: usize = 64;
/// Frames in a full multiframe cycle.
pub const MULTIFRAME_LEN: u8 = 200;
/// Octets the segmentation reassembly buffer can hold.
pub const MAX_TSDU_OCTETS: usize = 1250;
