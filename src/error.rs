//! Errors that may occur when decoding TETRAPOL link units.
//!
//! Physical-channel failures (sync loss, unresolvable scrambling) are not errors: they
//! are recovered by the channel state machines and reported as events.

use thiserror::Error;

/// TETRAPOL runtime errors.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum TetrapolError {
    /// A link block was too short to hold the fields its header announced.
    #[error("link block too short")]
    BlockTooShort,
    /// An HDLC control octet with no supported interpretation.
    #[error("unsupported HDLC control octet {0:#04x}")]
    UnsupportedControl(u8),
    /// A DU header with an EXT/SEG combination that can't be decoded.
    #[error("unsupported EXT/SEG combination")]
    InvalidSegmentation,
    /// A segmented DU header with an unsupported extension layout.
    #[error("unsupported TPDU header extension")]
    UnsupportedExtension,
    /// A reserved header bit was set.
    #[error("reserved bit set")]
    ReservedBitSet,
    /// A segmented TPDU in an information frame.
    #[error("segmented information frame")]
    SegmentedInformation,
    /// A length field pointed past the end of the link block.
    #[error("length field past end of block")]
    LengthOverrun,
    /// Reassembled TSDU grew past the reassembly buffer.
    #[error("segment reassembly overflow")]
    SegmentOverflow,
}

/// Standard result using `TetrapolError`.
pub type Result<T> = std::result::Result<T, TetrapolError>;
