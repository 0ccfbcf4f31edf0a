//! Receiver for the TETRAPOL physical and link layers, from demodulated bits to
//! transport service data units.

#[macro_use]
extern crate log;

#[cfg(feature = "ser")]
#[macro_use]
extern crate serde_derive;

mod buffer;

pub mod bits;
pub mod channel;
pub mod consts;
pub mod error;
pub mod frame;
pub mod hdlc;
pub mod stats;
pub mod sync;
pub mod tpdu;
