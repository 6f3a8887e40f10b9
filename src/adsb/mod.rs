//! ADS-B frame validation, parsing and position decoding.

pub mod cpr;
mod crc;
mod message;
mod raw;
mod replay;

pub use crc::{Crc24, GENERATOR};
pub use message::{
    AirbornePositionMessage, AirborneVelocityMessage, IdentificationMessage, Message,
};
pub use raw::RawMessage;
pub use replay::MessageReplay;

use std::io::Read;

use anyhow::Result;

use crate::sdr::AdsbDemodulator;

/// A pull-based source of raw ADS-B messages.
///
/// Both the demodulator and capture replay produce the same stream shape:
/// the next valid frame, or `None` once the input is exhausted.
pub trait MessageSource {
    fn next_message(&mut self) -> Result<Option<RawMessage>>;
}

impl<R: Read> MessageSource for AdsbDemodulator<R> {
    fn next_message(&mut self) -> Result<Option<RawMessage>> {
        AdsbDemodulator::next_message(self)
    }
}

impl<R: Read> MessageSource for MessageReplay<R> {
    fn next_message(&mut self) -> Result<Option<RawMessage>> {
        MessageReplay::next_message(self)
    }
}
