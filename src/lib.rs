//! 1090 MHz ADS-B receiver core.
//!
//! Turns a stream of raw IQ samples (or a recorded message capture) into
//! a live model of the aircraft in view: positions, velocities, callsigns
//! and trajectories.
//!
//! The pipeline runs in stages, each pulling from the previous one:
//! sample decoding, power computation, a sliding power window, preamble
//! detection and demodulation, CRC-24 validation, message parsing, CPR
//! position decoding, and per-aircraft state accumulation.

pub mod adsb;
pub mod aircraft;
pub mod bits;
pub mod bytes;
pub mod config;
pub mod geo;
pub mod sdr;
pub mod tracker;
pub mod units;

pub use adsb::{Message, MessageReplay, MessageSource, RawMessage};
pub use config::{Config, InputFormat};
pub use sdr::AdsbDemodulator;
pub use tracker::AircraftStateManager;
