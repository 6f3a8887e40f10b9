//! The signal chain: raw receiver bytes to demodulated frames.
//!
//! 1. Decode interleaved 12-bit IQ samples (2.4 MHz sample rate).
//! 2. Compute instantaneous power over a sliding 8-sample filter.
//! 3. Expose a random-access window over the power stream.
//! 4. Detect preambles and slice the 112 payload bits.

mod demod;
mod power;
mod samples;
mod window;

pub use demod::{AdsbDemodulator, DemodStats};
pub use power::PowerComputer;
pub use samples::SamplesDecoder;
pub use window::{PowerWindow, BATCH_SIZE};
