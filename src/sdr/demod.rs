//! Mode S preamble detection and frame demodulation.
//!
//! At 10 power samples per microsecond, the 8 µs preamble puts pulses at
//! sample offsets 0, 10, 35 and 45. Payload bits follow from offset 80,
//! pulse-position modulated at 10 samples per bit: energy in the first
//! half of the bit period means 1, in the second half 0.

use std::io::Read;

use anyhow::Result;
use tracing::trace;

use super::window::PowerWindow;
use crate::adsb::RawMessage;

/// 120 µs: the preamble plus the 112-bit payload.
const WINDOW_SIZE: usize = 1200;

/// One power sample every 100 ns.
const NS_PER_SAMPLE: u64 = 100;

/// Offset of the first payload bit within the window.
const BITS_START: usize = 80;
const SAMPLES_PER_BIT: usize = 10;

/// Running counters for the demodulator front end.
#[derive(Debug, Default, Clone)]
pub struct DemodStats {
    pub preambles_detected: u64,
    pub frames_decoded: u64,
    pub format_mismatches: u64,
    pub crc_failures: u64,
}

/// Pulls raw ADS-B messages out of a 12-bit IQ sample stream.
pub struct AdsbDemodulator<R> {
    window: PowerWindow<R>,
    frame: [u8; RawMessage::LENGTH],
    stats: DemodStats,
}

impl<R: Read> AdsbDemodulator<R> {
    pub fn new(samples: R) -> Result<Self> {
        Ok(Self {
            window: PowerWindow::new(samples, WINDOW_SIZE)?,
            frame: [0; RawMessage::LENGTH],
            stats: DemodStats::default(),
        })
    }

    pub fn stats(&self) -> &DemodStats {
        &self.stats
    }

    /// Sum of the four preamble pulse positions at window offset `offset`.
    fn peaks(&self, offset: usize) -> u32 {
        self.window.get(offset)
            + self.window.get(10 + offset)
            + self.window.get(35 + offset)
            + self.window.get(45 + offset)
    }

    /// Sum of the six quiet positions between and after the pulses.
    fn valleys(&self) -> u32 {
        self.window.get(5)
            + self.window.get(15)
            + self.window.get(20)
            + self.window.get(25)
            + self.window.get(30)
            + self.window.get(40)
    }

    /// Value of payload bit `index` under pulse-position modulation.
    fn bit(&self, index: usize) -> u8 {
        let first_half = self.window.get(BITS_START + SAMPLES_PER_BIT * index);
        let second_half = self.window.get(BITS_START + 5 + SAMPLES_PER_BIT * index);
        u8::from(first_half >= second_half)
    }

    /// Payload byte `index`, assembled MSB-first.
    fn byte(&self, index: usize) -> u8 {
        (0..8).fold(0, |byte, bit| (byte << 1) | self.bit(index * 8 + bit))
    }

    /// Returns the next valid raw message in the stream, or `None` once the
    /// remaining samples cannot hold a full transmission.
    pub fn next_message(&mut self) -> Result<Option<RawMessage>> {
        let mut previous_peaks = 0u32;
        let mut current_peaks = self.peaks(0);

        while self.window.is_full() {
            // A preamble candidate is a strict local maximum of the pulse
            // sum that dominates the valley sum by a factor of two.
            if previous_peaks < current_peaks
                && current_peaks > self.peaks(1)
                && current_peaks >= 2 * self.valleys()
            {
                self.stats.preambles_detected += 1;
                self.frame[0] = self.byte(0);
                if RawMessage::size(self.frame[0]) == RawMessage::LENGTH {
                    for index in 1..RawMessage::LENGTH {
                        self.frame[index] = self.byte(index);
                    }
                    let timestamp_ns = self.window.position() * NS_PER_SAMPLE;
                    if let Some(message) = RawMessage::of(timestamp_ns, &self.frame) {
                        self.stats.frames_decoded += 1;
                        trace!(
                            timestamp_ns,
                            frame = %message.bytes(),
                            "frame demodulated"
                        );
                        // Skip the whole transmission so its bit pulses are
                        // not probed for further preambles.
                        self.window.advance_by(WINDOW_SIZE)?;
                        return Ok(Some(message));
                    }
                    self.stats.crc_failures += 1;
                } else {
                    self.stats.format_mismatches += 1;
                }
            }
            previous_peaks = current_peaks;
            current_peaks = self.peaks(1);
            self.window.advance()?;
        }
        Ok(None)
    }
}
