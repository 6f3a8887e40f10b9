//! Instantaneous signal power from decoded I/Q samples.

use std::io::Read;

use anyhow::{ensure, Result};

use super::samples::SamplesDecoder;

/// The power filter spans the last four I/Q sample pairs.
const RING_SIZE: usize = 8;
/// Ring capacity is a power of two, so wrapping is a single mask.
const RING_MASK: usize = RING_SIZE - 1;

/// Computes instantaneous power values from the sample stream.
///
/// For each incoming I/Q pair, with the eight most recent samples
/// `s0..s7` (oldest first):
///
/// ```text
/// I = s6 - s4 + s2 - s0
/// Q = s7 - s5 + s3 - s1
/// P = I² + Q²
/// ```
pub struct PowerComputer<R> {
    decoder: SamplesDecoder<R>,
    batch_size: usize,
    samples: Vec<i16>,
    ring: [i16; RING_SIZE],
    head: usize,
}

impl<R: Read> PowerComputer<R> {
    pub fn new(stream: R, batch_size: usize) -> Result<Self> {
        ensure!(
            batch_size > 0 && batch_size % RING_SIZE == 0,
            "batch size must be positive and divisible by 8"
        );
        Ok(Self {
            decoder: SamplesDecoder::new(stream, batch_size * 2)?,
            batch_size,
            samples: vec![0; batch_size * 2],
            ring: [0; RING_SIZE],
            head: 0,
        })
    }

    /// Fills `batch` with power values, one per I/Q pair consumed, and
    /// returns how many were produced.
    pub fn read_batch(&mut self, batch: &mut [u32]) -> Result<usize> {
        ensure!(
            batch.len() == self.batch_size,
            "power buffer length {} does not match batch size {}",
            batch.len(),
            self.batch_size
        );
        let samples_read = self.decoder.read_batch(&mut self.samples)?;
        let pairs = samples_read / 2;
        for (slot, pair) in batch[..pairs]
            .iter_mut()
            .zip(self.samples.chunks_exact(2))
        {
            self.ring[self.head] = pair[0];
            self.ring[(self.head + 1) & RING_MASK] = pair[1];
            self.head = (self.head + 2) & RING_MASK;
            // Fixed slot indices: rotating the ring by two flips the sign of
            // I and Q, which squaring cancels.
            let i = i32::from(self.ring[6]) - i32::from(self.ring[4]) + i32::from(self.ring[2])
                - i32::from(self.ring[0]);
            let q = i32::from(self.ring[7]) - i32::from(self.ring[5]) + i32::from(self.ring[3])
                - i32::from(self.ring[1]);
            *slot = (i * i + q * q) as u32;
        }
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_sample(value: i16) -> [u8; 2] {
        ((value + 2048) as u16).to_le_bytes()
    }

    fn encode_samples(values: &[i16]) -> Vec<u8> {
        values.iter().flat_map(|&v| encode_sample(v)).collect()
    }

    #[test]
    fn test_first_power_uses_zero_history() {
        // With only one pair seen, I = -s0 and Q = -s1.
        let bytes = encode_samples(&[3, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let mut computer = PowerComputer::new(bytes.as_slice(), 8).unwrap();
        let mut batch = [0u32; 8];
        assert_eq!(computer.read_batch(&mut batch).unwrap(), 8);
        assert_eq!(batch[0], 25);
    }

    #[test]
    fn test_matches_reference_filter() {
        let samples: Vec<i16> = (0..32).map(|i| (i * 37 % 173) - 86).collect();
        let bytes = encode_samples(&samples);
        let mut computer = PowerComputer::new(bytes.as_slice(), 16).unwrap();
        let mut batch = [0u32; 16];
        assert_eq!(computer.read_batch(&mut batch).unwrap(), 16);

        let sample = |index: isize| -> i32 {
            if index < 0 {
                0
            } else {
                i32::from(samples[index as usize])
            }
        };
        for k in 0..16isize {
            let i = sample(2 * k) - sample(2 * k - 2) + sample(2 * k - 4) - sample(2 * k - 6);
            let q = sample(2 * k + 1) - sample(2 * k - 1) + sample(2 * k - 3) - sample(2 * k - 5);
            assert_eq!(batch[k as usize], (i * i + q * q) as u32, "power {k}");
        }
    }

    #[test]
    fn test_rejects_indivisible_batch_size() {
        let stream: &[u8] = &[];
        assert!(PowerComputer::new(stream, 12).is_err());
        assert!(PowerComputer::new(stream, 0).is_err());
    }
}
