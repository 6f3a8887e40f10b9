//! A random-access sliding window over the power stream.

use std::io::Read;

use anyhow::{ensure, Result};

use super::power::PowerComputer;

/// Powers are read from the computer in batches of this many values.
pub const BATCH_SIZE: usize = 1 << 16;

const BATCH_MASK: u64 = BATCH_SIZE as u64 - 1;

/// A fixed-size window over the power stream, advancing one sample at a
/// time while keeping `get` constant-time.
///
/// Two batch-sized buffers are kept: the batch the window head lies in and
/// the one after it. Refilling happens when the window tail reaches the
/// boundary, swapping when the head crosses it, so the window is always
/// fully backed without copying.
pub struct PowerWindow<R> {
    window_size: usize,
    computer: PowerComputer<R>,
    current: Vec<u32>,
    next: Vec<u32>,
    position: u64,
    total_samples_read: u64,
}

impl<R: Read> PowerWindow<R> {
    pub fn new(stream: R, window_size: usize) -> Result<Self> {
        ensure!(
            window_size > 0 && window_size <= BATCH_SIZE,
            "window size must be in 1..={BATCH_SIZE}"
        );
        let mut computer = PowerComputer::new(stream, BATCH_SIZE)?;
        let mut current = vec![0u32; BATCH_SIZE];
        let next = vec![0u32; BATCH_SIZE];
        let total_samples_read = computer.read_batch(&mut current)? as u64;
        Ok(Self {
            window_size,
            computer,
            current,
            next,
            position: 0,
            total_samples_read,
        })
    }

    /// The window width.
    pub fn size(&self) -> usize {
        self.window_size
    }

    /// Absolute index of the first sample in the window.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// True while the window is entirely backed by samples actually read;
    /// turns false on the zero-padded tail at end of stream.
    pub fn is_full(&self) -> bool {
        self.position + self.window_size as u64 <= self.total_samples_read
    }

    fn real_pos(&self) -> usize {
        (self.position & BATCH_MASK) as usize
    }

    /// The power sample at window index `index`.
    pub fn get(&self, index: usize) -> u32 {
        assert!(index < self.window_size, "window index out of bounds");
        let batch_index = ((self.position + index as u64) & BATCH_MASK) as usize;
        if self.real_pos() + index < BATCH_SIZE {
            self.current[batch_index]
        } else {
            self.next[batch_index]
        }
    }

    /// Advances the window by one sample.
    pub fn advance(&mut self) -> Result<()> {
        self.position += 1;
        // The tail has hit the batch boundary: pull the following batch.
        if self.real_pos() + self.window_size - 1 == BATCH_SIZE {
            self.total_samples_read += self.computer.read_batch(&mut self.next)? as u64;
        }
        // The head has crossed the boundary: the next batch becomes current.
        if self.real_pos() == 0 {
            std::mem::swap(&mut self.current, &mut self.next);
        }
        Ok(())
    }

    /// Advances the window by `offset` samples.
    pub fn advance_by(&mut self, offset: usize) -> Result<()> {
        for _ in 0..offset {
            self.advance()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_samples(values: &[i16]) -> Vec<u8> {
        values
            .iter()
            .flat_map(|&v| ((v + 2048) as u16).to_le_bytes())
            .collect()
    }

    /// Deterministic sample generator, wide enough to cross batch
    /// boundaries.
    fn generate_samples(count: usize) -> Vec<i16> {
        let mut state = 0x2545_F491u32;
        (0..count)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                ((state >> 20) % 4096) as i16 - 2048
            })
            .collect()
    }

    /// Straightforward reimplementation of the power filter.
    fn reference_powers(samples: &[i16]) -> Vec<u32> {
        let sample = |index: isize| -> i32 {
            if index < 0 {
                0
            } else {
                i32::from(samples[index as usize])
            }
        };
        (0..samples.len() as isize / 2)
            .map(|k| {
                let i = sample(2 * k) - sample(2 * k - 2) + sample(2 * k - 4) - sample(2 * k - 6);
                let q =
                    sample(2 * k + 1) - sample(2 * k - 1) + sample(2 * k - 3) - sample(2 * k - 5);
                (i * i + q * q) as u32
            })
            .collect()
    }

    #[test]
    fn test_window_tracks_stream_from_start() {
        let samples = generate_samples(2400);
        let powers = reference_powers(&samples);
        let bytes = encode_samples(&samples);
        let mut window = PowerWindow::new(bytes.as_slice(), 8).unwrap();

        assert_eq!(window.size(), 8);
        assert_eq!(window.position(), 0);
        assert!(window.is_full());
        for i in 0..8 {
            assert_eq!(window.get(i), powers[i]);
        }
        window.advance().unwrap();
        assert_eq!(window.position(), 1);
        for i in 0..8 {
            assert_eq!(window.get(i), powers[1 + i]);
        }
    }

    #[test]
    fn test_window_is_stable_across_batch_boundary() {
        // Enough samples for one full batch plus change.
        let samples = generate_samples(2 * (BATCH_SIZE + 4000));
        let powers = reference_powers(&samples);
        let bytes = encode_samples(&samples);
        let window_size = 1200;
        let mut window = PowerWindow::new(bytes.as_slice(), window_size).unwrap();

        window.advance_by(BATCH_SIZE - 600).unwrap();
        let position = window.position() as usize;
        for i in 0..window_size {
            assert_eq!(window.get(i), powers[position + i], "index {i}");
        }

        window.advance_by(1200).unwrap();
        let position = window.position() as usize;
        for i in 0..window_size {
            assert_eq!(window.get(i), powers[position + i], "index {i}");
        }
    }

    #[test]
    fn test_advance_by_zero_is_identity() {
        let samples = generate_samples(2400);
        let bytes = encode_samples(&samples);
        let mut window = PowerWindow::new(bytes.as_slice(), 16).unwrap();
        window.advance_by(37).unwrap();
        let before: Vec<u32> = (0..16).map(|i| window.get(i)).collect();
        window.advance_by(0).unwrap();
        let after: Vec<u32> = (0..16).map(|i| window.get(i)).collect();
        assert_eq!(before, after);
        assert_eq!(window.position(), 37);
    }

    #[test]
    fn test_is_full_turns_false_at_stream_end() {
        // 1300 power samples, window of 1200.
        let samples = generate_samples(2600);
        let bytes = encode_samples(&samples);
        let mut window = PowerWindow::new(bytes.as_slice(), 1200).unwrap();
        window.advance_by(100).unwrap();
        assert!(window.is_full());
        window.advance().unwrap();
        assert!(!window.is_full());
    }

    #[test]
    fn test_rejects_invalid_window_size() {
        let bytes = encode_samples(&generate_samples(16));
        assert!(PowerWindow::new(bytes.as_slice(), 0).is_err());
        let bytes = encode_samples(&generate_samples(16));
        assert!(PowerWindow::new(bytes.as_slice(), BATCH_SIZE + 1).is_err());
    }
}
