//! Decoding of raw receiver bytes into signed samples.

use std::io::{self, Read};

use anyhow::{ensure, Context, Result};

/// Offset removed from each raw sample to recenter it around zero.
const BIAS: i32 = 2048;

/// Decodes the receiver byte stream into signed 16-bit samples.
///
/// Each sample arrives as an unsigned 12-bit value packed in two bytes,
/// low byte first. Samples are read in fixed-size batches.
pub struct SamplesDecoder<R> {
    stream: R,
    batch_size: usize,
    buffer: Vec<u8>,
}

impl<R: Read> SamplesDecoder<R> {
    pub fn new(stream: R, batch_size: usize) -> Result<Self> {
        ensure!(batch_size > 0, "batch size must be positive");
        Ok(Self {
            stream,
            batch_size,
            buffer: vec![0; batch_size * 2],
        })
    }

    /// Fills `batch` with decoded samples and returns how many were
    /// produced; fewer than `batch_size` only at end of stream.
    pub fn read_batch(&mut self, batch: &mut [i16]) -> Result<usize> {
        ensure!(
            batch.len() == self.batch_size,
            "sample buffer length {} does not match batch size {}",
            batch.len(),
            self.batch_size
        );
        let bytes_read = read_fully(&mut self.stream, &mut self.buffer)
            .context("failed to read samples from stream")?;
        let samples = bytes_read / 2;
        for (slot, bytes) in batch[..samples]
            .iter_mut()
            .zip(self.buffer.chunks_exact(2))
        {
            let raw = u16::from_le_bytes([bytes[0], bytes[1]]);
            *slot = (i32::from(raw) - BIAS) as i16;
        }
        Ok(samples)
    }
}

/// Reads until `buffer` is full or the stream ends, whichever comes first.
fn read_fully<R: Read>(stream: &mut R, buffer: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match stream.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        }
    }
    Ok(filled)
}
