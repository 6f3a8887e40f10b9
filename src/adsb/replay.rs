//! Replay of recorded message captures.
//!
//! A capture file is a sequence of records, each an 8-byte signed
//! big-endian reception timestamp in nanoseconds followed by a 14-byte
//! frame. Replaying one feeds the tracker without the signal chain.

use std::io::{self, Read};

use anyhow::{ensure, Context, Result};

use super::RawMessage;

/// Reads raw messages back from a capture stream.
pub struct MessageReplay<R> {
    stream: R,
}

impl<R: Read> MessageReplay<R> {
    pub fn new(stream: R) -> Self {
        Self { stream }
    }

    /// Returns the next CRC-valid recorded message, skipping corrupted
    /// records, or `None` at end of stream.
    pub fn next_message(&mut self) -> Result<Option<RawMessage>> {
        loop {
            let mut header = [0u8; 8];
            match self.stream.read_exact(&mut header) {
                Ok(()) => {}
                Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
                Err(error) => {
                    return Err(error).context("failed to read capture record timestamp")
                }
            }
            let timestamp_ns = i64::from_be_bytes(header);
            ensure!(
                timestamp_ns >= 0,
                "negative timestamp in capture record: {timestamp_ns}"
            );

            let mut frame = [0u8; RawMessage::LENGTH];
            self.stream
                .read_exact(&mut frame)
                .context("truncated capture record")?;
            if let Some(message) = RawMessage::of(timestamp_ns as u64, &frame) {
                return Ok(Some(message));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(timestamp_ns: i64, frame_hex: &str) -> Vec<u8> {
        let mut bytes = timestamp_ns.to_be_bytes().to_vec();
        bytes.extend_from_slice(&hex::decode(frame_hex).unwrap());
        bytes
    }

    #[test]
    fn test_replays_recorded_messages_in_order() {
        let mut capture = record(1_000, "8D4840D6202CC371C32CE0576098");
        capture.extend(record(2_000, "8D40621D58C382D690C8AC2863A7"));
        let mut replay = MessageReplay::new(capture.as_slice());

        let first = replay.next_message().unwrap().unwrap();
        assert_eq!(first.timestamp_ns(), 1_000);
        assert_eq!(first.icao_address().as_str(), "4840D6");
        let second = replay.next_message().unwrap().unwrap();
        assert_eq!(second.timestamp_ns(), 2_000);
        assert!(replay.next_message().unwrap().is_none());
    }

    #[test]
    fn test_skips_corrupted_record() {
        let mut corrupted = record(1_000, "8D4840D6202CC371C32CE0576098");
        corrupted[10] ^= 0x40;
        corrupted.extend(record(2_000, "8D40621D58C382D690C8AC2863A7"));
        let mut replay = MessageReplay::new(corrupted.as_slice());

        let message = replay.next_message().unwrap().unwrap();
        assert_eq!(message.timestamp_ns(), 2_000);
        assert!(replay.next_message().unwrap().is_none());
    }

    #[test]
    fn test_rejects_negative_timestamp() {
        let capture = record(-1, "8D4840D6202CC371C32CE0576098");
        let mut replay = MessageReplay::new(capture.as_slice());
        assert!(replay.next_message().is_err());
    }

    #[test]
    fn test_truncated_record_is_an_error() {
        let mut capture = record(1_000, "8D4840D6202CC371C32CE0576098");
        capture.truncate(12);
        let mut replay = MessageReplay::new(capture.as_slice());
        assert!(replay.next_message().is_err());
    }
}
