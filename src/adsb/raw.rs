//! Raw 112-bit ADS-B frames.

use once_cell::sync::Lazy;

use super::crc::{self, Crc24};
use crate::aircraft::IcaoAddress;
use crate::bits;
use crate::bytes::ByteString;

static CRC: Lazy<Crc24> = Lazy::new(|| Crc24::new(crc::GENERATOR));

/// Extended squitter is the only downlink format this receiver decodes.
const DOWNLINK_FORMAT_EXTENDED_SQUITTER: u32 = 17;

const PAYLOAD_BITS: u32 = 56;
const TYPE_CODE_BITS: u32 = 5;

/// A timestamped, CRC-checked 14-byte Mode S frame.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RawMessage {
    timestamp_ns: u64,
    bytes: ByteString,
}

impl RawMessage {
    /// Length of an extended squitter frame in bytes.
    pub const LENGTH: usize = 14;

    /// Wraps a frame without validating its CRC. Panics when `bytes` is not
    /// exactly 14 bytes long.
    pub fn new(timestamp_ns: u64, bytes: ByteString) -> Self {
        assert_eq!(bytes.len(), Self::LENGTH, "raw message must be 14 bytes");
        Self {
            timestamp_ns,
            bytes,
        }
    }

    /// Wraps a frame when its CRC checks out, `None` otherwise.
    pub fn of(timestamp_ns: u64, bytes: &[u8; Self::LENGTH]) -> Option<Self> {
        (CRC.crc(bytes) == 0).then(|| Self::new(timestamp_ns, ByteString::new(bytes)))
    }

    /// Frame length implied by the first byte: 14 for extended squitter,
    /// 0 for everything else.
    pub fn size(byte0: u8) -> usize {
        if bits::extract_uint(u64::from(byte0), 3, 5) == DOWNLINK_FORMAT_EXTENDED_SQUITTER {
            Self::LENGTH
        } else {
            0
        }
    }

    /// The type code carried in the top five payload bits.
    pub fn type_code_of(payload: u64) -> u32 {
        bits::extract_uint(payload, PAYLOAD_BITS - TYPE_CODE_BITS, TYPE_CODE_BITS)
    }

    /// Reception time, in nanoseconds since the start of the stream.
    pub fn timestamp_ns(&self) -> u64 {
        self.timestamp_ns
    }

    pub fn bytes(&self) -> &ByteString {
        &self.bytes
    }

    /// The five-bit downlink format in byte 0.
    pub fn downlink_format(&self) -> u32 {
        bits::extract_uint(u64::from(self.bytes.byte_at(0)), 3, 5)
    }

    /// The transmitting aircraft's ICAO address (bytes 1 to 3).
    pub fn icao_address(&self) -> IcaoAddress {
        IcaoAddress::from_bits(self.bytes.bytes_in_range(1, 4) as u32)
    }

    /// The 56-bit message payload (bytes 4 to 10).
    pub fn payload(&self) -> u64 {
        self.bytes.bytes_in_range(4, 11)
    }

    pub fn type_code(&self) -> u32 {
        Self::type_code_of(self.payload())
    }
}
