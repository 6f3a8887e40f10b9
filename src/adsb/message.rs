//! Typed ADS-B messages decoded from raw frames.

use crate::adsb::RawMessage;
use crate::aircraft::{CallSign, IcaoAddress};
use crate::bits::{extract_uint, test_bit};
use crate::units::{self, angle, length, speed};

/// A decoded extended squitter message.
///
/// Each variant carries its full payload; unrecognized or malformed frames
/// simply never become a `Message`.
#[derive(Clone, Debug)]
pub enum Message {
    Identification(IdentificationMessage),
    AirbornePosition(AirbornePositionMessage),
    AirborneVelocity(AirborneVelocityMessage),
}

impl Message {
    /// Decodes `raw` according to its type code, or `None` when the type
    /// code is unrecognized or the payload does not decode.
    pub fn parse(raw: &RawMessage) -> Option<Message> {
        match raw.type_code() {
            1..=4 => IdentificationMessage::of(raw).map(Message::Identification),
            19 => AirborneVelocityMessage::of(raw).map(Message::AirborneVelocity),
            9..=18 | 20..=22 => AirbornePositionMessage::of(raw).map(Message::AirbornePosition),
            _ => None,
        }
    }

    pub fn timestamp_ns(&self) -> u64 {
        match self {
            Message::Identification(m) => m.timestamp_ns,
            Message::AirbornePosition(m) => m.timestamp_ns,
            Message::AirborneVelocity(m) => m.timestamp_ns,
        }
    }

    pub fn icao_address(&self) -> &IcaoAddress {
        match self {
            Message::Identification(m) => &m.icao_address,
            Message::AirbornePosition(m) => &m.icao_address,
            Message::AirborneVelocity(m) => &m.icao_address,
        }
    }
}

/// Aircraft identification: callsign and emitter category (type codes 1-4).
#[derive(Clone, Debug)]
pub struct IdentificationMessage {
    pub timestamp_ns: u64,
    pub icao_address: IcaoAddress,
    pub category: u8,
    pub callsign: CallSign,
}

impl IdentificationMessage {
    pub fn of(raw: &RawMessage) -> Option<Self> {
        let payload = raw.payload();
        let callsign = decode_callsign(payload)?;
        let category = (((14 - raw.type_code()) << 4) | extract_uint(payload, 48, 3)) as u8;
        Some(Self {
            timestamp_ns: raw.timestamp_ns(),
            icao_address: raw.icao_address(),
            category,
            callsign,
        })
    }
}

/// Maps a six-bit character code to its callsign character.
fn decode_six_bit_char(code: u32) -> Option<char> {
    match code {
        1..=26 => Some(char::from(b'A' + (code as u8 - 1))),
        48..=57 => Some(char::from(code as u8)),
        32 => Some(' '),
        _ => None,
    }
}

/// Decodes the eight six-bit characters in payload bits 0..48, most
/// significant character first, stripping trailing spaces.
fn decode_callsign(payload: u64) -> Option<CallSign> {
    let mut callsign = String::with_capacity(8);
    for start in (0..48).step_by(6).rev() {
        callsign.push(decode_six_bit_char(extract_uint(payload, start, 6))?);
    }
    CallSign::new(callsign.trim_end()).ok()
}

/// Airborne position: altitude plus one compact position report
/// (type codes 9-18 and 20-22).
#[derive(Clone, Debug)]
pub struct AirbornePositionMessage {
    pub timestamp_ns: u64,
    pub icao_address: IcaoAddress,
    /// Altitude in meters.
    pub altitude: f64,
    /// CPR format: 0 = even, 1 = odd.
    pub parity: u8,
    /// Normalized CPR longitude, in [0, 1).
    pub x: f64,
    /// Normalized CPR latitude, in [0, 1).
    pub y: f64,
}

/// Bit sources for the realigned altitude word, most significant output
/// bit first. Sorts the Gray-coded 100 ft group into the low three bits
/// and the 500 ft group above it.
const ALTITUDE_REALIGNMENT: [u32; 12] = [4, 2, 0, 10, 8, 6, 5, 3, 1, 11, 9, 7];

impl AirbornePositionMessage {
    pub fn of(raw: &RawMessage) -> Option<Self> {
        let payload = raw.payload();
        let altitude_ft = decode_altitude_ft(extract_uint(payload, 36, 12))?;
        Some(Self {
            timestamp_ns: raw.timestamp_ns(),
            icao_address: raw.icao_address(),
            altitude: units::convert(altitude_ft, length::FOOT, length::METER),
            parity: extract_uint(payload, 34, 1) as u8,
            x: f64::from(extract_uint(payload, 0, 17)) / f64::from(1 << 17),
            y: f64::from(extract_uint(payload, 17, 17)) / f64::from(1 << 17),
        })
    }
}

/// Decodes the 12-bit altitude field to feet, or `None` when the encoding
/// is invalid.
fn decode_altitude_ft(altitude: u32) -> Option<f64> {
    if test_bit(u64::from(altitude), 4) {
        // Q = 1: drop the Q bit, the rest counts 25 ft steps from -1000.
        let msb = extract_uint(u64::from(altitude), 5, 7) << 4;
        let lsb = extract_uint(u64::from(altitude), 0, 4);
        Some(f64::from(-1000 + 25 * (msb | lsb) as i32))
    } else {
        // Q = 0: Gray-coded 100 ft and 500 ft groups, interleaved.
        let realigned = realign_altitude(altitude);
        let mut low = gray_decode(extract_uint(u64::from(realigned), 0, 3), 3);
        let high = gray_decode(extract_uint(u64::from(realigned), 3, 9), 9);
        match low {
            0 | 5 | 6 => return None,
            7 => low = 5,
            _ => {}
        }
        if high % 2 == 1 {
            low = 6 - low;
        }
        Some(f64::from(-1300 + 100 * low as i32 + 500 * high as i32))
    }
}

fn realign_altitude(altitude: u32) -> u32 {
    ALTITUDE_REALIGNMENT
        .iter()
        .fold(0, |word, &bit| (word << 1) | extract_uint(u64::from(altitude), bit, 1))
}

/// Decodes a reflected binary (Gray) code of the given width.
fn gray_decode(code: u32, size: u32) -> u32 {
    let mut value = code;
    for shift in 1..size {
        value ^= code >> shift;
    }
    value
}

/// Airborne velocity over ground or through air (type code 19).
#[derive(Clone, Debug)]
pub struct AirborneVelocityMessage {
    pub timestamp_ns: u64,
    pub icao_address: IcaoAddress,
    /// Speed in meters per second.
    pub speed: f64,
    /// Track (subtypes 1-2) or heading (subtypes 3-4), in radians in
    /// [0, 2π).
    pub track_or_heading: f64,
}

impl AirborneVelocityMessage {
    pub fn of(raw: &RawMessage) -> Option<Self> {
        let payload = raw.payload();
        let subtype = extract_uint(payload, 48, 3);
        let useful = u64::from(extract_uint(payload, 21, 22));
        match subtype {
            1 | 2 => Self::of_ground_speed(useful, subtype, raw),
            3 | 4 => Self::of_airspeed(useful, subtype, raw),
            _ => None,
        }
    }

    fn of_ground_speed(useful: u64, subtype: u32, raw: &RawMessage) -> Option<Self> {
        let mut south_north = extract_uint(useful, 0, 10) as i32 - 1;
        let mut east_west = extract_uint(useful, 11, 10) as i32 - 1;
        if south_north == -1 || east_west == -1 {
            return None;
        }
        // The hypotenuse runs on raw knot counts; subtype 2 trades
        // resolution for range through a four-knot unit.
        let speed_raw = f64::hypot(f64::from(east_west), f64::from(south_north));
        let unit = if subtype == 1 { speed::KNOT } else { 4.0 * speed::KNOT };
        let speed = units::convert_from(speed_raw, unit);

        if test_bit(useful, 10) {
            south_north = -south_north;
        }
        if test_bit(useful, 21) {
            east_west = -east_west;
        }
        let mut track = f64::atan2(f64::from(east_west), f64::from(south_north));
        if track < 0.0 {
            track += angle::TURN;
        }
        Some(Self {
            timestamp_ns: raw.timestamp_ns(),
            icao_address: raw.icao_address(),
            speed,
            track_or_heading: track,
        })
    }

    fn of_airspeed(useful: u64, subtype: u32, raw: &RawMessage) -> Option<Self> {
        // Bit 21 flags heading availability.
        if !test_bit(useful, 21) {
            return None;
        }
        let heading_raw = extract_uint(useful, 11, 10);
        let heading =
            units::convert_from(f64::from(heading_raw) / f64::from(1 << 10), angle::TURN);
        let speed_raw = extract_uint(useful, 0, 10) as i32 - 1;
        if speed_raw == -1 {
            return None;
        }
        let unit = if subtype == 3 { speed::KNOT } else { 4.0 * speed::KNOT };
        Some(Self {
            timestamp_ns: raw.timestamp_ns(),
            icao_address: raw.icao_address(),
            speed: units::convert_from(f64::from(speed_raw), unit),
            track_or_heading: heading,
        })
    }
}
