//! Accumulation of messages into a single aircraft's state.

use super::state::AircraftState;
use crate::adsb::{cpr, AirbornePositionMessage, Message};

/// Position reports older than this cannot be paired for decoding.
const MAX_POSITION_PAIR_AGE_NS: u64 = 10_000_000_000;

/// Folds the message stream of one aircraft into its state, pairing even
/// and odd position reports for CPR decoding.
pub struct AircraftStateAccumulator {
    state: AircraftState,
    /// The most recent position message of each parity (0 even, 1 odd).
    position_messages: [Option<AirbornePositionMessage>; 2],
}

impl AircraftStateAccumulator {
    pub fn new(state: AircraftState) -> Self {
        Self {
            state,
            position_messages: [None, None],
        }
    }

    pub fn state(&self) -> &AircraftState {
        &self.state
    }

    /// Applies `message` to the aircraft state.
    pub fn update(&mut self, message: &Message) {
        self.state
            .set_last_message_timestamp_ns(message.timestamp_ns());
        match message {
            Message::Identification(message) => {
                self.state.set_category(message.category);
                self.state.set_callsign(message.callsign.clone());
            }
            Message::AirbornePosition(message) => {
                self.state.set_altitude(message.altitude);
                self.position_messages[usize::from(message.parity)] = Some(message.clone());
                self.decode_position(message.parity);
            }
            Message::AirborneVelocity(message) => {
                self.state.set_velocity(message.speed);
                self.state.set_track_or_heading(message.track_or_heading);
            }
        }
    }

    /// Attempts a global CPR decode with the stored even/odd pair, the
    /// message of parity `most_recent` being the newer one.
    fn decode_position(&mut self, most_recent: u8) {
        let (Some(even), Some(odd)) = (&self.position_messages[0], &self.position_messages[1])
        else {
            return;
        };
        if even.timestamp_ns.abs_diff(odd.timestamp_ns) > MAX_POSITION_PAIR_AGE_NS {
            return;
        }
        if let Some(position) = cpr::decode_position(even.x, even.y, odd.x, odd.y, most_recent) {
            self.state.set_position(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adsb::RawMessage;
    use crate::aircraft::IcaoAddress;
    use crate::bytes::ByteString;

    const EVEN_FRAME: &str = "8D40621D58C382D690C8AC2863A7";
    const ODD_FRAME: &str = "8D40621D58C386435CC412692AD6";
    const IDENTIFICATION_FRAME: &str = "8D4840D6202CC371C32CE0576098";

    fn message(frame_hex: &str, timestamp_ns: u64) -> Message {
        let bytes = hex::decode(frame_hex).unwrap();
        let raw = RawMessage::new(timestamp_ns, ByteString::new(&bytes));
        Message::parse(&raw).expect("test frame did not parse")
    }

    fn accumulator(icao: &str) -> AircraftStateAccumulator {
        AircraftStateAccumulator::new(AircraftState::new(IcaoAddress::new(icao).unwrap(), None))
    }

    #[test]
    fn test_single_report_fixes_no_position() {
        let mut accumulator = accumulator("40621D");
        accumulator.update(&message(EVEN_FRAME, 0));
        assert!(accumulator.state().position().is_none());
        // The altitude is available immediately though.
        assert!((accumulator.state().altitude() - 38_000.0 * 0.3048).abs() < 1e-9);
    }

    #[test]
    fn test_even_odd_pair_fixes_position() {
        let mut accumulator = accumulator("40621D");
        accumulator.update(&message(EVEN_FRAME, 0));
        accumulator.update(&message(ODD_FRAME, 1_000_000_000));
        let position = accumulator.state().position().expect("no position");
        // Decoded at the odd report: 52.2658°N, 3.9389°E.
        assert!((position.latitude().to_degrees() - 52.265780).abs() < 1e-4);
        assert!((position.longitude().to_degrees() - 3.938913).abs() < 1e-4);
        assert_eq!(accumulator.state().trajectory().len(), 1);
    }

    #[test]
    fn test_pair_at_exactly_ten_seconds_is_accepted() {
        let mut accumulator = accumulator("40621D");
        accumulator.update(&message(EVEN_FRAME, 0));
        accumulator.update(&message(ODD_FRAME, 10_000_000_000));
        assert!(accumulator.state().position().is_some());
    }

    #[test]
    fn test_pair_older_than_ten_seconds_is_rejected() {
        let mut accumulator = accumulator("40621D");
        accumulator.update(&message(EVEN_FRAME, 0));
        accumulator.update(&message(ODD_FRAME, 10_000_000_001));
        assert!(accumulator.state().position().is_none());
    }

    #[test]
    fn test_identification_sets_callsign_and_category() {
        let mut accumulator = accumulator("4840D6");
        accumulator.update(&message(IDENTIFICATION_FRAME, 5_000));
        let state = accumulator.state();
        assert_eq!(state.callsign().unwrap().as_str(), "KLM1023");
        assert_eq!(state.category(), 160);
        assert_eq!(state.last_message_timestamp_ns(), 5_000);
    }

    #[test]
    fn test_velocity_sets_speed_and_track() {
        let mut accumulator = accumulator("4B17E5");
        accumulator.update(&message("8D4B17E5991108AECDA07D743C27", 0));
        let state = accumulator.state();
        assert!((state.velocity() - 234.790776).abs() < 1e-4);
        assert!((state.track_or_heading() - 2.527456).abs() < 1e-4);
    }

    #[test]
    fn test_position_stream_extends_trajectory_per_message() {
        let mut accumulator = accumulator("40621D");
        accumulator.update(&message(EVEN_FRAME, 0));
        accumulator.update(&message(ODD_FRAME, 1_000_000_000));
        accumulator.update(&message(EVEN_FRAME, 2_000_000_000));
        let state = accumulator.state();
        assert_eq!(state.trajectory().len(), 2);
        assert_eq!(state.last_message_timestamp_ns(), 2_000_000_000);
    }
}
