//! Mutable per-aircraft state and trajectory history.

use crate::aircraft::{AircraftData, CallSign, IcaoAddress};
use crate::geo::GeoPos;

/// One sampled point of an aircraft's path.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TrajectoryPoint {
    pub position: GeoPos,
    /// Altitude in meters.
    pub altitude: f64,
}

/// The evolving state of a single aircraft.
///
/// Altitude and velocity start at negative infinity, the "not yet known"
/// sentinel; position and callsign start absent.
pub struct AircraftState {
    icao_address: IcaoAddress,
    data: Option<AircraftData>,
    last_message_timestamp_ns: u64,
    category: u8,
    callsign: Option<CallSign>,
    position: Option<GeoPos>,
    altitude: f64,
    velocity: f64,
    track_or_heading: f64,
    trajectory: Vec<TrajectoryPoint>,
    /// Timestamp of the message that appended the last trajectory point.
    trajectory_timestamp_ns: u64,
}

impl AircraftState {
    pub fn new(icao_address: IcaoAddress, data: Option<AircraftData>) -> Self {
        Self {
            icao_address,
            data,
            last_message_timestamp_ns: 0,
            category: 0,
            callsign: None,
            position: None,
            altitude: f64::NEG_INFINITY,
            velocity: f64::NEG_INFINITY,
            track_or_heading: 0.0,
            trajectory: Vec::new(),
            trajectory_timestamp_ns: 0,
        }
    }

    pub fn icao_address(&self) -> &IcaoAddress {
        &self.icao_address
    }

    /// Registry metadata, when the aircraft is known to the database.
    pub fn data(&self) -> Option<&AircraftData> {
        self.data.as_ref()
    }

    pub fn last_message_timestamp_ns(&self) -> u64 {
        self.last_message_timestamp_ns
    }

    pub fn category(&self) -> u8 {
        self.category
    }

    pub fn callsign(&self) -> Option<&CallSign> {
        self.callsign.as_ref()
    }

    pub fn position(&self) -> Option<GeoPos> {
        self.position
    }

    /// Altitude in meters; negative infinity while unknown.
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    /// Speed in meters per second; negative infinity while unknown.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Track or heading in radians.
    pub fn track_or_heading(&self) -> f64 {
        self.track_or_heading
    }

    pub fn trajectory(&self) -> &[TrajectoryPoint] {
        &self.trajectory
    }

    pub fn set_last_message_timestamp_ns(&mut self, timestamp_ns: u64) {
        self.last_message_timestamp_ns = timestamp_ns;
    }

    pub fn set_category(&mut self, category: u8) {
        self.category = category;
    }

    pub fn set_callsign(&mut self, callsign: CallSign) {
        self.callsign = Some(callsign);
    }

    /// Updates the position, extending the trajectory once altitude is
    /// known.
    pub fn set_position(&mut self, position: GeoPos) {
        self.position = Some(position);
        if self.altitude != f64::NEG_INFINITY {
            self.trajectory.push(TrajectoryPoint {
                position,
                altitude: self.altitude,
            });
            self.trajectory_timestamp_ns = self.last_message_timestamp_ns;
        }
    }

    /// Updates the altitude. When the position is known, either starts the
    /// trajectory or refines the last point in place if it came from the
    /// same message, so each message contributes at most one point.
    pub fn set_altitude(&mut self, altitude: f64) {
        self.altitude = altitude;
        if altitude == f64::NEG_INFINITY {
            return;
        }
        if let Some(position) = self.position {
            match self.trajectory.last_mut() {
                None => self.trajectory.push(TrajectoryPoint { position, altitude }),
                Some(last) if self.last_message_timestamp_ns == self.trajectory_timestamp_ns => {
                    *last = TrajectoryPoint { position, altitude };
                }
                Some(_) => {}
            }
        }
    }

    pub fn set_velocity(&mut self, velocity: f64) {
        self.velocity = velocity;
    }

    pub fn set_track_or_heading(&mut self, track_or_heading: f64) {
        self.track_or_heading = track_or_heading;
    }
}
