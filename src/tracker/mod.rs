//! Aircraft state tracking: accumulation, indexing and staleness.

mod accumulator;
mod manager;
mod state;

pub use accumulator::AircraftStateAccumulator;
pub use manager::{AircraftStateManager, TrackerStats};
pub use state::{AircraftState, TrajectoryPoint};
