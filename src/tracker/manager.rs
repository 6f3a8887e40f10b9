//! The live set of tracked aircraft.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;

use anyhow::Result;
use tracing::debug;

use super::accumulator::AircraftStateAccumulator;
use super::state::AircraftState;
use crate::adsb::Message;
use crate::aircraft::{AircraftDatabase, IcaoAddress};

/// Aircraft silent for longer than this are purged (stream time).
const AIRCRAFT_TIMEOUT_NS: u64 = 60_000_000_000;

/// Indexes state accumulators by ICAO address and maintains the set of
/// aircraft with a determined position.
pub struct AircraftStateManager {
    accumulators: HashMap<IcaoAddress, AircraftStateAccumulator>,
    /// Aircraft admitted to the visible set: position known at least once.
    known: HashSet<IcaoAddress>,
    database: AircraftDatabase,
    last_update_timestamp_ns: u64,
    messages_processed: u64,
}

impl AircraftStateManager {
    pub fn new(database: AircraftDatabase) -> Self {
        Self {
            accumulators: HashMap::new(),
            known: HashSet::new(),
            database,
            last_update_timestamp_ns: 0,
            messages_processed: 0,
        }
    }

    /// Routes `message` to its aircraft's accumulator, creating the
    /// aircraft (with a one-shot metadata lookup) on first sight. Returns
    /// the updated state.
    pub fn update_with_message(&mut self, message: &Message) -> Result<&AircraftState> {
        self.last_update_timestamp_ns = message.timestamp_ns();
        self.messages_processed += 1;

        let address = message.icao_address().clone();
        let accumulator = match self.accumulators.entry(address.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let data = self.database.get(&address)?;
                debug!(icao = %address, known = data.is_some(), "tracking new aircraft");
                entry.insert(AircraftStateAccumulator::new(AircraftState::new(
                    address.clone(),
                    data,
                )))
            }
        };
        accumulator.update(message);
        if accumulator.state().position().is_some() {
            self.known.insert(address);
        }
        Ok(accumulator.state())
    }

    /// Drops every aircraft not heard from in the last minute of stream
    /// time, from the accumulator index and the visible set alike.
    pub fn purge(&mut self) {
        let horizon = self.last_update_timestamp_ns;
        self.accumulators.retain(|_, accumulator| {
            horizon.saturating_sub(accumulator.state().last_message_timestamp_ns())
                <= AIRCRAFT_TIMEOUT_NS
        });
        let accumulators = &self.accumulators;
        self.known
            .retain(|address| accumulators.contains_key(address));
    }

    /// States of all aircraft whose position has been determined.
    pub fn known_aircraft(&self) -> impl Iterator<Item = &AircraftState> {
        self.known
            .iter()
            .filter_map(|address| self.accumulators.get(address))
            .map(AircraftStateAccumulator::state)
    }

    /// Number of aircraft currently tracked, positioned or not.
    pub fn aircraft_count(&self) -> usize {
        self.accumulators.len()
    }

    /// Number of aircraft in the visible set.
    pub fn known_count(&self) -> usize {
        self.known.len()
    }

    pub fn stats_summary(&self) -> TrackerStats {
        TrackerStats {
            tracked: self.accumulators.len(),
            visible: self.known.len(),
            messages: self.messages_processed,
        }
    }
}

/// Aggregate tracking counters for periodic reporting.
#[derive(Debug, Clone, Copy)]
pub struct TrackerStats {
    pub tracked: usize,
    pub visible: usize,
    pub messages: u64,
}

impl fmt::Display for TrackerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} aircraft tracked, {} with position, {} messages",
            self.tracked, self.visible, self.messages
        )
    }
}
