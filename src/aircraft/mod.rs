//! Aircraft identity: validated value types and registry metadata.

mod database;

pub use database::AircraftDatabase;

use std::fmt;

use anyhow::{ensure, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static ICAO_ADDRESS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[0-9A-F]{6}$").expect("invalid ICAO address pattern"));
static CALLSIGN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Z0-9 ]{0,8}$").expect("invalid callsign pattern"));
static REGISTRATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Z0-9 .?/_+-]+$").expect("invalid registration pattern"));
static TYPE_DESIGNATOR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Z0-9]{2,4}$").expect("invalid type designator pattern"));
static DESCRIPTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new("^[ABDGHLPRSTV-][0123468][EJPT-]$").expect("invalid description pattern")
});

/// A 24-bit ICAO aircraft address, as six uppercase hexadecimal digits.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct IcaoAddress(String);

impl IcaoAddress {
    pub fn new(address: impl Into<String>) -> Result<Self> {
        let address = address.into();
        ensure!(
            ICAO_ADDRESS_PATTERN.is_match(&address),
            "invalid ICAO address: {address:?}"
        );
        Ok(Self(address))
    }

    /// Formats a numeric 24-bit address; always produces a valid value.
    pub(crate) fn from_bits(address: u32) -> Self {
        debug_assert!(address <= 0xFF_FFFF);
        Self(format!("{address:06X}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IcaoAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A flight callsign: up to eight characters among `A-Z`, `0-9` and space.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct CallSign(String);

impl CallSign {
    pub fn new(callsign: impl Into<String>) -> Result<Self> {
        let callsign = callsign.into();
        ensure!(
            CALLSIGN_PATTERN.is_match(&callsign),
            "invalid callsign: {callsign:?}"
        );
        Ok(Self(callsign))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A national aircraft registration mark, e.g. `HB-JDC`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AircraftRegistration(String);

impl AircraftRegistration {
    pub fn new(registration: impl Into<String>) -> Result<Self> {
        let registration = registration.into();
        ensure!(
            REGISTRATION_PATTERN.is_match(&registration),
            "invalid aircraft registration: {registration:?}"
        );
        Ok(Self(registration))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An ICAO type designator, e.g. `A20N`. May be empty when unknown.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AircraftTypeDesignator(String);

impl AircraftTypeDesignator {
    pub fn new(designator: impl Into<String>) -> Result<Self> {
        let designator = designator.into();
        ensure!(
            designator.is_empty() || TYPE_DESIGNATOR_PATTERN.is_match(&designator),
            "invalid type designator: {designator:?}"
        );
        Ok(Self(designator))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An aircraft description code, e.g. `L2J`. May be empty when unknown.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AircraftDescription(String);

impl AircraftDescription {
    pub fn new(description: impl Into<String>) -> Result<Self> {
        let description = description.into();
        ensure!(
            description.is_empty() || DESCRIPTION_PATTERN.is_match(&description),
            "invalid aircraft description: {description:?}"
        );
        Ok(Self(description))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Wake turbulence category from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeTurbulenceCategory {
    Light,
    Medium,
    Heavy,
    Unknown,
}

impl WakeTurbulenceCategory {
    pub fn of(code: &str) -> Self {
        match code {
            "L" => Self::Light,
            "M" => Self::Medium,
            "H" => Self::Heavy,
            _ => Self::Unknown,
        }
    }
}

/// Registry metadata for one aircraft, looked up once per ICAO address.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AircraftData {
    pub registration: AircraftRegistration,
    pub type_designator: AircraftTypeDesignator,
    pub model: String,
    pub description: AircraftDescription,
    pub wake_turbulence_category: WakeTurbulenceCategory,
}
