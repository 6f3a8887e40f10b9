//! Lookup of aircraft metadata in the registry archive.
//!
//! The registry is a ZIP of CSV files named after the last two hexadecimal
//! digits of the ICAO address (`AB.csv` holds every address ending in `AB`).
//! Rows are `icao,registration,type,model,description,wake` and sorted by
//! address, so a scan can stop as soon as it passes the sought key.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use zip::result::ZipError;
use zip::ZipArchive;

use super::{
    AircraftData, AircraftDescription, AircraftRegistration, AircraftTypeDesignator, IcaoAddress,
    WakeTurbulenceCategory,
};

pub struct AircraftDatabase {
    path: PathBuf,
}

impl AircraftDatabase {
    /// Points the database at a registry archive. The file is opened lazily
    /// on each lookup, never at construction.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Fetches the metadata for `address`, or `None` when the registry does
    /// not know the aircraft.
    pub fn get(&self, address: &IcaoAddress) -> Result<Option<AircraftData>> {
        let file = File::open(&self.path)
            .with_context(|| format!("failed to open aircraft database {:?}", self.path))?;
        let mut archive = ZipArchive::new(BufReader::new(file))
            .with_context(|| format!("failed to read aircraft database {:?}", self.path))?;

        let entry_name = format!("{}.csv", &address.as_str()[4..]);
        let entry = match archive.by_name(&entry_name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(error) => {
                return Err(error).with_context(|| format!("failed to open entry {entry_name}"))
            }
        };

        for line in BufReader::new(entry).lines() {
            let line = line.context("failed to read aircraft database entry")?;
            let columns: Vec<&str> = line.split(',').collect();
            ensure!(columns.len() >= 6, "malformed aircraft database row: {line:?}");
            if columns[0] == address.as_str() {
                return Ok(Some(AircraftData {
                    registration: AircraftRegistration::new(columns[1])?,
                    type_designator: AircraftTypeDesignator::new(columns[2])?,
                    model: columns[3].to_string(),
                    description: AircraftDescription::new(columns[4])?,
                    wake_turbulence_category: WakeTurbulenceCategory::of(columns[5]),
                }));
            }
            if columns[0] > address.as_str() {
                break;
            }
        }
        Ok(None)
    }
}
