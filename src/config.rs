//! Configuration loaded from environment variables.

use std::path::PathBuf;

/// Which decoder the pipeline runs on the input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Raw 12-bit IQ samples, demodulated from scratch.
    Iq,
    /// A recorded capture of timestamped frames.
    Messages,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input file; standard input when absent.
    pub samples_path: Option<PathBuf>,

    /// Input stream format.
    pub input_format: InputFormat,

    /// Path to the aircraft metadata archive.
    pub database_path: PathBuf,

    /// Consumer tick interval in milliseconds.
    pub tick_interval_ms: u64,

    /// Tracker statistics reporting interval in seconds.
    pub stats_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            samples_path: std::env::var("SAMPLES_PATH")
                .ok()
                .filter(|path| path.as_str() != "-")
                .map(PathBuf::from),

            input_format: match std::env::var("INPUT_FORMAT").as_deref() {
                Ok("messages") => InputFormat::Messages,
                _ => InputFormat::Iq,
            },

            database_path: std::env::var("AIRCRAFT_DATABASE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("aircraft.zip")),

            tick_interval_ms: std::env::var("TICK_INTERVAL_MS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(33),

            stats_interval_secs: std::env::var("STATS_INTERVAL_SECS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(10),
        }
    }
}
