//! ADS-B radar - 1090 MHz extended squitter receiver
//!
//! Demodulates Mode S extended squitter transmissions from an IQ sample
//! stream (or replays a recorded capture), decodes them and maintains a
//! live set of tracked aircraft.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossbeam_channel::{Sender, TryRecvError};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use adsb_radar::adsb::{Message, MessageReplay, MessageSource};
use adsb_radar::aircraft::AircraftDatabase;
use adsb_radar::config::{Config, InputFormat};
use adsb_radar::sdr::AdsbDemodulator;
use adsb_radar::tracker::AircraftStateManager;

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .init();

    let config = Config::from_env();
    info!("ADS-B radar starting at {}", chrono::Utc::now().to_rfc3339());
    info!("Configuration:");
    match &config.samples_path {
        Some(path) => info!("  Input: {:?}", path),
        None => info!("  Input: stdin"),
    }
    info!("  Format: {:?}", config.input_format);
    info!("  Aircraft database: {:?}", config.database_path);
    info!("  Tick interval: {} ms", config.tick_interval_ms);

    // The signal pipeline is blocking, so it runs on its own thread and
    // hands decoded messages over a bounded FIFO.
    let (message_tx, message_rx) = crossbeam_channel::bounded::<Message>(1024);
    let pipeline_config = config.clone();
    thread::Builder::new()
        .name("pipeline".to_string())
        .spawn(move || {
            if let Err(error) = run_pipeline(&pipeline_config, &message_tx) {
                error!("pipeline failed: {error:#}");
            }
        })
        .context("failed to spawn pipeline thread")?;

    let mut manager = AircraftStateManager::new(AircraftDatabase::new(&config.database_path));

    // Drain the queue on a display-rate tick, then purge stale aircraft.
    let mut ticker = tokio::time::interval(Duration::from_millis(config.tick_interval_ms));
    let mut last_stats = Instant::now();
    let mut draining = true;
    while draining {
        tokio::select! {
            _ = ticker.tick() => {
                loop {
                    match message_rx.try_recv() {
                        Ok(message) => apply_message(&mut manager, &message),
                        Err(TryRecvError::Empty) => break,
                        Err(TryRecvError::Disconnected) => {
                            info!("message stream ended");
                            draining = false;
                            break;
                        }
                    }
                }
                manager.purge();
                if last_stats.elapsed() >= Duration::from_secs(config.stats_interval_secs) {
                    info!("[tracker] {}", manager.stats_summary());
                    last_stats = Instant::now();
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                draining = false;
            }
        }
    }

    info!("[tracker] {}", manager.stats_summary());
    Ok(())
}

/// Applies one message to the tracker, logging position fixes.
fn apply_message(manager: &mut AircraftStateManager, message: &Message) {
    match manager.update_with_message(message) {
        Ok(state) => {
            if let (Message::AirbornePosition(_), Some(position)) = (message, state.position()) {
                debug!(
                    icao = %state.icao_address(),
                    callsign = state.callsign().map(|c| c.as_str()).unwrap_or("-"),
                    %position,
                    altitude_m = state.altitude(),
                    "position update"
                );
            }
        }
        Err(error) => warn!("state update failed: {error:#}"),
    }
}

/// Runs the sample-to-message pipeline until the source is exhausted or
/// the consumer goes away.
fn run_pipeline(config: &Config, messages: &Sender<Message>) -> Result<()> {
    let reader: Box<dyn Read> = match &config.samples_path {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open input {path:?}"))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    match config.input_format {
        InputFormat::Iq => {
            let mut demodulator = AdsbDemodulator::new(reader)?;
            pump(&mut demodulator, messages)?;
            let stats = demodulator.stats();
            info!(
                "demodulator: {} preambles, {} frames, {} format mismatches, {} CRC failures",
                stats.preambles_detected,
                stats.frames_decoded,
                stats.format_mismatches,
                stats.crc_failures
            );
        }
        InputFormat::Messages => pump(&mut MessageReplay::new(reader), messages)?,
    }
    Ok(())
}

/// Forwards parsed messages from `source` into the consumer queue.
fn pump(source: &mut dyn MessageSource, messages: &Sender<Message>) -> Result<()> {
    let mut frames = 0u64;
    let mut parsed = 0u64;
    while let Some(raw) = source.next_message()? {
        frames += 1;
        if let Some(message) = Message::parse(&raw) {
            parsed += 1;
            if messages.send(message).is_err() {
                warn!("message channel closed, stopping pipeline");
                break;
            }
        }
    }
    info!("input exhausted: {frames} frames, {parsed} messages");
    Ok(())
}
