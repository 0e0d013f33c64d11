// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

mod config;
mod output;

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tokio::sync::{broadcast, watch};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use fmrx_app::{init_logging, normalize_name, ConfigFile};
use fmrx_backend::{register_builtin_sources_on, RegistrationContext, SourceAccess};
use fmrx_core::{DynResult, RdsEvent, RdsSource, SourcePoll};
use fmrx_decode_log::DecoderLoggers;
use fmrx_rds::RdsDecoder;

use config::MonitorConfig;
use output::{format_event, StationEvent};

const PKG_DESCRIPTION: &str = concat!(env!("CARGO_PKG_NAME"), " - RDS decoder monitor");
const EVENT_CHANNEL_BUFFER: usize = 256;
/// Stored in the on-air PI slot while no station is tuned.
const NO_STATION: u32 = u32::MAX;

#[derive(Debug, Parser)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = PKG_DESCRIPTION,
)]
struct Cli {
    /// Path to configuration file
    #[arg(long = "config", short = 'C', value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print example configuration and exit
    #[arg(long = "print-config")]
    print_config: bool,
    /// Group source to use (e.g. replay, synthetic)
    #[arg(short = 's', long = "source")]
    source: Option<String>,
    /// Group log path when the source is replay
    #[arg(value_name = "SOURCE_ADDR")]
    source_addr: Option<PathBuf>,
    /// Interval between source polls in milliseconds
    #[arg(long = "poll-interval-ms")]
    poll_interval_ms: Option<u64>,
    /// Print events as JSON lines
    #[arg(long = "json")]
    json: bool,
}

/// Resolved configuration after merging config file and CLI arguments.
struct ResolvedConfig {
    source: String,
    access: SourceAccess,
    poll_interval: Duration,
    json: bool,
}

fn resolve_config(
    cli: &Cli,
    cfg: &MonitorConfig,
    registry: &RegistrationContext,
) -> DynResult<ResolvedConfig> {
    let source = normalize_name(cli.source.as_deref().unwrap_or(&cfg.source.backend));
    if !registry.is_source_registered(&source) {
        return Err(format!(
            "Unknown group source: {} (available: {})",
            source,
            registry.registered_sources().join(", ")
        )
        .into());
    }

    let access = match source.as_str() {
        "replay" => {
            let path = cli
                .source_addr
                .clone()
                .or_else(|| cfg.source.path.clone())
                .ok_or("Replay source requires a group log. Use the SOURCE_ADDR argument or set [source].path in config.")?;
            SourceAccess::File {
                path,
                looped: cfg.source.looped,
            }
        }
        _ => {
            if cli.source_addr.is_some() {
                warn!("SOURCE_ADDR is ignored by the {} source", source);
            }
            SourceAccess::Synthetic {
                stations: cfg.source.stations.clone(),
                groups_per_station: cfg.source.groups_per_station,
            }
        }
    };

    let poll_interval_ms = cli
        .poll_interval_ms
        .unwrap_or(cfg.behavior.poll_interval_ms);
    if poll_interval_ms == 0 {
        return Err("--poll-interval-ms must be > 0".into());
    }

    Ok(ResolvedConfig {
        source,
        access,
        poll_interval: Duration::from_millis(poll_interval_ms),
        json: cli.json || cfg.output.json,
    })
}

/// Build a decoder whose callbacks publish into `events`, tagged with the
/// PI code currently stored in `on_air`.
fn build_decoder(events: broadcast::Sender<StationEvent>, on_air: Arc<AtomicU32>) -> RdsDecoder {
    let mut decoder = RdsDecoder::new();

    let (tx, station) = (events.clone(), on_air.clone());
    decoder.on_service_name(move |name| {
        publish(
            &tx,
            &station,
            RdsEvent::ServiceName {
                name: name.to_string(),
            },
        )
    });
    let (tx, station) = (events.clone(), on_air.clone());
    decoder.on_radio_text(move |text| {
        publish(
            &tx,
            &station,
            RdsEvent::RadioText {
                text: text.to_string(),
            },
        )
    });
    decoder.on_clock_time(move |time| publish(&events, &on_air, RdsEvent::ClockTime(time)));

    decoder
}

fn publish(tx: &broadcast::Sender<StationEvent>, on_air: &AtomicU32, event: RdsEvent) {
    let pi = match on_air.load(Ordering::Relaxed) {
        NO_STATION => None,
        pi => u16::try_from(pi).ok(),
    };
    // No receivers only happens while shutting down.
    let _ = tx.send(StationEvent { pi, event });
}

async fn wait_for_shutdown(mut shutdown_rx: watch::Receiver<bool>) {
    if *shutdown_rx.borrow() {
        return;
    }
    while shutdown_rx.changed().await.is_ok() {
        if *shutdown_rx.borrow() {
            break;
        }
    }
}

/// Poll the source once per tick and feed every group into the decoder.
///
/// Returns when the source finishes or shutdown is requested; fails after
/// `max_errors` consecutive poll errors.
async fn run_poll_loop(
    mut source: Box<dyn RdsSource>,
    mut decoder: RdsDecoder,
    on_air: Arc<AtomicU32>,
    poll_interval: Duration,
    max_errors: u32,
    shutdown_rx: watch::Receiver<bool>,
) -> DynResult<()> {
    let mut interval = time::interval(poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut consecutive_errors = 0u32;
    let mut groups = 0u64;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = wait_for_shutdown(shutdown_rx.clone()) => {
                debug!("Polling stopped after {} groups", groups);
                return Ok(());
            }
        }

        match source.poll() {
            Ok(SourcePoll::Group(group)) => {
                consecutive_errors = 0;
                let pi = if group.is_clear() {
                    info!("Receiver retuned, clearing RDS state");
                    NO_STATION
                } else {
                    u32::from(group.block1)
                };
                on_air.store(pi, Ordering::Relaxed);
                decoder.ingest(group);
                groups += 1;
            }
            Ok(SourcePoll::Idle) => {
                consecutive_errors = 0;
            }
            Ok(SourcePoll::Finished) => {
                info!(
                    "Source {} finished after {} groups",
                    source.info().name,
                    groups
                );
                return Ok(());
            }
            Err(e) => {
                consecutive_errors += 1;
                warn!(
                    "Poll error ({}/{}): {}",
                    consecutive_errors, max_errors, e
                );
                if consecutive_errors >= max_errors {
                    return Err(format!(
                        "Giving up after {} consecutive poll errors: {}",
                        consecutive_errors, e
                    )
                    .into());
                }
            }
        }
    }
}

/// Print and log decoded events until every sender is gone.
async fn run_event_consumer(
    mut rx: broadcast::Receiver<StationEvent>,
    json: bool,
    loggers: Option<Arc<DecoderLoggers>>,
) {
    loop {
        match rx.recv().await {
            Ok(entry) => {
                println!("{}", format_event(&entry, json));
                if let Some(loggers) = loggers.as_ref() {
                    loggers.log_rds(entry.pi, &entry.event);
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!("Event consumer lagging, dropped {} events", n);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[tokio::main]
async fn main() -> DynResult<()> {
    let mut registry = RegistrationContext::new();
    register_builtin_sources_on(&mut registry);

    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", MonitorConfig::example_combined_toml());
        return Ok(());
    }

    let (cfg, config_path) = MonitorConfig::load(cli.config.as_deref())?;
    cfg.validate()
        .map_err(|e| format!("Invalid monitor configuration: {}", e))?;

    init_logging(cfg.general.log_level.as_deref());

    if let Some(ref path) = config_path {
        info!("Loaded configuration from {}", path.display());
    }

    let resolved = resolve_config(&cli, &cfg, &registry)?;
    let source = registry.build_source(&resolved.source, resolved.access)?;
    info!(
        "Starting fmrx-monitor (source: {}, {}, poll every {} ms)",
        source.info().name,
        source.info().description,
        resolved.poll_interval.as_millis()
    );

    let decoder_logs = match DecoderLoggers::from_config(&cfg.decode_logs) {
        Ok(v) => v,
        Err(e) => {
            warn!("Decoder file logging disabled: {}", e);
            None
        }
    };
    if let Some(path) = decoder_logs.as_ref().and_then(|l| l.rds_path()) {
        info!("Logging decoded events to {}", path.display());
    }

    let (event_tx, event_rx) = broadcast::channel::<StationEvent>(EVENT_CHANNEL_BUFFER);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let on_air = Arc::new(AtomicU32::new(NO_STATION));
    let decoder = build_decoder(event_tx, on_air.clone());

    let consumer_handle = tokio::spawn(run_event_consumer(
        event_rx,
        resolved.json,
        decoder_logs,
    ));
    let mut poll_handle = tokio::spawn(run_poll_loop(
        source,
        decoder,
        on_air,
        resolved.poll_interval,
        cfg.behavior.max_errors,
        shutdown_rx,
    ));

    let finished = tokio::select! {
        res = &mut poll_handle => Some(res),
        res = signal::ctrl_c() => {
            res?;
            info!("Ctrl+C received, shutting down");
            None
        }
    };
    let _ = shutdown_tx.send(true);
    let poll_result = match finished {
        Some(res) => res,
        None => poll_handle.await,
    };

    // The decoder (and every event sender) is dropped with the polling task.
    let _ = consumer_handle.await;

    match poll_result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            error!("Polling task error: {}", e);
            Err(e)
        }
        Err(e) => Err(format!("Polling task failed: {}", e).into()),
    }
}
