// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Configuration file support for fmrx-monitor.
//!
//! Config is loaded from the `[fmrx-monitor]` section of `fmrx-rs.toml`.
//! Default search order:
//! 1. Path specified via `--config` CLI argument
//! 2. `$FMRX_CONFIG`
//! 3. `./fmrx-rs.toml`
//! 4. `~/.config/fmrx-rs/fmrx-rs.toml`
//! 5. `/etc/fmrx-rs/fmrx-rs.toml`

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use fmrx_app::{validate_log_level, ConfigFile};
use fmrx_backend::{StationClock, StationProgram};
pub use fmrx_decode_log::DecodeLogsConfig;

/// Top-level monitor configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Group source selection
    pub source: SourceConfig,
    /// Polling behavior
    pub behavior: BehaviorConfig,
    /// Console output
    pub output: OutputConfig,
    /// Decoded event file logging
    pub decode_logs: DecodeLogsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: Option<String>,
}

/// Group source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Source name ("replay" or "synthetic")
    pub backend: String,
    /// Group log path (replay source)
    pub path: Option<PathBuf>,
    /// Rewind the group log at its end instead of finishing (replay source)
    pub looped: bool,
    /// Groups sent per station before retuning, 0 stays on the first station
    /// (synthetic source)
    pub groups_per_station: usize,
    /// Stations broadcast by the synthetic source
    pub stations: Vec<StationProgram>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            backend: "synthetic".to_string(),
            path: None,
            looped: false,
            groups_per_station: 0,
            stations: vec![StationProgram::default()],
        }
    }
}

/// Polling behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Interval between source polls in milliseconds
    pub poll_interval_ms: u64,
    /// Consecutive poll errors tolerated before giving up
    pub max_errors: u32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            // One group every 87.6 ms at 1187.5 bit/s.
            poll_interval_ms: 88,
            max_errors: 10,
        }
    }
}

/// Console output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print events as JSON lines instead of text
    pub json: bool,
}

impl MonitorConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        validate_log_level(self.general.log_level.as_deref())?;

        if self.source.backend.trim().is_empty() {
            return Err("[source].backend must not be empty".to_string());
        }
        for (idx, station) in self.source.stations.iter().enumerate() {
            validate_station(idx, station)?;
        }

        if self.behavior.poll_interval_ms == 0 {
            return Err("[behavior].poll_interval_ms must be > 0".to_string());
        }
        if self.behavior.max_errors == 0 {
            return Err("[behavior].max_errors must be > 0".to_string());
        }

        if self.decode_logs.enabled {
            if self.decode_logs.dir.trim().is_empty() {
                return Err("[decode_logs].dir must not be empty when enabled".to_string());
            }
            if self.decode_logs.rds_file.trim().is_empty() {
                return Err("[decode_logs].rds_file must not be empty when enabled".to_string());
            }
        }
        Ok(())
    }

    /// Generate an example `fmrx-rs.toml` with the `[fmrx-monitor]` section.
    pub fn example_combined_toml() -> String {
        #[derive(serde::Serialize)]
        struct Wrapper {
            #[serde(rename = "fmrx-monitor")]
            inner: MonitorConfig,
        }
        let example = MonitorConfig {
            general: GeneralConfig {
                log_level: Some("info".to_string()),
            },
            source: SourceConfig {
                backend: "synthetic".to_string(),
                path: Some(PathBuf::from("groups.txt")),
                looped: false,
                groups_per_station: 2_000,
                stations: vec![
                    StationProgram {
                        clock: Some(StationClock {
                            mjd: 61_000,
                            hour: 12,
                            minute: 0,
                            utc_offset_half_hours: 2,
                        }),
                        ..StationProgram::default()
                    },
                    StationProgram {
                        pi: 0xd3c2,
                        pty: 1,
                        traffic_program: true,
                        ps: "NEWS 24".to_string(),
                        text: "Traffic and weather every ten minutes".to_string(),
                        clock: None,
                    },
                ],
            },
            behavior: BehaviorConfig::default(),
            output: OutputConfig::default(),
            decode_logs: DecodeLogsConfig::default(),
        };
        toml::to_string_pretty(&Wrapper { inner: example }).unwrap_or_default()
    }
}

fn validate_station(idx: usize, station: &StationProgram) -> Result<(), String> {
    let key = format!("[source.stations][{}]", idx);
    if station.pi == 0 {
        return Err(format!("{key}.pi must be non-zero"));
    }
    if station.pty > 31 {
        return Err(format!("{key}.pty must be in range 0..=31"));
    }
    if station.ps.chars().count() > 8 {
        return Err(format!("{key}.ps must be at most 8 characters"));
    }
    if station.text.chars().count() > 64 {
        return Err(format!("{key}.text must be at most 64 characters"));
    }
    if let Some(clock) = station.clock {
        if clock.hour > 23 || clock.minute > 59 {
            return Err(format!("{key}.clock time must be a valid hh:mm"));
        }
        if clock.utc_offset_half_hours.unsigned_abs() > 31 {
            return Err(format!(
                "{key}.clock.utc_offset_half_hours must be in range -31..=31"
            ));
        }
        if clock.mjd > 0x1ffff {
            return Err(format!("{key}.clock.mjd must fit in 17 bits"));
        }
    }
    Ok(())
}

impl ConfigFile for MonitorConfig {
    fn section_key() -> &'static str {
        "fmrx-monitor"
    }
}
