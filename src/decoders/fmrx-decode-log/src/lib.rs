// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Decoded RDS event file logging.
//!
//! Provides [`DecodeLogsConfig`] for TOML configuration and [`DecoderLoggers`]
//! for writing JSON-Lines log files, one file per UTC day.

use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use fmrx_core::RdsEvent;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

fn default_decode_logs_dir() -> String {
    match dirs::data_dir() {
        Some(data_dir) => data_dir
            .join("fmrx-rs")
            .join("decoders")
            .to_string_lossy()
            .to_string(),
        None => "logs/decoders".to_string(),
    }
}

/// Decoder file logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeLogsConfig {
    /// Whether decoded events are written to disk
    pub enabled: bool,
    /// Base directory for log files
    pub dir: String,
    /// RDS log filename; `%YYYY%`, `%MM%` and `%DD%` expand to the UTC date
    pub rds_file: String,
}

impl Default for DecodeLogsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_decode_logs_dir(),
            rds_file: "FMRX-RDS-%YYYY%-%MM%-%DD%.log".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Daily file (private)
// ---------------------------------------------------------------------------

fn expand_template(template: &str, date: NaiveDate) -> String {
    template
        .replace("%YYYY%", &date.format("%Y").to_string())
        .replace("%MM%", &date.format("%m").to_string())
        .replace("%DD%", &date.format("%d").to_string())
}

fn open_append(path: &Path) -> Result<BufWriter<File>, String> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)
            .map_err(|e| format!("create log dir '{}': {}", parent.display(), e))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(BufWriter::new)
        .map_err(|e| format!("open log '{}': {}", path.display(), e))
}

struct OpenFile {
    date: NaiveDate,
    path: PathBuf,
    writer: BufWriter<File>,
}

/// JSON-Lines file that moves on to a new name when the UTC date changes.
struct DailyLog {
    base_dir: PathBuf,
    template: String,
    decoder: &'static str,
    file: Mutex<OpenFile>,
}

impl DailyLog {
    fn open(
        base_dir: &Path,
        template: &str,
        decoder: &'static str,
        now: DateTime<Utc>,
    ) -> Result<Self, String> {
        let date = now.date_naive();
        let path = base_dir.join(expand_template(template, date));
        let writer = open_append(&path).map_err(|e| format!("{} {}", decoder, e))?;
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            template: template.to_string(),
            decoder,
            file: Mutex::new(OpenFile { date, path, writer }),
        })
    }

    fn append<T: Serialize>(&self, now: DateTime<Utc>, payload: &T) {
        let Ok(mut file) = self.file.lock() else {
            warn!("{} decode log mutex poisoned", self.decoder);
            return;
        };

        let date = now.date_naive();
        if date != file.date {
            let path = self.base_dir.join(expand_template(&self.template, date));
            if path != file.path {
                match open_append(&path) {
                    Ok(writer) => {
                        debug!("{} decode log rotated to {}", self.decoder, path.display());
                        let _ = file.writer.flush();
                        file.path = path;
                        file.writer = writer;
                    }
                    Err(e) => {
                        warn!("{} decode log rotation failed: {}", self.decoder, e);
                        return;
                    }
                }
            }
            file.date = date;
        }

        let line = json!({
            "ts_ms": now.timestamp_millis(),
            "decoder": self.decoder,
            "payload": payload,
        });
        let written = serde_json::to_writer(&mut file.writer, &line)
            .map_err(|e| e.to_string())
            .and_then(|_| file.writer.write_all(b"\n").map_err(|e| e.to_string()))
            .and_then(|_| file.writer.flush().map_err(|e| e.to_string()));
        if let Err(e) = written {
            warn!("{} decode log write failed: {}", self.decoder, e);
        }
    }

    fn path(&self) -> Option<PathBuf> {
        self.file.lock().ok().map(|file| file.path.clone())
    }
}

/// One logged RDS value, tagged with the station it came from.
#[derive(Serialize)]
struct RdsLogEntry<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pi: Option<String>,
    #[serde(flatten)]
    event: &'a RdsEvent,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// File loggers for decoded events.
pub struct DecoderLoggers {
    rds: DailyLog,
}

impl DecoderLoggers {
    /// Create loggers from config, or return `None` when logging is disabled.
    pub fn from_config(cfg: &DecodeLogsConfig) -> Result<Option<Arc<Self>>, String> {
        if !cfg.enabled {
            return Ok(None);
        }

        let base_dir = PathBuf::from(cfg.dir.trim());
        create_dir_all(&base_dir)
            .map_err(|e| format!("create decode log dir '{}': {}", base_dir.display(), e))?;

        let loggers = Self {
            rds: DailyLog::open(&base_dir, &cfg.rds_file, "rds", Utc::now())?,
        };
        Ok(Some(Arc::new(loggers)))
    }

    /// Append one decoded RDS value. `pi` is the programme identification
    /// code of the station, when known.
    pub fn log_rds(&self, pi: Option<u16>, event: &RdsEvent) {
        self.log_rds_at(Utc::now(), pi, event);
    }

    fn log_rds_at(&self, now: DateTime<Utc>, pi: Option<u16>, event: &RdsEvent) {
        let entry = RdsLogEntry {
            pi: pi.map(|pi| format!("{:04X}", pi)),
            event,
        };
        self.rds.append(now, &entry);
    }

    /// Path of the RDS log file currently being written.
    pub fn rds_path(&self) -> Option<PathBuf> {
        self.rds.path()
    }
}
