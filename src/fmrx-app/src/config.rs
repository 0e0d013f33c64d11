// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Section-keyed loading of `fmrx-rs.toml`.
//!
//! Every binary owns one `[section]` of a shared file. Files are looked up in
//! order: `$FMRX_CONFIG`, `./fmrx-rs.toml`, `$XDG_CONFIG_HOME/fmrx-rs/fmrx-rs.toml`,
//! `/etc/fmrx-rs/fmrx-rs.toml`.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Environment variable naming a config file to try before the default paths.
pub const CONFIG_ENV_VAR: &str = "FMRX_CONFIG";
const CONFIG_FILE_NAME: &str = "fmrx-rs.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(PathBuf, String),

    #[error("Failed to parse config file {0}: {1}")]
    ParseError(PathBuf, String),

    #[error("Config file {0} has no [{1}] section")]
    MissingSection(PathBuf, &'static str),
}

/// Candidate config files, most specific first.
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
        paths.push(PathBuf::from(path));
    }
    paths.push(PathBuf::from(CONFIG_FILE_NAME));
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("fmrx-rs").join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from("/etc/fmrx-rs").join(CONFIG_FILE_NAME));
    paths
}

fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;
    content
        .parse::<toml::Table>()
        .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))
}

/// Deserialize `[key]` out of an already parsed file. Missing fields take
/// the section type's serde defaults.
fn take_section<T: DeserializeOwned>(
    mut table: toml::Table,
    key: &str,
    path: &Path,
) -> Result<Option<T>, ConfigError> {
    table
        .remove(key)
        .map(|section| section.try_into::<T>())
        .transpose()
        .map_err(|e| ConfigError::ParseError(path.to_path_buf(), format!("[{}]: {}", key, e)))
}

/// Trait for loading configuration from a `fmrx-rs.toml` section.
pub trait ConfigFile: Sized + Default + DeserializeOwned {
    /// Section key in `fmrx-rs.toml` (e.g. `"fmrx-monitor"`).
    fn section_key() -> &'static str;

    /// Load the section from a specific file, which must contain it.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let table = read_table(path)?;
        take_section(table, Self::section_key(), path)?
            .ok_or_else(|| ConfigError::MissingSection(path.to_path_buf(), Self::section_key()))
    }

    /// Load from the first default path holding the section.
    ///
    /// Files without the section are skipped. Returns the defaults and
    /// `None` when no candidate matches.
    fn load_from_default_paths() -> Result<(Self, Option<PathBuf>), ConfigError> {
        for path in config_search_paths() {
            if !path.is_file() {
                continue;
            }
            let table = read_table(&path)?;
            match take_section(table, Self::section_key(), &path)? {
                Some(cfg) => return Ok((cfg, Some(path))),
                None => debug!(
                    "{} has no [{}] section, skipping",
                    path.display(),
                    Self::section_key()
                ),
            }
        }
        Ok((Self::default(), None))
    }

    /// Load from `explicit` when given (e.g. `--config`), otherwise search
    /// the default paths.
    fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match explicit {
            Some(path) => Ok((Self::load_from_file(path)?, Some(path.to_path_buf()))),
            None => Self::load_from_default_paths(),
        }
    }
}
