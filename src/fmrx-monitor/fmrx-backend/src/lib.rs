// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::collections::HashMap;
use std::path::PathBuf;

use fmrx_app::normalize_name;
use fmrx_core::{DynResult, RdsSource};

mod replay;
mod synthetic;

pub use replay::{parse_group_log, ReplayError, ReplaySource};
pub use synthetic::{StationClock, StationProgram, SyntheticStation};

/// Connection details for instantiating a group source.
#[derive(Debug, Clone)]
pub enum SourceAccess {
    File {
        path: PathBuf,
        looped: bool,
    },
    Synthetic {
        stations: Vec<StationProgram>,
        groups_per_station: usize,
    },
}

pub type SourceFactory = fn(SourceAccess) -> DynResult<Box<dyn RdsSource>>;

/// Context for registering and instantiating group sources.
#[derive(Clone)]
pub struct RegistrationContext {
    factories: HashMap<String, SourceFactory>,
}

impl RegistrationContext {
    /// Create a new empty registration context.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a source factory under a stable name (e.g. "replay").
    pub fn register_source(&mut self, name: &str, factory: SourceFactory) {
        let key = normalize_name(name);
        self.factories.insert(key, factory);
    }

    /// Check whether a source name is registered.
    pub fn is_source_registered(&self, name: &str) -> bool {
        let key = normalize_name(name);
        self.factories.contains_key(&key)
    }

    /// List registered source names.
    pub fn registered_sources(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Instantiate a group source based on the selected name and access method.
    pub fn build_source(&self, name: &str, access: SourceAccess) -> DynResult<Box<dyn RdsSource>> {
        let key = normalize_name(name);
        let factory = self
            .factories
            .get(&key)
            .ok_or_else(|| format!("Unknown group source: {}", name))?;
        factory(access)
    }
}

impl Default for RegistrationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Register all built-in sources on a context.
pub fn register_builtin_sources_on(context: &mut RegistrationContext) {
    context.register_source("replay", replay_factory);
    context.register_source("synthetic", synthetic_factory);
}

fn replay_factory(access: SourceAccess) -> DynResult<Box<dyn RdsSource>> {
    match access {
        SourceAccess::File { path, looped } => Ok(Box::new(ReplaySource::open(&path, looped)?)),
        SourceAccess::Synthetic { .. } => Err("replay source requires a group log file".into()),
    }
}

fn synthetic_factory(access: SourceAccess) -> DynResult<Box<dyn RdsSource>> {
    match access {
        SourceAccess::Synthetic {
            stations,
            groups_per_station,
        } => {
            if stations.is_empty() {
                return Err("synthetic source requires at least one station".into());
            }
            Ok(Box::new(SyntheticStation::new(stations, groups_per_station)))
        }
        SourceAccess::File { .. } => Err("synthetic source does not read files".into()),
    }
}
