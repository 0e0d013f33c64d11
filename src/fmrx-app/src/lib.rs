// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

pub mod config;
pub mod logging;
pub mod util;

pub use config::{config_search_paths, ConfigError, ConfigFile, CONFIG_ENV_VAR};
pub use logging::{init_logging, validate_log_level};
pub use util::normalize_name;
