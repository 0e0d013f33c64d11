// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging with optional level from config.
/// Falls back to INFO if level is None or invalid.
pub fn init_logging(log_level: Option<&str>) {
    let level = log_level
        .and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    FmtSubscriber::builder()
        .with_target(false)
        .with_max_level(level)
        .init();
}

/// Check a `log_level` config value before logging is initialized.
pub fn validate_log_level(log_level: Option<&str>) -> Result<(), String> {
    match log_level {
        None => Ok(()),
        Some(level) if level.parse::<Level>().is_ok() => Ok(()),
        Some(level) => Err(format!(
            "[general].log_level '{}' is invalid (expected trace, debug, info, warn or error)",
            level
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_tracing_level_names() {
        assert!(validate_log_level(None).is_ok());
        assert!(validate_log_level(Some("debug")).is_ok());
        assert!(validate_log_level(Some("WARN")).is_ok());
        assert!(validate_log_level(Some("verbose")).is_err());
    }
}
