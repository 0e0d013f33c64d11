// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use serde::Serialize;

use fmrx_core::RdsEvent;

/// A decoded event with the station that was on air when it was published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationEvent {
    pub pi: Option<u16>,
    pub event: RdsEvent,
}

#[derive(Serialize)]
struct JsonLine<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pi: Option<String>,
    #[serde(flatten)]
    event: &'a RdsEvent,
}

/// Render one console line for an event.
pub fn format_event(entry: &StationEvent, json: bool) -> String {
    if json {
        let line = JsonLine {
            pi: entry.pi.map(|pi| format!("{:04X}", pi)),
            event: &entry.event,
        };
        return serde_json::to_string(&line).unwrap_or_default();
    }
    match entry.pi {
        Some(pi) => format!("{:04X} {}", pi, entry.event),
        None => format!("---- {}", entry.event),
    }
}
