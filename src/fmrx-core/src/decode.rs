// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Shared types for values published by the RDS decoder.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;

/// A value published on one of the decoder's three channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RdsEvent {
    #[serde(rename = "service_name")]
    ServiceName { name: String },
    #[serde(rename = "radio_text")]
    RadioText { text: String },
    #[serde(rename = "clock_time")]
    ClockTime(ClockTime),
}

impl RdsEvent {
    pub fn channel(&self) -> &'static str {
        match self {
            RdsEvent::ServiceName { .. } => "ps",
            RdsEvent::RadioText { .. } => "rt",
            RdsEvent::ClockTime(_) => "ct",
        }
    }
}

impl fmt::Display for RdsEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RdsEvent::ServiceName { name } => write!(f, "PS \"{}\"", name),
            RdsEvent::RadioText { text } => write!(f, "RT \"{}\"", text),
            RdsEvent::ClockTime(time) => write!(f, "CT {}", time),
        }
    }
}
