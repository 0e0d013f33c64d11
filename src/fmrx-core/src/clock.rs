// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Local clock time broadcast in a 4A group.
///
/// `hour`/`minute` already include the station's UTC offset and `mjd` is
/// the matching local date as a Modified Julian Day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
    pub mjd: u32,
    /// Local offset from UTC in 30 minute steps (-31..=31).
    pub utc_offset_half_hours: i8,
}

impl ClockTime {
    pub fn minutes_of_day(&self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }

    pub fn utc_offset_minutes(&self) -> i16 {
        i16::from(self.utc_offset_half_hours) * 30
    }

    /// Calendar date for `mjd`, or `None` when outside chrono's range.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(1858, 11, 17)?.checked_add_days(Days::new(u64::from(self.mjd)))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)?;
        if let Some(date) = self.date() {
            write!(f, " {}", date.format("%Y-%m-%d"))?;
        }
        let offset = self.utc_offset_minutes();
        let sign = if offset < 0 { '-' } else { '+' };
        let offset = offset.unsigned_abs();
        write!(f, " UTC{}{:02}:{:02}", sign, offset / 60, offset % 60)
    }
}
