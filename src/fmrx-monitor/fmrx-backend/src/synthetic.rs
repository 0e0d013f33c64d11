// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Synthetic group source for development and testing.
//!
//! Encodes one or more configured stations into the groups a broadcaster
//! would send. No receiver hardware required.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use fmrx_core::{DynResult, RdsGroup, RdsSource, SourceInfo, SourcePoll};

/// Groups per minute at the nominal RDS rate (about 11.4 groups/s).
const GROUPS_PER_MINUTE: usize = 684;
/// "No AF exists" followed by the filler code.
const AF_NONE: u16 = 0xe0cd;
const RT_MAX_LEN: usize = 64;

/// UTC clock broadcast by a synthetic station at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationClock {
    pub mjd: u32,
    pub hour: u8,
    pub minute: u8,
    #[serde(default)]
    pub utc_offset_half_hours: i8,
}

/// Programme data of one synthetic station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationProgram {
    pub pi: u16,
    pub pty: u8,
    pub traffic_program: bool,
    /// Programme service name, padded or cut to 8 characters.
    pub ps: String,
    /// Radio text, cut to 64 characters.
    pub text: String,
    pub clock: Option<StationClock>,
}

impl Default for StationProgram {
    fn default() -> Self {
        Self {
            pi: 0xc201,
            pty: 10,
            traffic_program: false,
            ps: "FMRX    ".to_string(),
            text: "Synthetic RDS station".to_string(),
            clock: None,
        }
    }
}

impl StationProgram {
    fn block2_base(&self, group_type: u16) -> u16 {
        (group_type << 12)
            | (u16::from(self.traffic_program) << 10)
            | (u16::from(self.pty & 0x1f) << 5)
    }

    fn ps_bytes(&self) -> [u8; 8] {
        let mut bytes = [b' '; 8];
        for (slot, byte) in bytes.iter_mut().zip(self.ps.bytes().map(ascii_or_placeholder)) {
            *slot = byte;
        }
        bytes
    }

    /// Text bytes as sent on air: CR-terminated when short, whole segments,
    /// at least two segments so the receiver sees the index wrap.
    fn rt_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = self
            .text
            .bytes()
            .map(ascii_or_placeholder)
            .take(RT_MAX_LEN)
            .collect();
        if bytes.len() < RT_MAX_LEN {
            bytes.push(b'\r');
        }
        let len = bytes.len().div_ceil(4).max(2) * 4;
        bytes.resize(len, b' ');
        bytes
    }

    /// One broadcast cycle: 0A x4, 2A for every text segment, then 4A.
    fn cycle(&self, text_ab: bool, minutes_elapsed: usize) -> Vec<RdsGroup> {
        let mut groups = Vec::new();

        let ps = self.ps_bytes();
        for segment in 0..4u16 {
            let idx = usize::from(segment) * 2;
            groups.push(RdsGroup::new(
                self.pi,
                self.block2_base(0) | segment,
                AF_NONE,
                u16::from_be_bytes([ps[idx], ps[idx + 1]]),
            ));
        }

        let rt = self.rt_bytes();
        for (segment, chunk) in rt.chunks(4).enumerate() {
            groups.push(RdsGroup::new(
                self.pi,
                self.block2_base(2) | (u16::from(text_ab) << 4) | segment as u16,
                u16::from_be_bytes([chunk[0], chunk[1]]),
                u16::from_be_bytes([chunk[2], chunk[3]]),
            ));
        }

        if let Some(clock) = self.clock {
            groups.push(self.clock_group(clock, minutes_elapsed));
        }
        groups
    }

    fn clock_group(&self, clock: StationClock, minutes_elapsed: usize) -> RdsGroup {
        let start = usize::from(clock.hour) * 60 + usize::from(clock.minute);
        let total = start + minutes_elapsed;
        let mjd = clock.mjd + (total / (24 * 60)) as u32;
        let minutes = total % (24 * 60);
        let hour = (minutes / 60) as u16;
        let minute = (minutes % 60) as u16;

        let magnitude = u16::from(clock.utc_offset_half_hours.unsigned_abs()) & 0x1f;
        let offset = if clock.utc_offset_half_hours < 0 {
            0x20 | magnitude
        } else {
            magnitude
        };

        RdsGroup::new(
            self.pi,
            self.block2_base(4) | ((mjd >> 15) & 0x3) as u16,
            (((mjd & 0x7fff) as u16) << 1) | (hour >> 4),
            ((hour & 0xf) << 12) | (minute << 6) | offset,
        )
    }
}

fn ascii_or_placeholder(byte: u8) -> u8 {
    if (0x20..=0x7e).contains(&byte) {
        byte
    } else {
        b'?'
    }
}

/// Source broadcasting configured stations in turn.
///
/// After `groups_per_station` groups (never when 0, or with a single station)
/// it emits the clear sentinel and moves on to the next station.
pub struct SyntheticStation {
    info: SourceInfo,
    stations: Vec<StationProgram>,
    groups_per_station: usize,
    current: usize,
    sent: usize,
    text_ab: bool,
    schedule: Vec<RdsGroup>,
    cursor: usize,
}

impl SyntheticStation {
    pub fn new(stations: Vec<StationProgram>, groups_per_station: usize) -> Self {
        let mut source = Self {
            info: SourceInfo {
                name: "synthetic".to_string(),
                description: format!("{} synthetic station(s)", stations.len()),
            },
            stations,
            groups_per_station,
            current: 0,
            sent: 0,
            text_ab: false,
            schedule: Vec::new(),
            cursor: 0,
        };
        source.rebuild_schedule();
        source
    }

    pub fn current_station(&self) -> Option<&StationProgram> {
        self.stations.get(self.current)
    }

    fn rebuild_schedule(&mut self) {
        let minutes_elapsed = self.sent / GROUPS_PER_MINUTE;
        self.schedule = match self.stations.get(self.current) {
            Some(station) => station.cycle(self.text_ab, minutes_elapsed),
            None => Vec::new(),
        };
        self.cursor = 0;
    }

    fn retune(&mut self) {
        self.current = (self.current + 1) % self.stations.len();
        self.sent = 0;
        self.text_ab = !self.text_ab;
        if let Some(station) = self.stations.get(self.current) {
            info!("Synthetic retune to {:04X} \"{}\"", station.pi, station.ps);
        }
        self.rebuild_schedule();
    }
}

impl RdsSource for SyntheticStation {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn poll(&mut self) -> DynResult<SourcePoll> {
        if self.schedule.is_empty() {
            return Ok(SourcePoll::Finished);
        }

        if self.groups_per_station > 0
            && self.stations.len() > 1
            && self.sent >= self.groups_per_station
        {
            self.retune();
            return Ok(SourcePoll::Group(RdsGroup::CLEAR));
        }

        if self.cursor >= self.schedule.len() {
            debug!("Synthetic cycle complete after {} groups", self.sent);
            self.rebuild_schedule();
        }
        let group = self.schedule[self.cursor];
        self.cursor += 1;
        self.sent += 1;
        Ok(SourcePoll::Group(group))
    }
}
