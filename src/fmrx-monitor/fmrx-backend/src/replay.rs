// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Replay of recorded group logs.
//!
//! One group per line as four hex words (`3201 0408 E20D 4142`, optional
//! `0x` prefixes, commas allowed). `clear` or `tune ...` lines stand for a
//! retune and replay as the clear sentinel. `#` starts a comment.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use fmrx_core::{DynResult, RdsGroup, RdsSource, SourceInfo, SourcePoll};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read group log {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// Parse a whole group log.
pub fn parse_group_log(content: &str) -> Result<Vec<RdsGroup>, ReplayError> {
    let mut groups = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let group = parse_line(line).map_err(|reason| ReplayError::Parse {
            line: idx + 1,
            reason,
        })?;
        groups.push(group);
    }
    Ok(groups)
}

fn parse_line(line: &str) -> Result<RdsGroup, String> {
    let words: Vec<&str> = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|w| !w.is_empty())
        .collect();

    match words.first().map(|w| w.to_ascii_lowercase()).as_deref() {
        Some("clear") | Some("tune") => return Ok(RdsGroup::CLEAR),
        _ => {}
    }

    if words.len() != 4 {
        return Err(format!("expected 4 block words, got {}", words.len()));
    }
    let mut blocks = [0u16; 4];
    for (block, &word) in blocks.iter_mut().zip(words.iter()) {
        let digits = word
            .strip_prefix("0x")
            .or_else(|| word.strip_prefix("0X"))
            .unwrap_or(word);
        *block = u16::from_str_radix(digits, 16)
            .map_err(|e| format!("invalid block word '{}': {}", word, e))?;
    }
    Ok(RdsGroup::from(blocks))
}

/// Source that hands out the groups of a recorded log one per poll.
pub struct ReplaySource {
    info: SourceInfo,
    groups: Vec<RdsGroup>,
    cursor: usize,
    looped: bool,
}

impl ReplaySource {
    pub fn open(path: &Path, looped: bool) -> Result<Self, ReplayError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ReplayError::Read(path.to_path_buf(), e))?;
        let groups = parse_group_log(&content)?;
        info!("Loaded {} groups from {}", groups.len(), path.display());
        Ok(Self::from_groups(
            groups,
            looped,
            format!("group log {}", path.display()),
        ))
    }

    pub fn from_groups(groups: Vec<RdsGroup>, looped: bool, description: String) -> Self {
        Self {
            info: SourceInfo {
                name: "replay".to_string(),
                description,
            },
            groups,
            cursor: 0,
            looped,
        }
    }
}

impl RdsSource for ReplaySource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn poll(&mut self) -> DynResult<SourcePoll> {
        if self.cursor >= self.groups.len() {
            if !self.looped || self.groups.is_empty() {
                return Ok(SourcePoll::Finished);
            }
            debug!("Group log exhausted, rewinding");
            self.cursor = 0;
        }
        let group = self.groups[self.cursor];
        self.cursor += 1;
        Ok(SourcePoll::Group(group))
    }
}
