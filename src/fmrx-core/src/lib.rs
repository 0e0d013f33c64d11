// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

pub mod clock;
pub mod decode;
pub mod group;
pub mod source;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub use clock::ClockTime;
pub use decode::RdsEvent;
pub use group::{pty_name, GroupHeader, GroupType, RdsGroup};
pub use source::{RdsSource, SourceInfo, SourcePoll};
