// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Upstream side of the decoder: anything that hands out received groups.

use serde::{Deserialize, Serialize};

use crate::group::RdsGroup;
use crate::DynResult;

/// Static info describing a group source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    pub name: String,
    pub description: String,
}

/// Result of polling a source once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourcePoll {
    /// A complete group without block errors. [`RdsGroup::CLEAR`] signals
    /// that the receiver was retuned.
    Group(RdsGroup),
    /// Nothing new since the last poll.
    Idle,
    /// The source will not produce any more groups.
    Finished,
}

/// A receiver (or stand-in) that is polled for RDS groups.
///
/// Implementations must only return groups that were received without
/// uncorrectable block errors; the decoder does no checking of its own.
pub trait RdsSource: Send {
    fn info(&self) -> &SourceInfo;

    fn poll(&mut self) -> DynResult<SourcePoll>;
}
