// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Raw RDS groups as delivered by a receiver chip, and the fields every
//! group carries in its first two blocks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One RDS group: four 16-bit information words, checkwords already
/// stripped by the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RdsGroup {
    pub block1: u16,
    pub block2: u16,
    pub block3: u16,
    pub block4: u16,
}

impl RdsGroup {
    /// Sentinel sent by a receiver after tuning: clears all decoder state.
    pub const CLEAR: RdsGroup = RdsGroup::new(0, 0, 0, 0);

    pub const fn new(block1: u16, block2: u16, block3: u16, block4: u16) -> Self {
        Self {
            block1,
            block2,
            block3,
            block4,
        }
    }

    /// A zero PI word never occurs on air and is reserved for the clear sentinel.
    pub fn is_clear(&self) -> bool {
        self.block1 == 0
    }

    pub fn group_type(&self) -> GroupType {
        GroupType::from_block2(self.block2)
    }

    pub fn header(&self) -> GroupHeader {
        GroupHeader::from_group(self)
    }

    pub fn blocks(&self) -> [u16; 4] {
        [self.block1, self.block2, self.block3, self.block4]
    }
}

impl From<[u16; 4]> for RdsGroup {
    fn from(blocks: [u16; 4]) -> Self {
        Self::new(blocks[0], blocks[1], blocks[2], blocks[3])
    }
}

impl fmt::Display for RdsGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04X} {:04X} {:04X} {:04X}",
            self.block1, self.block2, self.block3, self.block4
        )
    }
}

/// Group type packed as `0xTV`: type number in the high nibble, `0xA` for
/// version A and `0xB` for version B in the low nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupType(pub u8);

impl GroupType {
    pub const BASIC_TUNING_A: GroupType = GroupType(0x0A);
    pub const BASIC_TUNING_B: GroupType = GroupType(0x0B);
    pub const RADIO_TEXT_A: GroupType = GroupType(0x2A);
    pub const RADIO_TEXT_B: GroupType = GroupType(0x2B);
    pub const CLOCK_TIME_A: GroupType = GroupType(0x4A);

    pub fn from_block2(block2: u16) -> Self {
        let number = ((block2 >> 8) & 0xF0) as u8;
        let version = ((block2 >> 11) & 0x01) as u8;
        Self(0x0A | number | version)
    }

    pub fn code(self) -> u8 {
        self.0
    }

    pub fn number(self) -> u8 {
        self.0 >> 4
    }

    pub fn version_b(self) -> bool {
        self.0 & 0x01 != 0
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}{:X}", self.number(), self.0 & 0x0F)
    }
}

/// Fields common to every group type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupHeader {
    /// Programme identification code.
    pub pi: u16,
    pub group_type: GroupType,
    pub traffic_program: bool,
    /// Programme type code (0-31).
    pub pty: u8,
}

impl GroupHeader {
    pub fn from_group(group: &RdsGroup) -> Self {
        Self {
            pi: group.block1,
            group_type: group.group_type(),
            traffic_program: (group.block2 >> 10) & 0x1 != 0,
            pty: ((group.block2 >> 5) & 0x1f) as u8,
        }
    }

    pub fn pty_name(&self) -> &'static str {
        pty_name(self.pty)
    }
}

/// European (RDS) programme type labels.
pub fn pty_name(pty: u8) -> &'static str {
    match pty {
        0 => "None",
        1 => "News",
        2 => "Current Affairs",
        3 => "Information",
        4 => "Sport",
        5 => "Education",
        6 => "Drama",
        7 => "Culture",
        8 => "Science",
        9 => "Varied",
        10 => "Pop Music",
        11 => "Rock Music",
        12 => "Easy Listening",
        13 => "Light Classical",
        14 => "Serious Classical",
        15 => "Other Music",
        16 => "Weather",
        17 => "Finance",
        18 => "Children's",
        19 => "Social Affairs",
        20 => "Religion",
        21 => "Phone In",
        22 => "Travel",
        23 => "Leisure",
        24 => "Jazz Music",
        25 => "Country Music",
        26 => "National Music",
        27 => "Oldies Music",
        28 => "Folk Music",
        29 => "Documentary",
        30 => "Alarm Test",
        _ => "Alarm",
    }
}
