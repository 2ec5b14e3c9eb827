//! Shared data types: live events, map search results, mod sets

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::BitOr;

/// What the tracked client is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Playing,
    Editing,
    Browsing,
    Idle,
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Playing => "playing",
            Self::Editing => "editing",
            Self::Browsing => "browsing",
            Self::Idle => "idle",
        };
        f.write_str(s)
    }
}

/// One observation of the client's live state, as raw as it arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlayingEvent {
    pub raw: String,
    pub status: ClientStatus,
}

impl NowPlayingEvent {
    pub fn new(raw: impl Into<String>, status: ClientStatus) -> Self {
        Self {
            raw: raw.into(),
            status,
        }
    }
}

/// Set of gameplay modifiers, stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModSet(u32);

impl ModSet {
    pub const NONE: ModSet = ModSet(0);
    pub const NO_FAIL: ModSet = ModSet(1);
    pub const EASY: ModSet = ModSet(1 << 1);
    pub const HIDDEN: ModSet = ModSet(1 << 2);
    pub const HARD_ROCK: ModSet = ModSet(1 << 3);
    pub const SUDDEN_DEATH: ModSet = ModSet(1 << 4);
    pub const DOUBLE_TIME: ModSet = ModSet(1 << 5);
    pub const HALF_TIME: ModSet = ModSet(1 << 6);
    pub const NIGHTCORE: ModSet = ModSet(1 << 7);
    pub const FLASHLIGHT: ModSet = ModSet(1 << 8);
    pub const RELAX: ModSet = ModSet(1 << 9);

    const TABLE: &'static [(ModSet, &'static str, &'static str)] = &[
        (Self::NO_FAIL, "NF", "NoFail"),
        (Self::EASY, "EZ", "Easy"),
        (Self::HIDDEN, "HD", "Hidden"),
        (Self::HARD_ROCK, "HR", "HardRock"),
        (Self::SUDDEN_DEATH, "SD", "SuddenDeath"),
        (Self::DOUBLE_TIME, "DT", "DoubleTime"),
        (Self::HALF_TIME, "HT", "HalfTime"),
        (Self::NIGHTCORE, "NC", "Nightcore"),
        (Self::FLASHLIGHT, "FL", "Flashlight"),
        (Self::RELAX, "RX", "Relax"),
    ];

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: ModSet) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: ModSet) {
        self.0 |= other.0;
    }

    /// Two-letter codes for every active mod, in canonical order.
    pub fn codes(self) -> Vec<&'static str> {
        Self::TABLE
            .iter()
            .filter(|(flag, _, _)| self.contains(*flag))
            .map(|(_, code, _)| *code)
            .collect()
    }

    pub fn long_names(self) -> Vec<&'static str> {
        Self::TABLE
            .iter()
            .filter(|(flag, _, _)| self.contains(*flag))
            .map(|(_, _, name)| *name)
            .collect()
    }

    /// Parse a run of two-letter codes ("HDDT") into a set. Unknown pairs
    /// are skipped; separators and case are ignored.
    pub fn parse_codes(text: &str) -> ModSet {
        let cleaned: String = text
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_uppercase();
        let mut set = ModSet::NONE;
        for pair in cleaned.as_bytes().chunks_exact(2) {
            for (flag, code, _) in Self::TABLE {
                if code.as_bytes() == pair {
                    set.insert(*flag);
                }
            }
        }
        set
    }
}

impl BitOr for ModSet {
    type Output = ModSet;

    fn bitor(self, rhs: ModSet) -> ModSet {
        ModSet(self.0 | rhs.0)
    }
}

impl fmt::Display for ModSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.codes().concat())
    }
}

/// What the finder chain produced for one live event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSearchResult {
    pub found: bool,
    pub artist: Option<String>,
    pub title: Option<String>,
    pub difficulty: Option<String>,
    pub mods: ModSet,
    pub status: ClientStatus,
    pub raw: String,
}

impl MapSearchResult {
    pub fn resolved(
        event: &NowPlayingEvent,
        artist: impl Into<String>,
        title: impl Into<String>,
        difficulty: impl Into<String>,
        mods: ModSet,
    ) -> Self {
        Self {
            found: true,
            artist: Some(artist.into()),
            title: Some(title.into()),
            difficulty: Some(difficulty.into()),
            mods,
            status: event.status,
            raw: event.raw.clone(),
        }
    }

    pub fn not_found(event: &NowPlayingEvent) -> Self {
        Self {
            found: false,
            artist: None,
            title: None,
            difficulty: None,
            mods: ModSet::NONE,
            status: event.status,
            raw: event.raw.clone(),
        }
    }
}

/// One named, fully-substituted output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedOutput {
    pub name: String,
    pub line: String,
}

/// Token map handed to parsers; replacement providers extend it.
pub type TokenMap = HashMap<String, String>;
