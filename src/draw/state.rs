//! Draw session state
//!
//! Everything a draw event needs to survive a page reload lives here. The
//! session is an explicit value owned by the caller; nothing is global.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::consts::MAX_PLAYERS;
use crate::error::{DrawError, Result};

/// Unique id of a draw record (creation time in ms, bumped to stay unique)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(u64);

impl RecordId {
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

// Stored as a decimal string, the format the browser payload has always used
impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RecordIdVisitor;

        impl Visitor<'_> for RecordIdVisitor {
            type Value = RecordId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a record id as a decimal string or integer")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<RecordId, E> {
                Ok(RecordId(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<RecordId, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(RecordIdVisitor)
    }
}

/// One player's drawn slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    id: RecordId,
    /// Display name, editable by the player
    name: String,
    /// Drawn number, never changes once assigned
    number: u32,
}

impl DrawRecord {
    pub fn new(id: RecordId, name: impl Into<String>, number: u32) -> Self {
        Self {
            id,
            name: name.into(),
            number,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

/// Whether a draw has been requested but not yet committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawPhase {
    /// Ready for the next draw request
    #[default]
    Idle,
    /// A draw was begun and its reveal is pending
    Drawing,
}

/// Complete state of one draw event.
///
/// `Default` is the uninitialized state: inactive, no players, empty pool.
#[derive(Debug, Clone, Default)]
pub struct DrawSession {
    pub(crate) active: bool,
    pub(crate) total_players: u32,
    /// Undrawn numbers in shuffled order; the end is the top of the stack
    pub(crate) available_numbers: Vec<u32>,
    /// Draws in the order they were made (oldest first)
    pub(crate) history: Vec<DrawRecord>,
    pub(crate) phase: DrawPhase,
    /// Bumped on every restart/reset so tickets from an earlier session
    /// can't commit into this one. Not part of equality or storage.
    pub(crate) generation: u64,
}

impl PartialEq for DrawSession {
    fn eq(&self, other: &Self) -> bool {
        self.active == other.active
            && self.total_players == other.total_players
            && self.available_numbers == other.available_numbers
            && self.history == other.history
            && self.phase == other.phase
    }
}

impl Eq for DrawSession {}

impl DrawSession {
    /// Rebuild an active session from stored parts, checking that every
    /// number 1..=total_players is in exactly one of the pool or the history.
    pub fn from_parts(
        total_players: u32,
        available_numbers: Vec<u32>,
        history: Vec<DrawRecord>,
    ) -> Result<Self> {
        let session = Self {
            active: true,
            total_players,
            available_numbers,
            history,
            phase: DrawPhase::Idle,
            generation: 0,
        };
        session.validate()?;
        Ok(session)
    }

    /// Check the pool/history partition invariant
    pub fn validate(&self) -> Result<()> {
        if self.total_players > MAX_PLAYERS {
            return Err(DrawError::CorruptState(format!(
                "{} players exceeds the limit of {}",
                self.total_players, MAX_PLAYERS
            )));
        }
        let total = self.total_players as usize;
        let count = self.available_numbers.len() + self.history.len();
        if count != total {
            return Err(DrawError::CorruptState(format!(
                "{} numbers accounted for, expected {}",
                count, total
            )));
        }

        let mut seen = HashSet::with_capacity(total);
        let drawn = self.history.iter().map(DrawRecord::number);
        for number in self.available_numbers.iter().copied().chain(drawn) {
            if number == 0 || number > self.total_players {
                return Err(DrawError::CorruptState(format!(
                    "number {} outside 1..={}",
                    number, self.total_players
                )));
            }
            if !seen.insert(number) {
                return Err(DrawError::CorruptState(format!(
                    "number {} appears twice",
                    number
                )));
            }
        }

        let mut ids = HashSet::with_capacity(self.history.len());
        for record in &self.history {
            if !ids.insert(record.id) {
                return Err(DrawError::CorruptState(format!(
                    "record id {} appears twice",
                    record.id
                )));
            }
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn total_players(&self) -> u32 {
        self.total_players
    }

    pub fn available_numbers(&self) -> &[u32] {
        &self.available_numbers
    }

    /// Draws in draw order, oldest first
    pub fn history(&self) -> &[DrawRecord] {
        &self.history
    }

    /// Draws newest first, the order they are shown in
    pub fn history_newest_first(&self) -> impl Iterator<Item = &DrawRecord> {
        self.history.iter().rev()
    }

    pub fn record(&self, id: RecordId) -> Option<&DrawRecord> {
        self.history.iter().find(|r| r.id == id)
    }

    pub fn last_draw(&self) -> Option<&DrawRecord> {
        self.history.last()
    }

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    pub fn is_drawing(&self) -> bool {
        self.phase == DrawPhase::Drawing
    }

    /// Active and every number handed out
    pub fn is_exhausted(&self) -> bool {
        self.active && self.available_numbers.is_empty()
    }
}
