//! Win/loss record value type.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Wins (or losses) that end a competitor's Swiss stage.
pub const SWISS_THRESHOLD: u32 = 3;

/// A competitor's win-loss record within one stage.
///
/// Ordering follows the standings: more wins first, then fewer losses. A
/// `BTreeMap<Record, _>` therefore iterates from the best record down.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
}

impl Record {
    pub fn new(wins: u32, losses: u32) -> Self {
        Self { wins, losses }
    }

    /// Net differential (wins - losses), the Buchholz contribution.
    pub fn diff(&self) -> i32 {
        self.wins as i32 - self.losses as i32
    }

    /// Reached the win threshold.
    pub fn is_qualified(&self) -> bool {
        self.wins >= SWISS_THRESHOLD
    }

    /// Reached the loss threshold.
    pub fn is_eliminated(&self) -> bool {
        self.losses >= SWISS_THRESHOLD
    }

    /// Done for the stage: appears in no further pairing.
    pub fn is_finished(&self) -> bool {
        self.is_qualified() || self.is_eliminated()
    }

    /// One win or one loss away from the threshold. Such matches are played long-format.
    pub fn is_decisive(&self) -> bool {
        self.wins == SWISS_THRESHOLD - 1 || self.losses == SWISS_THRESHOLD - 1
    }
}

impl Ord for Record {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .wins
            .cmp(&self.wins)
            .then_with(|| self.losses.cmp(&other.losses))
    }
}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.wins, self.losses)
    }
}
