//! Competitor and CompetitorStanding data structures.

use crate::models::record::Record;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a competitor, stable across stages.
pub type CompetitorId = Uuid;

/// Whether a competitor was on the stage's roster from the start or promoted into it.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    #[default]
    Original,
    Promoted,
}

/// Where a competitor stands in its stage.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandingStatus {
    Alive,
    Qualified,
    Eliminated,
}

/// Standings view of a competitor (for display / reports).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CompetitorStanding {
    pub id: CompetitorId,
    pub name: String,
    pub seed: u32,
    pub record: Record,
    pub buchholz: i32,
    pub status: StandingStatus,
}

/// A competitor in one stage of the tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    /// Rank within the current stage, lower is stronger.
    pub seed: u32,
    /// Seed held in the previous stage, set on promotion.
    #[serde(default)]
    pub original_seed: Option<u32>,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub buchholz: i32,
    /// Opponents already faced in this stage, in the order they were met.
    #[serde(default)]
    pub opponents: Vec<CompetitorId>,
    #[serde(default)]
    pub provenance: Provenance,
}

impl Competitor {
    /// Create a new competitor with a random id. Record fields start at zero.
    pub fn new(name: impl Into<String>, seed: u32) -> Self {
        Self::with_id(Uuid::new_v4(), name, seed)
    }

    /// Create a competitor with a caller-provided id (e.g. from an import).
    pub fn with_id(id: CompetitorId, name: impl Into<String>, seed: u32) -> Self {
        Self {
            id,
            name: name.into(),
            seed,
            original_seed: None,
            wins: 0,
            losses: 0,
            buchholz: 0,
            opponents: Vec::new(),
            provenance: Provenance::Original,
        }
    }

    pub fn record(&self) -> Record {
        Record::new(self.wins, self.losses)
    }

    /// Zero the stage record, opponent history and Buchholz.
    pub fn reset_record(&mut self) {
        self.wins = 0;
        self.losses = 0;
        self.buchholz = 0;
        self.opponents.clear();
    }

    /// Record an opponent. A given opponent is kept once.
    pub fn add_opponent(&mut self, opponent: CompetitorId) {
        if !self.opponents.contains(&opponent) {
            self.opponents.push(opponent);
        }
    }

    pub fn has_faced(&self, opponent: CompetitorId) -> bool {
        self.opponents.contains(&opponent)
    }

    pub fn is_promoted(&self) -> bool {
        self.provenance == Provenance::Promoted
    }

    /// Clone for the next stage: reset record, new seed, marked promoted.
    pub fn promoted(&self, seed: u32) -> Self {
        let mut next = self.clone();
        next.reset_record();
        next.original_seed = Some(self.seed);
        next.seed = seed;
        next.provenance = Provenance::Promoted;
        next
    }

    /// Standing in a Swiss stage.
    pub fn standing(&self) -> CompetitorStanding {
        let record = self.record();
        let status = if record.is_qualified() {
            StandingStatus::Qualified
        } else if record.is_eliminated() {
            StandingStatus::Eliminated
        } else {
            StandingStatus::Alive
        };
        CompetitorStanding {
            id: self.id,
            name: self.name.clone(),
            seed: self.seed,
            record,
            buchholz: self.buchholz,
            status,
        }
    }
}
