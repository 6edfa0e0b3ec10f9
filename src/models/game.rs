//! Match (game), Slot, PairKey and MatchFormat.

use crate::models::competitor::CompetitorId;
use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One side of a match. Bracket slots start `Unassigned` until the feeder match decides.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "id")]
pub enum Slot {
    #[default]
    Unassigned,
    Filled(CompetitorId),
}

impl Slot {
    pub fn id(&self) -> Option<CompetitorId> {
        match self {
            Slot::Unassigned => None,
            Slot::Filled(id) => Some(*id),
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self, Slot::Filled(_))
    }
}

/// Unordered pair of competitor ids. `PairKey::new(a, b) == PairKey::new(b, a)`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct PairKey(CompetitorId, CompetitorId);

impl PairKey {
    pub fn new(a: CompetitorId, b: CompetitorId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn contains(&self, id: CompetitorId) -> bool {
        self.0 == id || self.1 == id
    }

    pub fn ids(&self) -> (CompetitorId, CompetitorId) {
        (self.0, self.1)
    }
}

/// Best-of format. Only used for display downstream.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFormat {
    #[default]
    BestOfOne,
    BestOfThree,
}

/// How a match's winner was decided.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinnerSource {
    /// Authoritative result from the result source.
    Reported,
    /// Seed-based placeholder prediction (lower seed wins).
    Simulated,
}

/// A single match between two competitors. Side order carries no meaning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub team_1: Slot,
    pub team_2: Slot,
    /// None until decided.
    pub winner: Option<CompetitorId>,
    #[serde(default)]
    pub winner_source: Option<WinnerSource>,
    #[serde(default)]
    pub format: MatchFormat,
    /// Opaque display data from the result source (scores, maps, external ids).
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl GameMatch {
    pub fn new(team_1: CompetitorId, team_2: CompetitorId, format: MatchFormat) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_1: Slot::Filled(team_1),
            team_2: Slot::Filled(team_2),
            winner: None,
            winner_source: None,
            format,
            detail: None,
        }
    }

    /// A bracket slot waiting on its feeder matches.
    pub fn placeholder(format: MatchFormat) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_1: Slot::Unassigned,
            team_2: Slot::Unassigned,
            winner: None,
            winner_source: None,
            format,
            detail: None,
        }
    }

    /// Both sides resolved to real competitors.
    pub fn is_populated(&self) -> bool {
        self.team_1.is_assigned() && self.team_2.is_assigned()
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    /// Decided by an authoritative result, not a prediction.
    pub fn is_reported(&self) -> bool {
        self.winner.is_some() && self.winner_source == Some(WinnerSource::Reported)
    }

    pub fn pair_key(&self) -> Option<PairKey> {
        Some(PairKey::new(self.team_1.id()?, self.team_2.id()?))
    }

    pub fn contains(&self, id: CompetitorId) -> bool {
        self.team_1.id() == Some(id) || self.team_2.id() == Some(id)
    }

    /// The other side of the match from `id`, if both are assigned.
    pub fn opponent_of(&self, id: CompetitorId) -> Option<CompetitorId> {
        match (self.team_1.id(), self.team_2.id()) {
            (Some(a), Some(b)) if a == id => Some(b),
            (Some(a), Some(b)) if b == id => Some(a),
            _ => None,
        }
    }

    pub fn loser(&self) -> Option<CompetitorId> {
        self.opponent_of(self.winner?)
    }

    /// Set the winner. It must be one of the two assigned competitors.
    pub fn set_winner(
        &mut self,
        winner: CompetitorId,
        source: WinnerSource,
    ) -> Result<(), TournamentError> {
        if !self.is_populated() || !self.contains(winner) {
            return Err(TournamentError::InvalidWinner { winner });
        }
        self.winner = Some(winner);
        self.winner_source = Some(source);
        Ok(())
    }

    pub fn clear_winner(&mut self) {
        self.winner = None;
        self.winner_source = None;
    }

    /// Reset to an unassigned bracket slot. Keeps id and format.
    pub fn unassign(&mut self) {
        self.team_1 = Slot::Unassigned;
        self.team_2 = Slot::Unassigned;
        self.detail = None;
        self.clear_winner();
    }
}
