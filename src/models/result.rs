//! Externally known (authoritative) match results, keyed by competitor pair.

use crate::models::competitor::CompetitorId;
use crate::models::game::PairKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An authoritative result for one pairing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KnownResult {
    pub pair: PairKey,
    pub winner: CompetitorId,
    /// Round number (1-based) the result belongs to. `None` applies to the first round
    /// in which the pair meets.
    #[serde(default)]
    pub round: Option<u32>,
    /// Opaque display data, carried into the match untouched.
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl KnownResult {
    pub fn new(team_1: CompetitorId, team_2: CompetitorId, winner: CompetitorId) -> Self {
        Self {
            pair: PairKey::new(team_1, team_2),
            winner,
            round: None,
            detail: None,
        }
    }

    pub fn in_round(mut self, round: u32) -> Self {
        self.round = Some(round);
        self
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Known results for one stage.
///
/// Results are matched to generated matches by pair identity, never by position,
/// since pairings can be regenerated between passes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<KnownResult>", into = "Vec<KnownResult>")]
pub struct KnownResults {
    by_pair: HashMap<PairKey, Vec<KnownResult>>,
}

/// Known results per stage id.
pub type ResultsByStage = HashMap<String, KnownResults>;

impl KnownResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result, replacing any previous one for the same pair and round.
    pub fn insert(&mut self, result: KnownResult) -> Option<KnownResult> {
        let entries = self.by_pair.entry(result.pair).or_default();
        match entries.iter().position(|r| r.round == result.round) {
            Some(idx) => Some(std::mem::replace(&mut entries[idx], result)),
            None => {
                entries.push(result);
                None
            }
        }
    }

    /// Result for `pair` in round `round_number`: an exact round match first, then a round-less one.
    pub fn lookup(&self, round_number: u32, pair: PairKey) -> Option<&KnownResult> {
        self.for_round(round_number, pair)
            .or_else(|| self.any_round(pair))
    }

    /// Result recorded for `pair` in exactly this round.
    pub fn for_round(&self, round_number: u32, pair: PairKey) -> Option<&KnownResult> {
        self.by_pair
            .get(&pair)?
            .iter()
            .find(|r| r.round == Some(round_number))
    }

    /// Result recorded for `pair` without a round number.
    pub fn any_round(&self, pair: PairKey) -> Option<&KnownResult> {
        self.by_pair.get(&pair)?.iter().find(|r| r.round.is_none())
    }

    pub fn len(&self) -> usize {
        self.by_pair.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pair.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnownResult> {
        self.by_pair.values().flatten()
    }
}

impl FromIterator<KnownResult> for KnownResults {
    fn from_iter<I: IntoIterator<Item = KnownResult>>(iter: I) -> Self {
        let mut results = Self::new();
        for r in iter {
            results.insert(r);
        }
        results
    }
}

impl From<Vec<KnownResult>> for KnownResults {
    fn from(results: Vec<KnownResult>) -> Self {
        results.into_iter().collect()
    }
}

impl From<KnownResults> for Vec<KnownResult> {
    fn from(results: KnownResults) -> Self {
        let mut out: Vec<KnownResult> = results.by_pair.into_values().flatten().collect();
        out.sort_by_key(|r| (r.pair, r.round));
        out
    }
}
