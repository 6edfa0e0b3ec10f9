//! In-memory tournaments by id, for callers that serve several tournaments at once.
//!
//! Each tournament sits behind its own mutex, held for a whole recompute, so
//! concurrent submissions to one tournament are applied one after the other.

use crate::logic::{propagate, submit_result, PropagationReport};
use crate::models::{KnownResult, ResultsByStage, Tournament, TournamentError, TournamentId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, TryLockError};
use std::time::{Duration, Instant};

/// Tournaments not accessed for this long are dropped by [`TournamentStore::remove_inactive`].
pub const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

/// Per-tournament entry: snapshot, its known results and last activity time.
#[derive(Debug)]
pub struct TournamentEntry {
    pub tournament: Tournament,
    pub results: ResultsByStage,
    last_activity: Instant,
}

#[derive(Debug, Default)]
pub struct TournamentStore {
    entries: RwLock<HashMap<TournamentId, Arc<Mutex<TournamentEntry>>>>,
}

impl TournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Propagate the tournament against its results and store it.
    pub fn insert(
        &self,
        mut tournament: Tournament,
        results: ResultsByStage,
    ) -> Result<PropagationReport, TournamentError> {
        let report = propagate(&mut tournament, &results)?;
        let id = tournament.id;
        let entry = TournamentEntry {
            tournament,
            results,
            last_activity: Instant::now(),
        };
        let mut g = self.entries.write().map_err(|_| TournamentError::LockPoisoned)?;
        g.insert(id, Arc::new(Mutex::new(entry)));
        log::info!("Stored tournament {}", id);
        Ok(report)
    }

    fn entry(&self, id: TournamentId) -> Result<Arc<Mutex<TournamentEntry>>, TournamentError> {
        let g = self.entries.read().map_err(|_| TournamentError::LockPoisoned)?;
        g.get(&id)
            .cloned()
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    /// Copy of the current snapshot. Refreshes last activity.
    pub fn get(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        let entry = self.entry(id)?;
        let mut entry = entry.lock().map_err(|_| TournamentError::LockPoisoned)?;
        entry.last_activity = Instant::now();
        Ok(entry.tournament.clone())
    }

    /// Record a result and recompute, holding the tournament's lock for the whole pass.
    pub fn submit_result(
        &self,
        id: TournamentId,
        stage_id: &str,
        result: KnownResult,
    ) -> Result<PropagationReport, TournamentError> {
        let entry = self.entry(id)?;
        let mut guard = entry.lock().map_err(|_| TournamentError::LockPoisoned)?;
        let TournamentEntry {
            tournament,
            results,
            ..
        } = &mut *guard;
        let report = submit_result(tournament, results, stage_id, result)?;
        guard.last_activity = Instant::now();
        Ok(report)
    }

    pub fn remove(&self, id: TournamentId) -> Result<bool, TournamentError> {
        let mut g = self.entries.write().map_err(|_| TournamentError::LockPoisoned)?;
        Ok(g.remove(&id).is_some())
    }

    /// Drop tournaments idle for at least `timeout`. Entries busy in a recompute are kept.
    pub fn remove_inactive(&self, timeout: Duration) -> Result<usize, TournamentError> {
        let mut g = self.entries.write().map_err(|_| TournamentError::LockPoisoned)?;
        let before = g.len();
        g.retain(|_, entry| match entry.try_lock() {
            Ok(entry) => entry.last_activity.elapsed() < timeout,
            Err(TryLockError::WouldBlock) => true,
            Err(TryLockError::Poisoned(_)) => false,
        });
        let removed = before - g.len();
        if removed > 0 {
            log::info!("Cleaned up {} inactive tournament(s)", removed);
        }
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
