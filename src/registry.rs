//! In-memory collection of live tournaments.
//!
//! The list has its own lock; each tournament sits behind its own mutex so that
//! mutations of one tournament are serialized without holding up the others.

use crate::models::{Person, Tournament, TournamentId};
use crate::ranking;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Shared handle to one tournament.
pub type TournamentHandle = Arc<Mutex<Tournament>>;

struct TournamentEntry {
    id: TournamentId,
    tournament: TournamentHandle,
}

#[derive(Default)]
pub struct Registry {
    entries: RwLock<Vec<TournamentEntry>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tournament, replacing any with the same id.
    pub fn insert(&self, tournament: Tournament) -> TournamentHandle {
        let id = tournament.id;
        let handle = Arc::new(Mutex::new(tournament));
        let mut g = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match g.iter_mut().find(|e| e.id == id) {
            Some(e) => e.tournament = handle.clone(),
            None => g.push(TournamentEntry {
                id,
                tournament: handle.clone(),
            }),
        }
        handle
    }

    pub fn get(&self, id: TournamentId) -> Option<TournamentHandle> {
        let g = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        g.iter().find(|e| e.id == id).map(|e| e.tournament.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies of every tournament, earliest scheduled first.
    pub fn list(&self) -> Vec<Tournament> {
        let mut out: Vec<Tournament> = self
            .handles()
            .iter()
            .map(|h| h.lock().unwrap_or_else(PoisonError::into_inner).clone())
            .collect();
        out.sort_by(ranking::by_schedule_date);
        out
    }

    /// The person behind a player in any tournament.
    pub fn find_person(&self, id: &str) -> Option<Person> {
        self.handles().iter().find_map(|h| {
            let t = h.lock().unwrap_or_else(PoisonError::into_inner);
            t.get_player(id).map(|p| p.person.clone())
        })
    }

    // Snapshot of the handles so tournament locks are never taken under the list lock.
    fn handles(&self) -> Vec<TournamentHandle> {
        let g = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        g.iter().map(|e| e.tournament.clone()).collect()
    }
}
