//! Persistence boundary. The engine saves after every mutation; how and where is up
//! to the implementation.

use crate::models::{Person, PersonId, Tournament, TournamentId};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store failure: {0}")]
    Backend(String),
}

/// Durable storage for tournaments and people.
pub trait Store: Send + Sync {
    fn save_tournament(&self, tournament: &Tournament) -> Result<(), StoreError>;
    fn load_tournament(&self, id: TournamentId) -> Result<Tournament, StoreError>;
    /// Every stored tournament, in no particular order.
    fn load_all(&self) -> Result<Vec<Tournament>, StoreError>;
    fn save_person(&self, person: &Person) -> Result<(), StoreError>;
    fn load_person(&self, id: &str) -> Result<Person, StoreError>;
    fn load_people(&self) -> Result<Vec<Person>, StoreError>;
}

/// Keeps JSON documents in memory, so everything saved goes through a full
/// serialize/deserialize cycle just like a real store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tournaments: RwLock<HashMap<TournamentId, String>>,
    people: RwLock<HashMap<PersonId, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with people, e.g. from an identity provider export.
    pub fn with_people(people: &[Person]) -> Result<Self, StoreError> {
        let store = Self::new();
        for p in people {
            store.save_person(p)?;
        }
        Ok(store)
    }
}

fn lock_error<T>(_: T) -> StoreError {
    StoreError::Backend("lock error".to_string())
}

impl Store for MemoryStore {
    fn save_tournament(&self, tournament: &Tournament) -> Result<(), StoreError> {
        let json = serde_json::to_string(tournament)?;
        self.tournaments
            .write()
            .map_err(lock_error)?
            .insert(tournament.id, json);
        Ok(())
    }

    fn load_tournament(&self, id: TournamentId) -> Result<Tournament, StoreError> {
        let g = self.tournaments.read().map_err(lock_error)?;
        let json = g
            .get(&id)
            .ok_or_else(|| StoreError::NotFound(format!("tournament {id}")))?;
        Ok(serde_json::from_str(json)?)
    }

    fn load_all(&self) -> Result<Vec<Tournament>, StoreError> {
        let g = self.tournaments.read().map_err(lock_error)?;
        g.values()
            .map(|json| serde_json::from_str(json).map_err(StoreError::from))
            .collect()
    }

    fn save_person(&self, person: &Person) -> Result<(), StoreError> {
        let json = serde_json::to_string(person)?;
        self.people
            .write()
            .map_err(lock_error)?
            .insert(person.id.clone(), json);
        Ok(())
    }

    fn load_person(&self, id: &str) -> Result<Person, StoreError> {
        let g = self.people.read().map_err(lock_error)?;
        let json = g
            .get(id)
            .ok_or_else(|| StoreError::NotFound(format!("person {id}")))?;
        Ok(serde_json::from_str(json)?)
    }

    fn load_people(&self) -> Result<Vec<Person>, StoreError> {
        let g = self.people.read().map_err(lock_error)?;
        g.values()
            .map(|json| serde_json::from_str(json).map_err(StoreError::from))
            .collect()
    }
}
