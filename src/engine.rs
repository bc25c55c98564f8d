//! Coordinator between the bracket logic and its collaborators.
//!
//! Every mutation runs on a copy of the tournament while its lock is held. The copy
//! is persisted and only then swapped in, so a failed operation or a failed save
//! leaves the live state untouched. Observers are notified afterwards; that part
//! never fails the call.

use crate::broadcast::Broadcaster;
use crate::config::{CreditsConfig, TournamentConfig};
use crate::logic::{self, Credits};
use crate::models::{Event, Person, PersonId, Player, Round, Tournament, TournamentError, TournamentId};
use crate::registry::Registry;
use crate::stats::{self, CompleteSnapshot};
use crate::store::{Store, StoreError};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::sync::PoisonError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Tournament(#[from] TournamentError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no tournament {0}")]
    UnknownTournament(TournamentId),
}

pub struct Engine<S, B> {
    store: S,
    broadcaster: B,
    registry: Registry,
    config: TournamentConfig,
    credits: CreditsConfig,
}

impl<S: Store, B: Broadcaster> Engine<S, B> {
    pub fn new(store: S, broadcaster: B, config: TournamentConfig, credits: CreditsConfig) -> Self {
        Self {
            store,
            broadcaster,
            registry: Registry::new(),
            config,
            credits,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Load every stored tournament into memory. Returns how many were loaded.
    pub fn load(&self) -> Result<usize, EngineError> {
        let all = self.store.load_all()?;
        let n = all.len();
        for t in all {
            self.registry.insert(t);
        }
        log::info!("Loaded {} tournament(s)", n);
        Ok(n)
    }

    /// Look up a person through the store; used to resolve acting persons.
    pub fn person(&self, id: &str) -> Result<Person, EngineError> {
        Ok(self.store.load_person(id)?)
    }

    pub fn create_tournament(
        &self,
        name: &str,
        scheduled: Option<DateTime<Utc>>,
        actor: Option<&Person>,
    ) -> Result<Tournament, EngineError> {
        let mut t = Tournament::new(name, scheduled, self.config.clone());
        t.log_event(
            Event::new("new_tournament", "{name} ({id}) created")
                .with("name", name)
                .with("id", t.id)
                .by(actor),
        );
        self.store.save_tournament(&t)?;
        self.registry.insert(t.clone());
        log::info!("Created tournament {} ({})", t.name, t.id);
        self.notify("tournament_created", &t);
        Ok(t)
    }

    pub fn tournament(&self, id: TournamentId) -> Result<Tournament, EngineError> {
        let handle = self.registry.get(id).ok_or(EngineError::UnknownTournament(id))?;
        let t = handle.lock().unwrap_or_else(PoisonError::into_inner).clone();
        Ok(t)
    }

    /// All tournaments, earliest scheduled first.
    pub fn tournaments(&self) -> Vec<Tournament> {
        self.registry.list()
    }

    /// Replace a tournament wholesale (manual edits).
    pub fn overwrite_tournament(&self, tournament: Tournament) -> Result<(), EngineError> {
        let id = tournament.id;
        self.mutate(id, "tournament_overwritten", |t| {
            *t = tournament;
            Ok(())
        })
    }

    /// Join a person by id. Missing nick or color is fixed and written back.
    pub fn add_player<R: Rng + ?Sized>(
        &self,
        id: TournamentId,
        person_id: &str,
        rng: &mut R,
    ) -> Result<(), EngineError> {
        let person = self.joining_person(id, person_id, rng)?;
        self.mutate(id, "player_joined", |t| t.add_player(person))
    }

    /// Join or leave, depending on whether the person is already in.
    pub fn toggle_player<R: Rng + ?Sized>(
        &self,
        id: TournamentId,
        person_id: &str,
        rng: &mut R,
    ) -> Result<(), EngineError> {
        let person = self.joining_person(id, person_id, rng)?;
        self.mutate(id, "player_toggled", |t| t.toggle_player(person))
    }

    pub fn set_casters(&self, id: TournamentId, casters: Vec<PersonId>) -> Result<(), EngineError> {
        self.mutate(id, "casters_set", |t| {
            t.set_casters(casters);
            Ok(())
        })
    }

    pub fn start_tournament<R: Rng + ?Sized>(
        &self,
        id: TournamentId,
        rng: &mut R,
        actor: Option<&Person>,
    ) -> Result<(), EngineError> {
        self.mutate(id, "tournament_started", |t| logic::start_tournament(t, rng, actor))
    }

    pub fn reshuffle<R: Rng + ?Sized>(
        &self,
        id: TournamentId,
        rng: &mut R,
        actor: Option<&Person>,
    ) -> Result<(), EngineError> {
        self.mutate(id, "reshuffled", |t| logic::reshuffle(t, rng, actor))
    }

    pub fn set_match_time(
        &self,
        id: TournamentId,
        index: usize,
        minutes: i64,
        actor: Option<&Person>,
    ) -> Result<(), EngineError> {
        self.mutate(id, "match_scheduled", |t| logic::set_match_time(t, index, minutes, actor))
    }

    pub fn start_match(&self, id: TournamentId, index: usize, actor: Option<&Person>) -> Result<(), EngineError> {
        self.mutate(id, "match_started", |t| logic::start_match(t, index, actor))
    }

    pub fn commit_round(&self, id: TournamentId, index: usize, round: Round) -> Result<(), EngineError> {
        self.mutate(id, "round_committed", |t| logic::commit_round(t, index, round))
    }

    pub fn end_match<R: Rng + ?Sized>(
        &self,
        id: TournamentId,
        index: usize,
        rng: &mut R,
        actor: Option<&Person>,
    ) -> Result<(), EngineError> {
        self.mutate(id, "match_ended", |t| logic::end_match(t, index, rng, actor))
    }

    pub fn reset_match(&self, id: TournamentId, index: usize, actor: Option<&Person>) -> Result<(), EngineError> {
        self.mutate(id, "match_reset", |t| logic::reset_match(t, index, actor))
    }

    pub fn autoplay_match<R: Rng + ?Sized>(&self, id: TournamentId, index: usize, rng: &mut R) -> Result<(), EngineError> {
        self.mutate(id, "match_ended", |t| logic::autoplay_match(t, index, rng))
    }

    pub fn backfill_semis<R: Rng + ?Sized>(
        &self,
        id: TournamentId,
        ids: &[PersonId],
        rng: &mut R,
        actor: Option<&Person>,
    ) -> Result<(), EngineError> {
        self.mutate(id, "semis_backfilled", |t| logic::backfill_semis(t, ids, rng, actor))
    }

    /// Runnerups in seeding order, with their tournament totals.
    pub fn runnerups(&self, id: TournamentId) -> Result<Vec<Player>, EngineError> {
        let mut t = self.tournament(id)?;
        Ok(logic::runnerup_players(&mut t)?)
    }

    pub fn credits(&self, id: TournamentId) -> Result<Credits, EngineError> {
        let t = self.tournament(id)?;
        let credits = logic::credits(&t, &self.credits, |pid| self.store.load_person(pid).ok())?;
        Ok(credits)
    }

    /// Statistics over every tournament and every known person.
    pub fn snapshot(&self) -> Result<CompleteSnapshot, EngineError> {
        let people = self.store.load_people()?;
        Ok(stats::snapshot(&self.tournaments(), &people))
    }

    /// Load a person about to join. A missing nick or color is fixed, and the fix is
    /// only written back once the join is known to be allowed.
    fn joining_person<R: Rng + ?Sized>(
        &self,
        id: TournamentId,
        person_id: &str,
        rng: &mut R,
    ) -> Result<Person, EngineError> {
        let mut person = self.store.load_person(person_id)?;
        let corrected = person.correct(rng);
        let t = self.tournament(id)?;
        if t.get_player(&person.id).is_some() {
            return Ok(person);
        }
        t.can_join(&person)?;
        if corrected {
            self.store.save_person(&person)?;
        }
        Ok(person)
    }

    /// Apply `f` under the tournament's lock, persist, swap in, then notify.
    fn mutate<T, F>(&self, id: TournamentId, topic: &str, f: F) -> Result<T, EngineError>
    where
        F: FnOnce(&mut Tournament) -> Result<T, TournamentError>,
    {
        let handle = self.registry.get(id).ok_or(EngineError::UnknownTournament(id))?;
        let mut live = handle.lock().unwrap_or_else(PoisonError::into_inner);

        let mut next = live.clone();
        let out = f(&mut next)?;
        self.store.save_tournament(&next)?;
        *live = next;

        self.notify(topic, &live);
        Ok(out)
    }

    fn notify(&self, topic: &str, tournament: &Tournament) {
        let payload = match serde_json::to_value(tournament) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Could not encode update for {}: {}", tournament.id, e);
                return;
            }
        };
        if let Err(e) = self.broadcaster.publish(topic, payload) {
            log::warn!("Broadcast of {} for {} failed: {}", topic, tournament.id, e);
        }
    }
}
