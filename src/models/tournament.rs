//! Tournament and TournamentError.

use crate::config::TournamentConfig;
use crate::models::event::Event;
use crate::models::game::{GameMatch, MatchKind};
use crate::models::person::{Person, PersonId};
use crate::models::player::Player;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    #[error("match already started")]
    AlreadyStarted,
    #[error("match already ended")]
    AlreadyEnded,
    #[error("tournament already started")]
    TournamentStarted,
    /// Bracket data asked for before the tournament started.
    #[error("tournament has not started")]
    NotStarted,
    #[error("tournament is not running")]
    NotRunning,
    #[error("tournament has not ended")]
    NotEnded,
    #[error("tournament is full")]
    TournamentFull,
    #[error("already in tournament")]
    AlreadyJoined,
    #[error("tournament needs {min} or more players and {max} or less, got {got}")]
    PlayerCount { min: usize, max: usize, got: usize },
    #[error("need {needed} players, got {got}")]
    BackfillCount { needed: usize, got: usize },
    #[error("awarding medals outside of the final")]
    NotFinal,
    #[error("match {0} is full")]
    MatchFull(usize),
    #[error("no free color left in match {0}")]
    NoFreeColor(usize),
    #[error("match {0} not found")]
    MatchNotFound(usize),
    #[error("person {0} not found")]
    PersonNotFound(PersonId),
    #[error("player {0} is not in the tournament")]
    PlayerNotFound(PersonId),
    #[error("{0} is not waiting in the runnerups")]
    NotARunnerup(PersonId),
    #[error("{0} is listed more than once")]
    DuplicatePlayer(PersonId),
    #[error("cannot change the bracket once matches have started")]
    MatchesInProgress,
    #[error("match {0} has no players")]
    EmptyMatch(usize),
    #[error("round covers {got} players, match has {expected}")]
    RoundSize { expected: usize, got: usize },
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Full tournament state: registered players, the bracket, runnerups, and winners.
///
/// `players` hold tournament-wide totals (see `logic::update_players`); the players
/// inside each match only hold what happened in that match.
///
/// Once started, `matches` is the tryouts followed by exactly two semis and one final.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub players: Vec<Player>,
    /// Gold, silver, bronze. Empty until the final has ended.
    #[serde(default)]
    pub winners: Vec<Player>,
    /// Eliminated but still eligible players, best candidate first.
    #[serde(default)]
    pub runnerups: Vec<PersonId>,
    #[serde(default)]
    pub casters: Vec<PersonId>,
    #[serde(default)]
    pub matches: Vec<GameMatch>,
    /// Index of the match to be played next.
    #[serde(default)]
    pub current: usize,
    pub opened: DateTime<Utc>,
    pub scheduled: Option<DateTime<Utc>>,
    pub started: Option<DateTime<Utc>>,
    pub ended: Option<DateTime<Utc>>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub config: TournamentConfig,
}

impl Tournament {
    /// Create a new tournament, open for registration.
    pub fn new(name: impl Into<String>, scheduled: Option<DateTime<Utc>>, config: TournamentConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            players: Vec::new(),
            winners: Vec::new(),
            runnerups: Vec::new(),
            casters: Vec::new(),
            matches: Vec::new(),
            current: 0,
            opened: Utc::now(),
            scheduled,
            started: None,
            ended: None,
            events: Vec::new(),
            config,
        }
    }

    pub fn log_event(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn get_player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.person.id == id)
    }

    pub fn get_match(&self, index: usize) -> Result<&GameMatch, TournamentError> {
        self.matches.get(index).ok_or(TournamentError::MatchNotFound(index))
    }

    pub fn get_match_mut(&mut self, index: usize) -> Result<&mut GameMatch, TournamentError> {
        self.matches
            .get_mut(index)
            .ok_or(TournamentError::MatchNotFound(index))
    }

    /// Check whether a person may join: not full, and nobody with the same nick already in.
    pub fn can_join(&self, person: &Person) -> Result<(), TournamentError> {
        if self.players.len() >= self.config.max_players {
            return Err(TournamentError::TournamentFull);
        }
        let key = person.nick_key();
        if self.players.iter().any(|p| p.person.nick_key() == key) {
            return Err(TournamentError::AlreadyJoined);
        }
        Ok(())
    }

    /// Register a person. After the start they go straight into the runnerups.
    pub fn add_player(&mut self, person: Person) -> Result<(), TournamentError> {
        self.can_join(&person)?;
        if self.is_started() {
            self.runnerups.push(person.id.clone());
        }
        log::info!("{} joined {}", person.nick, self.name);
        self.log_event(
            Event::new("player_join", "{nick} has joined")
                .with("nick", &person.nick)
                .with("person", &person.id),
        );
        self.players.push(Player::new(person));
        Ok(())
    }

    /// Unregister a person (only before the start).
    pub fn remove_player(&mut self, id: &str) -> Result<(), TournamentError> {
        if self.is_started() {
            return Err(TournamentError::TournamentStarted);
        }
        let idx = self
            .players
            .iter()
            .position(|p| p.person.id == id)
            .ok_or_else(|| TournamentError::PlayerNotFound(id.to_string()))?;
        let p = self.players.remove(idx);
        log::info!("{} left {}", p.nick(), self.name);
        self.log_event(
            Event::new("player_remove", "{nick} has left")
                .with("nick", p.nick())
                .with("person", p.id()),
        );
        Ok(())
    }

    /// Join if not in, leave if in.
    pub fn toggle_player(&mut self, person: Person) -> Result<(), TournamentError> {
        if self.get_player(&person.id).is_some() {
            self.remove_player(&person.id)
        } else {
            self.add_player(person)
        }
    }

    pub fn set_casters(&mut self, casters: Vec<PersonId>) {
        self.casters = casters;
    }

    /// Number of tryout matches in the bracket.
    pub fn tryout_count(&self) -> usize {
        self.matches
            .iter()
            .filter(|m| m.kind == MatchKind::Tryout)
            .count()
    }

    /// Index of the first semi. Only meaningful once the bracket is built.
    pub fn semi_offset(&self) -> usize {
        self.matches.len().saturating_sub(3)
    }

    /// One of the two semis.
    pub fn semi(&self, index: usize) -> Result<&GameMatch, TournamentError> {
        if index > 1 {
            return Err(TournamentError::MatchNotFound(self.semi_offset() + index));
        }
        self.bracket_match(self.semi_offset() + index)
    }

    pub fn final_match(&self) -> Result<&GameMatch, TournamentError> {
        self.bracket_match(self.matches.len().saturating_sub(1))
    }

    fn bracket_match(&self, index: usize) -> Result<&GameMatch, TournamentError> {
        if !self.is_started() {
            return Err(TournamentError::NotStarted);
        }
        self.get_match(index)
    }

    /// The match to be played next.
    pub fn next_match(&self) -> Result<&GameMatch, TournamentError> {
        if !self.is_running() {
            return Err(TournamentError::NotRunning);
        }
        self.get_match(self.current)
    }

    /// Title for the match at `index`, e.g. "Tryout 3/6" or "Semi 2/2".
    pub fn match_title(&self, index: usize) -> Result<String, TournamentError> {
        let m = self.get_match(index)?;
        Ok(match m.kind {
            MatchKind::Tryout => m.title(index, self.tryout_count()),
            MatchKind::Semi => m.title(index - self.semi_offset(), 2),
            MatchKind::Final => m.title(0, 1),
        })
    }

    /// Registration is open and there is room.
    pub fn is_joinable(&self) -> bool {
        self.players.len() < self.config.max_players && !self.is_started()
    }

    pub fn is_startable(&self) -> bool {
        let n = self.players.len();
        !self.is_started() && n >= self.config.min_players && n <= self.config.max_players
    }

    pub fn is_started(&self) -> bool {
        self.started.is_some()
    }

    pub fn is_ended(&self) -> bool {
        self.ended.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.is_started() && !self.is_ended()
    }

    /// Kills plus self-kills over the whole tournament.
    pub fn archers_harmed(&self) -> u32 {
        self.matches.iter().map(GameMatch::archers_harmed).sum()
    }
}
