//! Match (game) state machine for one four-player game instance.

use crate::models::event::Event;
use crate::models::person::{Color, Person, PersonId};
use crate::models::player::Player;
use crate::models::round::Round;
use crate::models::tournament::TournamentError;
use crate::ranking;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Players in a full match.
pub const MATCH_SIZE: usize = 4;

/// Phase of the bracket this match belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Tryout,
    Semi,
    Final,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchKind::Tryout => "Tryout",
            MatchKind::Semi => "Semi",
            MatchKind::Final => "Final",
        };
        f.write_str(s)
    }
}

/// A single match: up to four players, the rounds they played, and its timestamps.
///
/// `kill_order[0]` is the slot index of the player in the lead. Ties keep slot order.
///
/// Lifecycle: unscheduled -> scheduled -> started -> ended. `started` and `ended` are
/// stamped once and never cleared.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub players: Vec<Player>,
    #[serde(default)]
    pub casters: Vec<PersonId>,
    pub kind: MatchKind,
    /// Position in the tournament's match list.
    pub index: usize,
    /// Kills needed to be allowed to end the match.
    pub length: u32,
    /// Minutes between this match and the next one.
    pub pause_minutes: u32,
    pub scheduled: Option<DateTime<Utc>>,
    pub started: Option<DateTime<Utc>>,
    pub ended: Option<DateTime<Utc>>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub kill_order: Vec<usize>,
    #[serde(default)]
    pub rounds: Vec<Round>,
}

impl GameMatch {
    pub fn new(kind: MatchKind, index: usize, length: u32) -> Self {
        Self {
            players: Vec::new(),
            casters: Vec::new(),
            kind,
            index,
            length,
            pause_minutes: 5,
            scheduled: None,
            started: None,
            ended: None,
            events: Vec::new(),
            kill_order: Vec::new(),
            rounds: Vec::new(),
        }
    }

    pub fn log_event(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= MATCH_SIZE
    }

    pub fn has_person(&self, id: &str) -> bool {
        self.players.iter().any(|p| p.person.id == id)
    }

    /// Seat a player. Adding the fourth player settles color conflicts.
    pub fn add_player<R: Rng + ?Sized>(&mut self, mut player: Player, rng: &mut R) -> Result<(), TournamentError> {
        if self.is_full() {
            return Err(TournamentError::MatchFull(self.index));
        }
        player.color = player.preferred_color;
        self.players.push(player);

        if self.players.len() == MATCH_SIZE && self.color_slots().len() != MATCH_SIZE {
            self.correct_color_conflicts(rng)?;
        }
        Ok(())
    }

    /// Map of assigned color to the first slot holding it. Built from the roster each
    /// time, so it can never go stale after a reset or a reshuffle.
    pub fn color_slots(&self) -> BTreeMap<Color, usize> {
        let mut slots = BTreeMap::new();
        for (i, p) in self.players.iter().enumerate() {
            slots.entry(p.color).or_insert(i);
        }
        slots
    }

    /// Palette colors nobody in this match is using.
    pub fn available_colors(&self) -> Vec<Color> {
        let taken = self.color_slots();
        Color::ALL
            .iter()
            .copied()
            .filter(|c| !taken.contains_key(c))
            .collect()
    }

    /// Give every player a distinct color.
    ///
    /// Players sharing a preferred color are ranked by score; the best keeps the color and
    /// the rest get a random free one, with their match stats reset.
    pub fn correct_color_conflicts<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), TournamentError> {
        let mut groups: BTreeMap<Color, Vec<usize>> = BTreeMap::new();
        for (i, p) in self.players.iter().enumerate() {
            groups.entry(p.preferred_color).or_default().push(i);
        }

        for (preferred, mut slots) in groups {
            if slots.len() < 2 {
                continue;
            }
            slots.sort_by(|&a, &b| ranking::by_score(&self.players[a], &self.players[b]));

            for &slot in &slots[1..] {
                let new = Color::random_from(&self.available_colors(), rng)
                    .ok_or(TournamentError::NoFreeColor(self.index))?;
                let p = &mut self.players[slot];
                p.color = new;
                p.reset();
                log::info!("{} corrected from {} to {}", p.nick(), preferred, new);
                let event = Event::new("color_conflict", "{nick} corrected from {preferred} to {new}")
                    .with("nick", p.nick())
                    .with("preferred", preferred)
                    .with("new", new)
                    .with("person", &p.person.id);
                self.log_event(event);
            }
        }
        Ok(())
    }

    /// Schedule the match `minutes` from now. Later calls win.
    pub fn set_time(&mut self, minutes: i64, actor: Option<&Person>) -> Result<(), TournamentError> {
        if self.is_started() {
            return Err(TournamentError::AlreadyStarted);
        }
        self.scheduled = Some(Utc::now() + Duration::minutes(minutes));
        let event = Event::new("time_set", "{match} scheduled in {minutes}m")
            .with("match", self.index)
            .with("minutes", minutes)
            .by(actor);
        self.log_event(event);
        Ok(())
    }

    /// Start the match: match-local stats are zeroed and the start is stamped.
    pub fn start(&mut self, casters: &[PersonId], actor: Option<&Person>) -> Result<(), TournamentError> {
        if self.is_started() {
            return Err(TournamentError::AlreadyStarted);
        }
        for p in &mut self.players {
            p.reset();
        }
        self.casters = casters.to_vec();
        self.started = Some(Utc::now());
        self.log_event(Event::new("started", "{match} started").with("match", self.index).by(actor));
        Ok(())
    }

    /// Apply one round of scoring.
    pub fn commit(&mut self, round: Round) -> Result<(), TournamentError> {
        if round.len() != self.players.len() || round.shots.len() != self.players.len() {
            return Err(TournamentError::RoundSize {
                expected: self.players.len(),
                got: round.len(),
            });
        }
        for (i, &(kills, _)) in round.kills.iter().enumerate() {
            let p = &mut self.players[i];
            p.add_kills(kills);
            if round.is_self(i) {
                p.add_self();
            }
            if round.grants_shot(i) {
                p.add_shot();
            }
        }
        self.rounds.push(round);
        self.kill_order = self.make_kill_order();
        Ok(())
    }

    /// Close the match. The leader gets one last shot.
    ///
    /// Moving players on to the next bracket is the tournament's job, see `logic::end_match`.
    pub fn end(&mut self, actor: Option<&Person>) -> Result<(), TournamentError> {
        if self.is_ended() {
            return Err(TournamentError::AlreadyEnded);
        }
        self.kill_order = self.make_kill_order();
        if let Some(&winner) = self.kill_order.first() {
            self.players[winner].add_shot();
        }
        self.ended = Some(Utc::now());
        self.log_event(Event::new("ended", "{match} ended").with("match", self.index).by(actor));
        Ok(())
    }

    /// Zero every player and drop the round history. Timestamps are kept.
    pub fn reset(&mut self) {
        for p in &mut self.players {
            p.reset();
        }
        self.rounds.clear();
        self.kill_order = self.make_kill_order();
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled.is_some()
    }

    pub fn is_started(&self) -> bool {
        self.started.is_some()
    }

    pub fn is_ended(&self) -> bool {
        self.ended.is_some()
    }

    pub fn can_start(&self) -> bool {
        !self.is_started() && !self.is_ended()
    }

    /// Open and somebody has reached the match length.
    pub fn can_end(&self) -> bool {
        self.is_open() && self.players.iter().any(|p| p.kills >= self.length)
    }

    pub fn is_open(&self) -> bool {
        self.is_started() && !self.is_ended()
    }

    /// Slot indices ordered by kills, most first. Equal kills keep slot order.
    pub fn make_kill_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.players.len()).collect();
        order.sort_by(|&a, &b| ranking::by_kills(&self.players[a], &self.players[b]));
        order
    }

    /// Players ordered by kills, most first.
    pub fn players_by_kills(&self) -> Vec<Player> {
        self.make_kill_order()
            .into_iter()
            .map(|i| self.players[i].clone())
            .collect()
    }

    /// Kills plus self-kills over every round.
    pub fn archers_harmed(&self) -> u32 {
        self.rounds.iter().map(Round::archers_harmed).sum()
    }

    /// Wall time between start and end, if both happened.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started, self.ended) {
            (Some(s), Some(e)) => Some(e - s),
            _ => None,
        }
    }

    /// Title such as "Tryout 2/5". `of` is the number of matches of this kind.
    pub fn title(&self, position: usize, of: usize) -> String {
        match self.kind {
            MatchKind::Final => "Final".to_string(),
            kind => format!("{} {}/{}", kind, position + 1, of),
        }
    }
}

impl fmt::Display for GameMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tempo = if !self.is_started() {
            "not started"
        } else if self.is_ended() {
            "ended"
        } else {
            "playing"
        };
        let name = match self.kind {
            MatchKind::Final => "Final".to_string(),
            kind => format!("{} {}", kind, self.index + 1),
        };
        let names: Vec<&str> = self.players.iter().map(Player::nick).collect();
        write!(f, "<{}: {} - {}>", name, names.join(" / "), tempo)
    }
}

/// Distinct colors currently assigned in a match.
pub fn distinct_colors(players: &[Player]) -> usize {
    players.iter().map(|p| p.color).collect::<BTreeSet<_>>().len()
}
