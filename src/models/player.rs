//! Players and their kill-based scoring.

use crate::models::person::{Color, Person, PersonId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A person taking part in play.
///
/// The same type serves two lifetimes: the copy held by a `Match` only counts what
/// happened in that match, while the copy in `Tournament::players` is rebuilt by
/// folding every played match into it (see [`Player::update`]).
///
/// Every `remove_*` is a best-effort undo and does nothing when its counter is zero.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub person: Person,
    pub preferred_color: Color,
    /// Color actually used in the match; differs from `preferred_color` after a conflict.
    pub color: Color,
    pub shots: u32,
    pub sweeps: u32,
    pub kills: u32,
    #[serde(rename = "self")]
    pub self_kills: u32,
    pub explosions: u32,
    /// Number of matches folded into this player.
    pub matches: u32,
}

impl Player {
    /// Create a player for a person. Counters start at zero.
    pub fn new(person: Person) -> Self {
        let preferred_color = person.preferred_color().unwrap_or(Color::Green);
        Self {
            person,
            preferred_color,
            color: preferred_color,
            shots: 0,
            sweeps: 0,
            kills: 0,
            self_kills: 0,
            explosions: 0,
            matches: 0,
        }
    }

    pub fn id(&self) -> &PersonId {
        &self.person.id
    }

    pub fn nick(&self) -> &str {
        &self.person.nick
    }

    /// Score used to rank runnerups and to settle color conflicts.
    ///
    /// A sweep is effectively worth 11 since it also carries a shot and three kills.
    pub fn score(&self) -> u32 {
        self.sweeps * 5 + self.shots * 3 + self.kills * 2 + self.self_kills + self.explosions
    }

    pub fn add_shot(&mut self) {
        self.shots += 1;
    }

    pub fn remove_shot(&mut self) {
        self.shots = self.shots.saturating_sub(1);
    }

    /// A sweep also grants three kills and a shot.
    pub fn add_sweep(&mut self) {
        self.sweeps += 1;
        self.add_shot();
        self.add_kills(3);
    }

    pub fn remove_sweep(&mut self) {
        if self.sweeps == 0 {
            return;
        }
        self.sweeps -= 1;
        self.remove_shot();
        for _ in 0..3 {
            self.remove_kill();
        }
    }

    pub fn add_kill(&mut self) {
        self.add_kills(1);
    }

    pub fn add_kills(&mut self, n: u32) {
        self.kills += n;
    }

    pub fn remove_kill(&mut self) {
        self.kills = self.kills.saturating_sub(1);
    }

    /// A self-kill costs a kill and gives a shot.
    pub fn add_self(&mut self) {
        self.self_kills += 1;
        self.remove_kill();
        self.add_shot();
    }

    pub fn remove_self(&mut self) {
        if self.self_kills == 0 {
            return;
        }
        self.self_kills -= 1;
        self.add_kill();
        self.remove_shot();
    }

    /// An explosion gives a shot and a kill.
    pub fn add_explosion(&mut self) {
        self.explosions += 1;
        self.add_shot();
        self.add_kill();
    }

    pub fn remove_explosion(&mut self) {
        if self.explosions == 0 {
            return;
        }
        self.explosions -= 1;
        self.remove_shot();
        self.remove_kill();
    }

    /// Zero all counters, including the match count.
    pub fn reset(&mut self) {
        self.shots = 0;
        self.sweeps = 0;
        self.kills = 0;
        self.self_kills = 0;
        self.explosions = 0;
        self.matches = 0;
    }

    /// Fold the counters of one match-local player into this one. Each call counts as one match.
    pub fn update(&mut self, other: &Player) {
        self.shots += other.shots;
        self.sweeps += other.sweeps;
        self.kills += other.kills;
        self.self_kills += other.self_kills;
        self.explosions += other.explosions;
        self.matches += 1;
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}sh {}sw {}k {}s {}e",
            self.nick(),
            self.shots,
            self.sweeps,
            self.kills,
            self.self_kills,
            self.explosions
        )
    }
}
