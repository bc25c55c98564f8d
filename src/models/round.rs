//! Round: one committed unit of play.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker in the second field of a kill pair meaning the player killed themselves.
pub const SELF_KILL: i32 = -1;

/// Kills a player takes in one round to count as a sweep.
pub const SWEEP_KILLS: u32 = 3;

/// Score delta for one round, one entry per player slot.
///
/// `kills[i]` is `(kills, self_flag)`; a self flag of [`SELF_KILL`] marks a self-kill.
/// Rounds are append-only once committed to a match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub kills: Vec<(u32, i32)>,
    pub shots: Vec<bool>,
    pub committed: DateTime<Utc>,
}

/// What one player did in a round, as reported by the game.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerRound {
    pub ups: u32,
    pub self_kill: bool,
    pub shot: bool,
}

impl Round {
    /// Build a round from per-player reports, stamped now.
    pub fn new(states: &[PlayerRound]) -> Self {
        Self {
            kills: states
                .iter()
                .map(|s| (s.ups, if s.self_kill { SELF_KILL } else { 0 }))
                .collect(),
            shots: states.iter().map(|s| s.shot).collect(),
            committed: Utc::now(),
        }
    }

    /// Number of player slots this round covers.
    pub fn len(&self) -> usize {
        self.kills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kills.is_empty()
    }

    pub fn is_self(&self, slot: usize) -> bool {
        self.kills.get(slot).map_or(false, |k| k.1 == SELF_KILL)
    }

    /// Whether the player in `slot` earns a shot this round.
    pub fn grants_shot(&self, slot: usize) -> bool {
        let kills = self.kills.get(slot).map_or(0, |k| k.0);
        self.is_self(slot) || kills == SWEEP_KILLS || self.shots.get(slot).copied().unwrap_or(false)
    }

    /// Kills plus self-kills in this round.
    pub fn archers_harmed(&self) -> u32 {
        self.kills
            .iter()
            .map(|&(k, s)| k + u32::from(s == SELF_KILL))
            .sum()
    }
}
