//! Tunables, loaded from the environment with sane defaults.

use crate::models::PersonId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Rules a tournament is created with. Persisted inside the tournament so a stored
/// tournament keeps playing by the rules it started with.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Fewest players that can start. With exactly this many, tryouts are skipped.
    pub min_players: usize,
    pub max_players: usize,
    /// Kills to win a tryout or semi.
    pub match_length: u32,
    /// Kills to win the final.
    pub final_length: u32,
    /// Up to this many tryouts, the top two of each tryout go to the semis; above it only the winner.
    pub double_promotion_limit: usize,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            min_players: 8,
            max_players: 32,
            match_length: 10,
            final_length: 20,
            double_promotion_limit: 4,
        }
    }
}

impl TournamentConfig {
    /// Defaults overridden by MIN_PLAYERS, MAX_PLAYERS, MATCH_LENGTH, FINAL_LENGTH.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            min_players: env_or("MIN_PLAYERS", d.min_players),
            max_players: env_or("MAX_PLAYERS", d.max_players),
            match_length: env_or("MATCH_LENGTH", d.match_length),
            final_length: env_or("FINAL_LENGTH", d.final_length),
            double_promotion_limit: d.double_promotion_limit,
        }
    }
}

/// People credited at the end of a tournament besides the players.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CreditsConfig {
    pub executive: Option<PersonId>,
    pub producers: Vec<PersonId>,
}

impl CreditsConfig {
    /// Reads CREDITS_EXECUTIVE and CREDITS_PRODUCERS (comma separated).
    pub fn from_env() -> Self {
        let executive = std::env::var("CREDITS_EXECUTIVE")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let producers = std::env::var("CREDITS_PRODUCERS")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        Self { executive, producers }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
