//! Elimination tournament engine: library with models and bracket logic.
//!
//! Players are dealt into four-player tryouts, the best advance to two semis and a
//! final, and the rest wait in a runnerup pool that backfills short matches. Storage
//! and live updates are collaborators behind the [`Store`] and [`Broadcaster`] traits.

pub mod broadcast;
pub mod config;
pub mod engine;
pub mod logic;
pub mod models;
pub mod ranking;
pub mod registry;
pub mod stats;
pub mod store;

pub use broadcast::{BroadcastError, Broadcaster, ChannelBroadcaster, Update};
pub use config::{CreditsConfig, TournamentConfig};
pub use engine::{Engine, EngineError};
pub use logic::{
    autoplay_match, award_medals, backfill_semis, commit_round, credits, end_match, move_players,
    open_semi_seats, populate_runnerups, reset_match, reshuffle, runnerup_players, set_match_time,
    shuffle_players, start_match, start_tournament, update_players, update_runnerups, Credits,
};
pub use models::{
    Color, Event, GameMatch, MatchKind, Person, PersonId, Player, PlayerRound, Round,
    Tournament, TournamentError, TournamentId,
};
pub use registry::Registry;
pub use store::{MemoryStore, Store, StoreError};
