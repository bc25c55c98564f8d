//! Data structures for the bracket: people, players, rounds, matches, tournaments.

mod event;
mod game;
mod person;
mod player;
mod round;
mod tournament;

pub use event::Event;
pub use game::{distinct_colors, GameMatch, MatchKind, MATCH_SIZE};
pub use person::{Color, Person, PersonId};
pub use player::Player;
pub use round::{PlayerRound, Round, SELF_KILL, SWEEP_KILLS};
pub use tournament::{Tournament, TournamentError, TournamentId};
