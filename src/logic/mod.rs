//! Bracket business logic: setup, match flow, tryouts, final selection, finals.

mod final_selection;
mod finals;
mod play;
mod setup;
mod tryouts;

pub use final_selection::{backfill_semis, open_semi_seats};
pub use finals::{award_medals, credits, Credits};
pub use play::{autoplay_match, commit_round, end_match, reset_match, set_match_time, start_match};
pub use setup::{reshuffle, shuffle_players, start_tournament};
pub use tryouts::{move_players, populate_runnerups, runnerup_players, update_players, update_runnerups};
