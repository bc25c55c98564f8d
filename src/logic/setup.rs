//! Setup phase: build the bracket once and deal the players into it.

use crate::models::{Event, GameMatch, MatchKind, Person, Player, Tournament, TournamentError, MATCH_SIZE};
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;

/// Start the tournament: build tryouts, two semis and a final, then seed the players.
///
/// With exactly `min_players` registered the tryouts are skipped and the players go
/// straight into the semis. Otherwise there is one tryout per four players (rounded up).
/// The first match is scheduled to start now.
pub fn start_tournament<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
    actor: Option<&Person>,
) -> Result<(), TournamentError> {
    if tournament.is_started() {
        return Err(TournamentError::TournamentStarted);
    }
    let n = tournament.players.len();
    let (min, max) = (tournament.config.min_players, tournament.config.max_players);
    if n < min || n > max {
        return Err(TournamentError::PlayerCount { min, max, got: n });
    }

    let length = tournament.config.match_length;
    let mut matches = Vec::new();
    if n != min {
        for _ in 0..(n + MATCH_SIZE - 1) / MATCH_SIZE {
            matches.push(GameMatch::new(MatchKind::Tryout, matches.len(), length));
        }
    }
    matches.push(GameMatch::new(MatchKind::Semi, matches.len(), length));
    matches.push(GameMatch::new(MatchKind::Semi, matches.len(), length));
    matches.push(GameMatch::new(
        MatchKind::Final,
        matches.len(),
        tournament.config.final_length,
    ));
    tournament.matches = matches;
    tournament.current = 0;

    shuffle_players(tournament, rng)?;
    tournament.started = Some(Utc::now());
    tournament.matches[0].set_time(0, actor)?;

    log::info!(
        "Started {} with {} players in {} matches",
        tournament.name,
        n,
        tournament.matches.len()
    );
    tournament.log_event(Event::new("start", "Tournament started").by(actor));
    Ok(())
}

/// Shuffle the registered players and deal them four at a time, tryouts first.
///
/// People waiting in the runnerup pool (late joins) are not dealt; they only get a
/// seat through the pool.
pub fn shuffle_players<R: Rng + ?Sized>(tournament: &mut Tournament, rng: &mut R) -> Result<(), TournamentError> {
    tournament.players.shuffle(rng);
    let players: Vec<Player> = tournament
        .players
        .iter()
        .filter(|p| !tournament.runnerups.contains(p.id()))
        .cloned()
        .collect();
    for (i, p) in players.into_iter().enumerate() {
        tournament.get_match_mut(i / MATCH_SIZE)?.add_player(p, rng)?;
    }
    Ok(())
}

/// Deal the players again. Only allowed while no match has started.
pub fn reshuffle<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
    actor: Option<&Person>,
) -> Result<(), TournamentError> {
    if !tournament.is_started() {
        return Err(TournamentError::NotStarted);
    }
    if tournament.matches.iter().any(|m| m.is_started()) {
        return Err(TournamentError::MatchesInProgress);
    }
    for m in &mut tournament.matches {
        m.players.clear();
        m.kill_order.clear();
    }
    shuffle_players(tournament, rng)?;
    log::info!("Reshuffled {}", tournament.name);
    tournament.log_event(Event::new("reshuffle", "Players reshuffled").by(actor));
    Ok(())
}
