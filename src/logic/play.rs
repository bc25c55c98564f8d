//! Match flow: schedule, start, score, end, reset, and simulated play.

use crate::logic::{award_medals, move_players};
use crate::models::{MatchKind, Person, PlayerRound, Round, Tournament, TournamentError};
use rand::Rng;

/// Schedule the match at `index` to start in `minutes`.
pub fn set_match_time(
    tournament: &mut Tournament,
    index: usize,
    minutes: i64,
    actor: Option<&Person>,
) -> Result<(), TournamentError> {
    tournament.get_match_mut(index)?.set_time(minutes, actor)
}

/// Start the match at `index`; the tournament casters are attached to it.
pub fn start_match(tournament: &mut Tournament, index: usize, actor: Option<&Person>) -> Result<(), TournamentError> {
    let casters = tournament.casters.clone();
    let m = tournament.get_match_mut(index)?;
    m.start(&casters, actor)?;
    log::info!("{} started", m);
    Ok(())
}

/// Apply one round to the match at `index`.
pub fn commit_round(tournament: &mut Tournament, index: usize, round: Round) -> Result<(), TournamentError> {
    let m = tournament.get_match_mut(index)?;
    m.commit(round)?;
    log::debug!("Round {} committed to {}: order {:?}", m.rounds.len(), m, m.kill_order);
    Ok(())
}

/// End the match at `index` and move its players on.
///
/// A final hands out the medals; any other match feeds the next bracket and the runnerups.
pub fn end_match<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    index: usize,
    rng: &mut R,
    actor: Option<&Person>,
) -> Result<(), TournamentError> {
    let m = tournament.get_match_mut(index)?;
    m.end(actor)?;
    log::info!("{} ended", m);
    let kind = m.kind;

    tournament.current = tournament.current.max(index + 1);
    match kind {
        MatchKind::Final => award_medals(tournament, index, actor),
        MatchKind::Tryout | MatchKind::Semi => move_players(tournament, index, rng),
    }
}

/// Zero the scores of the match at `index` and drop its rounds.
pub fn reset_match(tournament: &mut Tournament, index: usize, actor: Option<&Person>) -> Result<(), TournamentError> {
    let m = tournament.get_match_mut(index)?;
    m.reset();
    log::info!("{} reset by {}", m, actor.map_or("system", |p| p.nick.as_str()));
    Ok(())
}

/// Play the match at `index` to the end with random rounds.
pub fn autoplay_match<R: Rng + ?Sized>(tournament: &mut Tournament, index: usize, rng: &mut R) -> Result<(), TournamentError> {
    let m = tournament.get_match_mut(index)?;
    if m.players.is_empty() {
        return Err(TournamentError::EmptyMatch(index));
    }
    if m.is_ended() {
        return Err(TournamentError::AlreadyEnded);
    }
    if m.can_start() {
        m.start(&[], None)?;
    }
    while !m.can_end() {
        let round = random_round(m.players.len(), rng);
        m.commit(round)?;
    }
    end_match(tournament, index, rng, None)
}

/// One player scores 1-3 kills; the others occasionally kill themselves or earn a shot.
fn random_round<R: Rng + ?Sized>(players: usize, rng: &mut R) -> Round {
    let leader = rng.gen_range(0..players);
    let states: Vec<PlayerRound> = (0..players)
        .map(|i| {
            if i == leader {
                PlayerRound {
                    ups: rng.gen_range(1..=3),
                    self_kill: false,
                    shot: false,
                }
            } else {
                PlayerRound {
                    ups: 0,
                    self_kill: rng.gen_bool(0.1),
                    shot: rng.gen_bool(0.05),
                }
            }
        })
        .collect();
    Round::new(&states)
}
