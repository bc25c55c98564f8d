//! Tryout advancement: promotions into the semis and the runnerup pool.

use crate::logic::finals::move_semi_players;
use crate::models::{MatchKind, Player, Tournament, TournamentError};
use crate::ranking;
use rand::Rng;

/// Move the players of a just-ended, non-final match on to where they belong.
///
/// After a tryout, the next match is topped up from the runnerups if it is a tryout
/// that would otherwise start short.
pub fn move_players<R: Rng + ?Sized>(tournament: &mut Tournament, index: usize, rng: &mut R) -> Result<(), TournamentError> {
    match tournament.get_match(index)?.kind {
        MatchKind::Tryout => {
            move_tryout_players(tournament, index, rng)?;
            let next = tournament.current;
            let short = tournament
                .next_match()
                .map(|m| m.kind == MatchKind::Tryout && !m.is_full())
                .unwrap_or(false);
            if short {
                log::info!("Setting runnerups for match {}", next + 1);
                populate_runnerups(tournament, next, rng)?;
            }
            Ok(())
        }
        MatchKind::Semi => move_semi_players(tournament, index, rng),
        MatchKind::Final => Ok(()),
    }
}

/// Send the best of a tryout to the semis and the rest to the runnerups.
///
/// With few tryouts the top two advance, otherwise only the winner. Winners alternate
/// between the semis by `(match index + place) % 2` so they do not meet right away.
fn move_tryout_players<R: Rng + ?Sized>(tournament: &mut Tournament, index: usize, rng: &mut R) -> Result<(), TournamentError> {
    update_players(tournament)?;
    let ranked = tournament.get_match(index)?.players_by_kills();
    let double = tournament.tryout_count() <= tournament.config.double_promotion_limit;
    let offset = tournament.semi_offset();

    for (place, p) in ranked.iter().enumerate() {
        let id = p.person.id.clone();
        if place == 0 || (double && place < 2) {
            let player = tournament
                .get_player(&id)
                .cloned()
                .ok_or_else(|| TournamentError::PlayerNotFound(id.clone()))?;
            let mut semi = offset + (index + place) % 2;
            if tournament.get_match(semi)?.is_full() {
                semi = offset + (index + place + 1) % 2;
            }
            log::info!("{} advances to semi {}", player.nick(), semi - offset + 1);
            tournament.get_match_mut(semi)?.add_player(player, rng)?;
            remove_from_runnerups(tournament, &id);
        } else if !tournament.runnerups.contains(&id) {
            tournament.runnerups.push(id);
        }
    }

    update_runnerups(tournament)
}

/// Fill the match at `index` with the best runnerups until it has four players.
///
/// Returns how many were added. Runnerups stay in the pool until they win a tryout.
pub fn populate_runnerups<R: Rng + ?Sized>(tournament: &mut Tournament, index: usize, rng: &mut R) -> Result<usize, TournamentError> {
    let candidates = runnerup_players(tournament)?;
    let mut added = 0;
    for p in candidates {
        let m = tournament.get_match_mut(index)?;
        if m.is_full() {
            break;
        }
        if m.has_person(p.id()) {
            continue;
        }
        log::info!("Runnerup {} fills a seat in match {}", p.nick(), index + 1);
        m.add_player(p, rng)?;
        added += 1;
    }
    if !tournament.get_match(index)?.is_full() {
        log::warn!("Not enough runnerups to fill match {}", index + 1);
    }
    Ok(added)
}

/// Rebuild the tournament-wide players by folding in every started match.
pub fn update_players(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let Tournament { players, matches, .. } = tournament;
    for p in players.iter_mut() {
        p.reset();
    }
    for m in matches.iter().filter(|m| m.is_started()) {
        for p in &m.players {
            players
                .iter_mut()
                .find(|tp| tp.person.id == p.person.id)
                .ok_or_else(|| TournamentError::PlayerNotFound(p.person.id.clone()))?
                .update(p);
        }
    }
    Ok(())
}

/// The runnerups as tournament-wide players, best candidate first.
pub fn runnerup_players(tournament: &mut Tournament) -> Result<Vec<Player>, TournamentError> {
    if !tournament.is_started() {
        return Err(TournamentError::NotStarted);
    }
    update_players(tournament)?;
    let players = tournament
        .runnerups
        .iter()
        .map(|id| {
            tournament
                .get_player(id)
                .cloned()
                .ok_or_else(|| TournamentError::PlayerNotFound(id.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ranking::sort_by_runnerup(&players))
}

/// Rewrite the runnerup pool in ranked order.
pub fn update_runnerups(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let ranked = runnerup_players(tournament)?;
    tournament.runnerups = ranked.into_iter().map(|p| p.person.id).collect();
    Ok(())
}

pub(crate) fn remove_from_runnerups(tournament: &mut Tournament, id: &str) {
    tournament.runnerups.retain(|r| r != id);
}
