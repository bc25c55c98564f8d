//! Final rounds: semis feed the final, the final hands out medals.

use crate::config::CreditsConfig;
use crate::logic::tryouts::update_players;
use crate::models::{Event, MatchKind, Person, PersonId, Tournament, TournamentError};
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Place the two best of a semi into the final.
pub(crate) fn move_semi_players<R: Rng + ?Sized>(tournament: &mut Tournament, index: usize, rng: &mut R) -> Result<(), TournamentError> {
    update_players(tournament)?;
    let top: Vec<PersonId> = tournament
        .get_match(index)?
        .players_by_kills()
        .into_iter()
        .take(2)
        .map(|p| p.person.id)
        .collect();
    let final_index = tournament.matches.len() - 1;
    for id in top {
        let player = tournament
            .get_player(&id)
            .cloned()
            .ok_or_else(|| TournamentError::PlayerNotFound(id.clone()))?;
        log::info!("{} advances to the final", player.nick());
        tournament.get_match_mut(final_index)?.add_player(player, rng)?;
    }
    Ok(())
}

/// Crown the top three of the final and end the tournament.
pub fn award_medals(tournament: &mut Tournament, index: usize, actor: Option<&Person>) -> Result<(), TournamentError> {
    let m = tournament.get_match(index)?;
    if m.kind != MatchKind::Final {
        return Err(TournamentError::NotFinal);
    }
    let winners: Vec<_> = m.players_by_kills().into_iter().take(3).collect();
    let nicks: Vec<&str> = winners.iter().map(|p| p.nick()).collect();
    log::info!("{} finished, podium: {}", tournament.name, nicks.join(", "));

    tournament.winners = winners;
    tournament.ended = Some(Utc::now());
    tournament.log_event(Event::new("tournament_end", "Tournament finished").by(actor));
    Ok(())
}

/// Data for the credits roll.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    pub executive: Option<Person>,
    pub producers: Vec<Person>,
    /// Medalists first, then the runnerups.
    pub players: Vec<Person>,
    pub archers_harmed: u32,
}

/// Build the credits for an ended tournament. `lookup` resolves staff identities;
/// unknown ones are skipped.
pub fn credits<F>(tournament: &Tournament, config: &CreditsConfig, lookup: F) -> Result<Credits, TournamentError>
where
    F: Fn(&str) -> Option<Person>,
{
    if !tournament.is_ended() {
        return Err(TournamentError::NotEnded);
    }
    let resolve = |id: &str| {
        let p = lookup(id);
        if p.is_none() {
            log::warn!("Credits: no person {}", id);
        }
        p
    };

    let mut players: Vec<Person> = tournament.winners.iter().map(|p| p.person.clone()).collect();
    for id in &tournament.runnerups {
        let p = tournament
            .get_player(id)
            .ok_or_else(|| TournamentError::PlayerNotFound(id.clone()))?;
        players.push(p.person.clone());
    }

    Ok(Credits {
        executive: config.executive.as_deref().and_then(|id| resolve(id)),
        producers: config.producers.iter().filter_map(|id| resolve(id.as_str())).collect(),
        players,
        archers_harmed: tournament.archers_harmed(),
    })
}
