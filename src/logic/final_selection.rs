//! Final selection: hand-pick runnerups for the seats left open in the semis.

use crate::logic::tryouts::{remove_from_runnerups, update_players};
use crate::models::{Event, Person, PersonId, Tournament, TournamentError, MATCH_SIZE};
use rand::Rng;

/// Seats the semis still have open.
pub fn open_semi_seats(tournament: &Tournament) -> Result<usize, TournamentError> {
    let taken = tournament.semi(0)?.players.len() + tournament.semi(1)?.players.len();
    Ok(2 * MATCH_SIZE - taken)
}

/// Put the given people into the open semi seats, always into the emptier semi
/// (the first one on a tie), and take them out of the runnerups.
///
/// The number of ids must match the open seats exactly, and each id must be a distinct
/// runnerup not already seated in a semi. Nothing changes on error.
pub fn backfill_semis<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    ids: &[PersonId],
    rng: &mut R,
    actor: Option<&Person>,
) -> Result<(), TournamentError> {
    let needed = open_semi_seats(tournament)?;
    if ids.len() != needed {
        return Err(TournamentError::BackfillCount {
            needed,
            got: ids.len(),
        });
    }
    for (i, id) in ids.iter().enumerate() {
        if ids[..i].contains(id) {
            return Err(TournamentError::DuplicatePlayer(id.clone()));
        }
        let seated = tournament.semi(0)?.has_person(id) || tournament.semi(1)?.has_person(id);
        if seated || !tournament.runnerups.contains(id) {
            return Err(TournamentError::NotARunnerup(id.clone()));
        }
    }

    update_players(tournament)?;
    let players = ids
        .iter()
        .map(|id| {
            tournament
                .get_player(id)
                .cloned()
                .ok_or_else(|| TournamentError::PersonNotFound(id.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let offset = tournament.semi_offset();
    for p in players {
        let first = tournament.semi(0)?.players.len();
        let second = tournament.semi(1)?.players.len();
        let index = offset + usize::from(second < first);
        let id = p.person.id.clone();
        log::info!("Backfilling {} into semi {}", p.nick(), index - offset + 1);
        tournament.get_match_mut(index)?.add_player(p, rng)?;
        remove_from_runnerups(tournament, &id);
    }

    tournament.log_event(
        Event::new("backfill_semi", "Backfilling {count} semi players")
            .with("count", needed)
            .with("players", ids)
            .by(actor),
    );
    Ok(())
}
