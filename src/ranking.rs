//! Comparators shared by matches, the bracket, and statistics.
//!
//! Each is a plain `Ordering` function meant for the stable `sort_by`, so equal
//! elements keep their original order.

use crate::models::{Player, Tournament};
use crate::stats::Snapshot;
use std::cmp::Ordering;

/// Highest score first.
pub fn by_score(a: &Player, b: &Player) -> Ordering {
    b.score().cmp(&a.score())
}

/// Most kills first.
pub fn by_kills(a: &Player, b: &Player) -> Ordering {
    b.kills.cmp(&a.kills)
}

/// Who should fill an open seat first: fewest matches played, then most kills.
pub fn by_runnerup(a: &Player, b: &Player) -> Ordering {
    a.matches.cmp(&b.matches).then_with(|| by_kills(a, b))
}

/// Global rank: active people before disabled ones, then tournament wins, then total score.
pub fn by_rank(a: &Snapshot, b: &Snapshot) -> Ordering {
    a.person
        .disabled
        .cmp(&b.person.disabled)
        .then_with(|| b.total.wins.cmp(&a.total.wins))
        .then_with(|| b.total.score.cmp(&a.total.score))
}

/// Earliest scheduled first; unscheduled tournaments go last.
pub fn by_schedule_date(a: &Tournament, b: &Tournament) -> Ordering {
    match (a.scheduled, b.scheduled) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn sort_by_score(players: &[Player]) -> Vec<Player> {
    sorted(players, by_score)
}

pub fn sort_by_kills(players: &[Player]) -> Vec<Player> {
    sorted(players, by_kills)
}

pub fn sort_by_runnerup(players: &[Player]) -> Vec<Player> {
    sorted(players, by_runnerup)
}

fn sorted(players: &[Player], cmp: fn(&Player, &Player) -> Ordering) -> Vec<Player> {
    let mut out = players.to_vec();
    out.sort_by(cmp);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Color, Person};

    fn player(nick: &str, kills: u32, matches: u32) -> Player {
        let mut p = Player::new(Person::new(nick, nick, nick, Color::Green));
        p.kills = kills;
        p.matches = matches;
        p
    }

    fn nicks(ps: &[Player]) -> Vec<&str> {
        ps.iter().map(Player::nick).collect()
    }

    #[test]
    fn kills_descending_and_stable() {
        let ps = vec![player("a", 1, 0), player("b", 3, 0), player("c", 1, 0), player("d", 2, 0)];
        assert_eq!(nicks(&sort_by_kills(&ps)), ["b", "d", "a", "c"]);
    }

    #[test]
    fn runnerup_prefers_fewer_matches_then_kills() {
        let ps = vec![
            player("veteran", 9, 2),
            player("fresh", 0, 0),
            player("one_low", 2, 1),
            player("one_high", 5, 1),
        ];
        assert_eq!(
            nicks(&sort_by_runnerup(&ps)),
            ["fresh", "one_high", "one_low", "veteran"]
        );
    }

    #[test]
    fn score_uses_all_counters() {
        let mut hi = player("hi", 0, 0);
        hi.add_sweep();
        let mut lo = player("lo", 4, 0);
        lo.add_explosion();
        // hi: 5 + 3 + 6 = 14, lo: 3 + 10 + 1 = 14; stable keeps input order
        assert_eq!(hi.score(), 14);
        assert_eq!(lo.score(), 14);
        assert_eq!(nicks(&sort_by_score(&[lo.clone(), hi.clone()])), ["lo", "hi"]);
        lo.add_shot();
        assert_eq!(nicks(&sort_by_score(&[hi, lo])), ["lo", "hi"]);
    }
}
