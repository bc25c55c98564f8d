//! Cross-tournament statistics and the global ranking.

use crate::models::{Person, PersonId, Tournament};
use crate::ranking;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sum of everything a person did, either in one tournament or overall.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub shots: u32,
    pub sweeps: u32,
    pub kills: u32,
    #[serde(rename = "self")]
    pub self_kills: u32,
    pub matches: u32,
    pub rounds: u32,
    pub score: u32,
    /// Seconds spent in ended matches.
    pub playtime: i64,
    /// Tournaments won.
    pub wins: u32,
}

impl PlayerSnapshot {
    fn absorb(&mut self, other: &PlayerSnapshot) {
        self.shots += other.shots;
        self.sweeps += other.sweeps;
        self.kills += other.kills;
        self.self_kills += other.self_kills;
        self.matches += other.matches;
        self.rounds += other.rounds;
        self.score += other.score;
        self.playtime += other.playtime;
        self.wins += other.wins;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub person: Person,
    pub total: PlayerSnapshot,
    /// 1-based position by `ranking::by_rank`.
    pub rank: usize,
    /// Same numbers, per tournament id.
    pub tournaments: BTreeMap<String, PlayerSnapshot>,
}

impl Snapshot {
    fn new(person: Person) -> Self {
        Self {
            person,
            total: PlayerSnapshot::default(),
            rank: 0,
            tournaments: BTreeMap::new(),
        }
    }
}

pub type CompleteSnapshot = BTreeMap<PersonId, Snapshot>;

/// Aggregate every played match of every tournament per person, then rank.
///
/// People who played but are missing from `people` are taken from the match roster.
pub fn snapshot(tournaments: &[Tournament], people: &[Person]) -> CompleteSnapshot {
    let mut ss: CompleteSnapshot = people
        .iter()
        .map(|p| (p.id.clone(), Snapshot::new(p.clone())))
        .collect();

    for t in tournaments {
        let tid = t.id.to_string();
        for m in t.matches.iter().filter(|m| m.is_started()) {
            let playtime = m.duration().map_or(0, |d| d.num_seconds());
            for p in &m.players {
                let entry = ss
                    .entry(p.person.id.clone())
                    .or_insert_with(|| Snapshot::new(p.person.clone()));
                let ts = entry.tournaments.entry(tid.clone()).or_default();
                ts.matches += 1;
                ts.rounds += m.rounds.len() as u32;
                ts.shots += p.shots;
                ts.sweeps += p.sweeps;
                ts.kills += p.kills;
                ts.self_kills += p.self_kills;
                ts.score += p.score();
                ts.playtime += playtime;
            }
        }

        if t.is_ended() {
            if let Some(winner) = t.winners.first() {
                if let Some(entry) = ss.get_mut(&winner.person.id) {
                    entry.tournaments.entry(tid.clone()).or_default().wins += 1;
                }
            }
        }
    }

    for s in ss.values_mut() {
        let mut total = PlayerSnapshot::default();
        for ts in s.tournaments.values() {
            total.absorb(ts);
        }
        s.total = total;
    }

    let mut ranked: Vec<&Snapshot> = ss.values().collect();
    ranked.sort_by(|a, b| ranking::by_rank(a, b));
    let ranks: Vec<(PersonId, usize)> = ranked
        .iter()
        .enumerate()
        .map(|(i, s)| (s.person.id.clone(), i + 1))
        .collect();
    for (id, rank) in ranks {
        if let Some(s) = ss.get_mut(&id) {
            s.rank = rank;
        }
    }
    ss
}
