//! Integration tests for the bracket: setup, tryouts, runnerups, semis and the final.

use elimination_bracket::{
    autoplay_match, award_medals, backfill_semis, commit_round, credits, end_match, reshuffle, runnerup_players,
    start_match, start_tournament, Color, CreditsConfig, MatchKind, Person, PersonId, Player, PlayerRound, Round,
    Tournament, TournamentConfig, TournamentError,
};
use elimination_bracket::logic::open_semi_seats;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn person(i: usize) -> Person {
    Person::new(format!("id{i}"), format!("Player {i}"), format!("p{i}"), Color::ALL[i % Color::ALL.len()])
}

fn tournament(n: usize) -> Tournament {
    let mut t = Tournament::new("Test Cup", None, TournamentConfig::default());
    for i in 0..n {
        t.add_player(person(i)).unwrap();
    }
    t
}

fn started(n: usize, rng: &mut StdRng) -> Tournament {
    let mut t = tournament(n);
    start_tournament(&mut t, rng, None).unwrap();
    t
}

fn roster(t: &Tournament, index: usize) -> Vec<PersonId> {
    t.matches[index].players.iter().map(|p| p.person.id.clone()).collect()
}

/// Start, play a single round where slot i scores `4 - 1 - i` kills, and end.
fn play(t: &mut Tournament, index: usize, rng: &mut StdRng) {
    start_match(t, index, None).unwrap();
    let n = t.matches[index].players.len();
    let states: Vec<PlayerRound> = (0..n)
        .map(|i| PlayerRound {
            ups: (3 - i) as u32,
            ..PlayerRound::default()
        })
        .collect();
    commit_round(t, index, Round::new(&states)).unwrap();
    end_match(t, index, rng, None).unwrap();
}

#[test]
fn bracket_shape_follows_player_count() {
    let mut rng = StdRng::seed_from_u64(1);
    for (n, tryouts) in [(8, 0), (9, 3), (16, 4), (20, 5), (32, 8)] {
        let t = started(n, &mut rng);
        assert_eq!(t.tryout_count(), tryouts, "{n} players");
        assert_eq!(t.matches.len(), tryouts + 3);
        let kinds: Vec<MatchKind> = t.matches[tryouts..].iter().map(|m| m.kind).collect();
        assert_eq!(kinds, [MatchKind::Semi, MatchKind::Semi, MatchKind::Final]);
        assert_eq!(t.final_match().unwrap().length, 20);

        let seated: usize = t.matches.iter().map(|m| m.players.len()).sum();
        assert_eq!(seated, n);
        assert!(t.matches[0].is_scheduled());
        assert_eq!(t.current, 0);
    }
}

#[test]
fn exact_minimum_goes_straight_to_semis() {
    let t = started(8, &mut StdRng::seed_from_u64(2));
    assert_eq!(t.semi(0).unwrap().players.len(), 4);
    assert_eq!(t.semi(1).unwrap().players.len(), 4);
    assert!(t.final_match().unwrap().players.is_empty());
    assert_eq!(t.match_title(1).unwrap(), "Semi 2/2");
    assert_eq!(t.match_title(2).unwrap(), "Final");
}

#[test]
fn player_count_is_checked() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut t = tournament(7);
    let err = start_tournament(&mut t, &mut rng, None).unwrap_err();
    assert_eq!(err, TournamentError::PlayerCount { min: 8, max: 32, got: 7 });
    assert!(!t.is_started());
    assert!(t.matches.is_empty());

    let mut t = tournament(32);
    t.players.push(Player::new(person(32)));
    let err = start_tournament(&mut t, &mut rng, None).unwrap_err();
    assert_eq!(err, TournamentError::PlayerCount { min: 8, max: 32, got: 33 });
}

#[test]
fn cannot_start_twice() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut t = started(12, &mut rng);
    assert_eq!(
        start_tournament(&mut t, &mut rng, None),
        Err(TournamentError::TournamentStarted)
    );
}

#[test]
fn bracket_lookups_need_a_start() {
    let t = tournament(10);
    assert_eq!(t.semi(0).unwrap_err(), TournamentError::NotStarted);
    assert_eq!(t.final_match().unwrap_err(), TournamentError::NotStarted);
    assert_eq!(t.next_match().unwrap_err(), TournamentError::NotRunning);
}

#[test]
fn sixteen_players_double_promotion() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut t = started(16, &mut rng);
    let tryouts: Vec<Vec<PersonId>> = (0..4).map(|i| roster(&t, i)).collect();
    assert_eq!(t.match_title(1).unwrap(), "Tryout 2/4");

    for i in 0..4 {
        play(&mut t, i, &mut rng);
    }
    assert_eq!(t.current, 4);

    let at = |m: usize, s: usize| tryouts[m][s].clone();
    assert_eq!(roster(&t, 4), vec![at(0, 0), at(1, 1), at(2, 0), at(3, 1)]);
    assert_eq!(roster(&t, 5), vec![at(0, 1), at(1, 0), at(2, 1), at(3, 0)]);
    assert_eq!(
        t.runnerups,
        vec![at(0, 2), at(1, 2), at(2, 2), at(3, 2), at(0, 3), at(1, 3), at(2, 3), at(3, 3)]
    );

    // promoted players carry their tournament totals into the semi
    assert!(t.matches[4].players.iter().any(|p| p.kills > 0));

    let semi0 = roster(&t, 4);
    let semi1 = roster(&t, 5);
    play(&mut t, 4, &mut rng);
    play(&mut t, 5, &mut rng);
    assert_eq!(roster(&t, 6), vec![semi0[0].clone(), semi0[1].clone(), semi1[0].clone(), semi1[1].clone()]);

    let finalists = roster(&t, 6);
    play(&mut t, 6, &mut rng);
    assert!(t.is_ended());
    let podium: Vec<PersonId> = t.winners.iter().map(|p| p.person.id.clone()).collect();
    assert_eq!(podium, finalists[..3].to_vec());
    assert_eq!(t.next_match().unwrap_err(), TournamentError::NotRunning);
}

#[test]
fn twenty_players_need_a_backfill() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut t = started(20, &mut rng);
    for i in 0..5 {
        play(&mut t, i, &mut rng);
    }
    assert_eq!(t.semi(0).unwrap().players.len(), 3);
    assert_eq!(t.semi(1).unwrap().players.len(), 2);
    assert_eq!(open_semi_seats(&t).unwrap(), 3);
    assert_eq!(t.runnerups.len(), 15);

    let before = t.clone();
    let two: Vec<PersonId> = t.runnerups[..2].to_vec();
    assert_eq!(
        backfill_semis(&mut t, &two, &mut rng, None),
        Err(TournamentError::BackfillCount { needed: 3, got: 2 })
    );
    assert_eq!(t, before);

    let unknown = vec![t.runnerups[0].clone(), t.runnerups[1].clone(), "nobody".to_string()];
    assert_eq!(
        backfill_semis(&mut t, &unknown, &mut rng, None),
        Err(TournamentError::NotARunnerup("nobody".to_string()))
    );
    assert_eq!(t, before);

    let picked: Vec<PersonId> = t.runnerups[..3].to_vec();
    backfill_semis(&mut t, &picked, &mut rng, None).unwrap();
    assert_eq!(t.semi(0).unwrap().players.len(), 4);
    assert_eq!(t.semi(1).unwrap().players.len(), 4);
    assert_eq!(open_semi_seats(&t).unwrap(), 0);
    assert_eq!(t.runnerups.len(), 12);
    assert!(picked.iter().all(|id| !t.runnerups.contains(id)));
    // emptier semi first, then the first one on a tie
    assert_eq!(roster(&t, 6)[2], picked[0]);
    assert_eq!(roster(&t, 5)[3], picked[1]);
    assert_eq!(roster(&t, 6)[3], picked[2]);
    assert_eq!(t.events.last().unwrap().kind, "backfill_semi");
}

#[test]
fn backfill_takes_each_runnerup_once() {
    let mut rng = StdRng::seed_from_u64(16);
    let mut t = started(20, &mut rng);
    for i in 0..5 {
        play(&mut t, i, &mut rng);
    }
    let before = t.clone();

    let r = t.runnerups[0].clone();
    assert_eq!(
        backfill_semis(&mut t, &[r.clone(), r.clone(), r.clone()], &mut rng, None),
        Err(TournamentError::DuplicatePlayer(r.clone()))
    );
    assert_eq!(t, before);

    let seated = roster(&t, 6)[0].clone();
    let ids = vec![seated.clone(), t.runnerups[0].clone(), t.runnerups[1].clone()];
    assert_eq!(
        backfill_semis(&mut t, &ids, &mut rng, None),
        Err(TournamentError::NotARunnerup(seated))
    );
    assert_eq!(t, before);
}

#[test]
fn reshuffle_leaves_late_joiners_in_the_pool() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut t = started(16, &mut rng);
    t.add_player(person(50)).unwrap();
    reshuffle(&mut t, &mut rng, None).unwrap();

    assert!(t.matches[..4].iter().all(|m| m.players.len() == 4));
    assert!(t.matches[4..].iter().all(|m| m.players.is_empty()));
    assert!(t.matches.iter().all(|m| !m.has_person("id50")));
    assert_eq!(t.runnerups, vec!["id50".to_string()]);

    let mut t = started(8, &mut rng);
    t.add_player(person(50)).unwrap();
    reshuffle(&mut t, &mut rng, None).unwrap();
    assert_eq!(t.semi(0).unwrap().players.len(), 4);
    assert_eq!(t.semi(1).unwrap().players.len(), 4);
    assert!(t.final_match().unwrap().players.is_empty());
    assert!(t.matches.iter().all(|m| !m.has_person("id50")));
}

#[test]
fn short_tryout_is_topped_up_from_runnerups() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut t = started(18, &mut rng);
    assert_eq!(t.matches[4].players.len(), 2);
    let tryout1 = roster(&t, 0);
    let tryout2 = roster(&t, 1);

    for i in 0..3 {
        play(&mut t, i, &mut rng);
    }
    assert_eq!(t.matches[4].players.len(), 2);
    play(&mut t, 3, &mut rng);

    let last = roster(&t, 4);
    assert_eq!(last.len(), 4);
    // single promotion with five tryouts: the runners-up of the first tryouts come first
    assert_eq!(last[2], tryout1[1]);
    assert_eq!(last[3], tryout2[1]);
    assert!(t.runnerups.contains(&last[2]));
}

#[test]
fn late_joiner_is_first_in_line() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut t = started(17, &mut rng);
    let late = person(99);
    t.add_player(late.clone()).unwrap();
    assert_eq!(t.runnerups, vec![late.id.clone()]);

    play(&mut t, 0, &mut rng);
    let line = runnerup_players(&mut t).unwrap();
    assert_eq!(line[0].person.id, late.id);
    assert_eq!(line[0].matches, 0);
    assert!(line[1..].iter().all(|p| p.matches == 1));

    for i in 1..4 {
        play(&mut t, i, &mut rng);
    }
    assert!(t.matches[4].has_person(&late.id));
    assert_eq!(t.matches[4].players.len(), 4);
}

#[test]
fn medals_only_from_the_final() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut t = started(8, &mut rng);
    assert_eq!(award_medals(&mut t, 0, None), Err(TournamentError::NotFinal));
    assert!(t.winners.is_empty());
    assert!(!t.is_ended());
}

#[test]
fn ending_twice_changes_nothing() {
    let mut rng = StdRng::seed_from_u64(10);
    let mut t = started(12, &mut rng);
    play(&mut t, 0, &mut rng);
    let before = t.clone();
    assert_eq!(end_match(&mut t, 0, &mut rng, None), Err(TournamentError::AlreadyEnded));
    assert_eq!(t, before);
}

#[test]
fn reshuffle_only_before_play() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut t = tournament(16);
    assert_eq!(reshuffle(&mut t, &mut rng, None), Err(TournamentError::NotStarted));

    start_tournament(&mut t, &mut rng, None).unwrap();
    reshuffle(&mut t, &mut rng, None).unwrap();
    let seated: usize = t.matches.iter().map(|m| m.players.len()).sum();
    assert_eq!(seated, 16);
    assert!(t.matches[..4].iter().all(|m| m.players.len() == 4));

    start_match(&mut t, 0, None).unwrap();
    assert_eq!(reshuffle(&mut t, &mut rng, None), Err(TournamentError::MatchesInProgress));
}

#[test]
fn join_and_leave_rules() {
    let config = TournamentConfig {
        max_players: 8,
        ..TournamentConfig::default()
    };
    let mut t = Tournament::new("Small", None, config);
    for i in 0..7 {
        t.add_player(person(i)).unwrap();
    }
    let mut twin = person(50);
    twin.nick = " P3 ".to_string();
    assert_eq!(t.add_player(twin), Err(TournamentError::AlreadyJoined));

    t.toggle_player(person(7)).unwrap();
    assert!(!t.is_joinable());
    assert_eq!(t.add_player(person(8)), Err(TournamentError::TournamentFull));

    t.toggle_player(person(7)).unwrap();
    assert_eq!(t.players.len(), 7);
    assert_eq!(
        t.remove_player("id7"),
        Err(TournamentError::PlayerNotFound("id7".to_string()))
    );

    t.add_player(person(7)).unwrap();
    assert!(t.is_startable());
    start_tournament(&mut t, &mut StdRng::seed_from_u64(12), None).unwrap();
    assert_eq!(t.remove_player("id0"), Err(TournamentError::TournamentStarted));
}

#[test]
fn autoplay_runs_a_whole_tournament() {
    let mut rng = StdRng::seed_from_u64(13);
    let mut t = started(16, &mut rng);
    for i in 0..t.matches.len() {
        autoplay_match(&mut t, i, &mut rng).unwrap();
    }
    assert!(t.is_ended());
    assert_eq!(t.winners.len(), 3);
    let f = t.final_match().unwrap();
    assert_eq!(f.players.len(), 4);
    assert!(f.players.iter().any(|p| p.kills >= 20));
    assert!(t.archers_harmed() > 0);

    assert_eq!(autoplay_match(&mut t, 0, &mut rng), Err(TournamentError::AlreadyEnded));

    let c = credits(&t, &CreditsConfig::default(), |_| None).unwrap();
    assert!(c.executive.is_none());
    assert_eq!(c.players.len(), 3 + t.runnerups.len());
    assert_eq!(c.players[0].id, t.winners[0].person.id);
    assert_eq!(c.archers_harmed, t.archers_harmed());
}

#[test]
fn autoplay_refuses_an_empty_match() {
    let mut rng = StdRng::seed_from_u64(14);
    let mut t = started(8, &mut rng);
    assert_eq!(autoplay_match(&mut t, 2, &mut rng), Err(TournamentError::EmptyMatch(2)));
}

#[test]
fn credits_wait_for_the_end() {
    let t = started(8, &mut StdRng::seed_from_u64(15));
    assert_eq!(
        credits(&t, &CreditsConfig::default(), |_| None).unwrap_err(),
        TournamentError::NotEnded
    );
}
