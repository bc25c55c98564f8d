//! Integration tests for player scoring and undo.

use elimination_bracket::{Color, Person, Player};
use proptest::prelude::*;

fn player() -> Player {
    Player::new(Person::new("p1", "Paula One", "paula", Color::Pink))
}

fn counters(p: &Player) -> (u32, u32, u32, u32, u32) {
    (p.shots, p.sweeps, p.kills, p.self_kills, p.explosions)
}

#[test]
fn new_player_takes_preferred_color() {
    let p = player();
    assert_eq!(p.preferred_color, Color::Pink);
    assert_eq!(p.color, Color::Pink);
    assert_eq!(p.score(), 0);
}

#[test]
fn score_weights() {
    let mut p = player();
    p.sweeps = 1;
    p.shots = 2;
    p.kills = 3;
    p.self_kills = 4;
    p.explosions = 5;
    assert_eq!(p.score(), 5 + 6 + 6 + 4 + 5);
}

#[test]
fn removes_at_zero_are_noops() {
    let mut p = player();
    p.remove_shot();
    p.remove_sweep();
    p.remove_kill();
    p.remove_self();
    p.remove_explosion();
    assert_eq!(counters(&p), (0, 0, 0, 0, 0));
}

#[test]
fn sweep_is_compound() {
    let mut p = player();
    p.add_sweep();
    assert_eq!(counters(&p), (1, 1, 3, 0, 0));
    p.remove_sweep();
    assert_eq!(counters(&p), (0, 0, 0, 0, 0));
}

#[test]
fn self_kill_costs_a_kill_and_gives_a_shot() {
    let mut p = player();
    p.add_kills(2);
    p.add_self();
    assert_eq!(counters(&p), (1, 0, 1, 1, 0));
    p.remove_self();
    assert_eq!(counters(&p), (0, 0, 2, 0, 0));
}

#[test]
fn explosion_gives_shot_and_kill() {
    let mut p = player();
    p.add_explosion();
    assert_eq!(counters(&p), (1, 0, 1, 0, 1));
    p.remove_explosion();
    assert_eq!(counters(&p), (0, 0, 0, 0, 0));
}

#[test]
fn update_folds_and_counts_matches() {
    let mut total = player();
    let mut m1 = player();
    m1.add_kills(4);
    m1.add_shot();
    let mut m2 = player();
    m2.add_sweep();
    m2.add_self();

    total.update(&m1);
    total.update(&m2);
    assert_eq!(total.matches, 2);
    assert_eq!(total.kills, 4 + 2);
    assert_eq!(total.shots, 1 + 2);
    assert_eq!(total.sweeps, 1);
    assert_eq!(total.self_kills, 1);

    total.reset();
    assert_eq!(counters(&total), (0, 0, 0, 0, 0));
    assert_eq!(total.matches, 0);
}

fn arb_player() -> impl Strategy<Value = Player> {
    (0u32..20, 0u32..5, 0u32..30, 0u32..5, 0u32..5).prop_map(|(sh, sw, k, s, e)| {
        let mut p = player();
        p.shots = sh;
        p.sweeps = sw;
        p.kills = k;
        p.self_kills = s;
        p.explosions = e;
        p
    })
}

proptest! {
    #[test]
    fn score_formula_holds(p in arb_player()) {
        prop_assert_eq!(
            p.score(),
            p.sweeps * 5 + p.shots * 3 + p.kills * 2 + p.self_kills + p.explosions
        );
    }

    #[test]
    fn add_remove_pairs_restore(p in arb_player()) {
        let before = counters(&p);

        let mut q = p.clone();
        q.add_shot();
        q.remove_shot();
        prop_assert_eq!(counters(&q), before);

        let mut q = p.clone();
        q.add_kill();
        q.remove_kill();
        prop_assert_eq!(counters(&q), before);

        let mut q = p.clone();
        q.add_sweep();
        q.remove_sweep();
        prop_assert_eq!(counters(&q), before);

        let mut q = p.clone();
        q.add_explosion();
        q.remove_explosion();
        prop_assert_eq!(counters(&q), before);
    }

    #[test]
    fn self_undo_restores_when_there_was_a_kill(p in arb_player()) {
        prop_assume!(p.kills > 0);
        let before = counters(&p);
        let mut q = p.clone();
        q.add_self();
        q.remove_self();
        prop_assert_eq!(counters(&q), before);
    }
}
