//! End-to-end checks of single-roll resolution against the rule set:
//! plain moves, snakes, shields, overshoots and wins.

use rand::rngs::StdRng;
use rand::SeedableRng;

use wezyk::game::board;
use wezyk::game::engine::{apply_roll, resolve_decision, ActionError, Decision};
use wezyk::game::{Card, Session};

fn fresh_game() -> Session {
    Session::new_hotseat(vec!["Gracz 1".into(), "Gracz 2".into()])
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(1)
}

#[test]
fn scenario_first_move() {
    let mut session = fresh_game();
    let outcome = apply_roll(&mut session, 0, 3, &mut rng()).unwrap();
    assert_eq!(session.players[0].position, 3);
    assert!(outcome.message.contains("Ruch: 0 -> 3"));
    assert!(!outcome.won);
    assert_eq!(session.turn, 1);
    assert_eq!(session.last_roll, Some(3));
}

#[test]
fn scenario_snake_applies_without_shield() {
    let mut session = fresh_game();
    session.players[0].position = 13;
    let outcome = apply_roll(&mut session, 0, 3, &mut rng()).unwrap();
    assert_eq!(session.players[0].position, 7);
    assert!(outcome.message.contains("Wąż! 16 -> 7"));
    assert_eq!(session.turn, 1);
}

#[test]
fn scenario_shield_raises_pending_decision() {
    let mut session = fresh_game();
    session.players[0].position = 55;
    session.players[0].card = Some(Card::Shield);
    let outcome = apply_roll(&mut session, 0, 4, &mut rng()).unwrap();
    assert!(outcome.pending);
    let pending = session.pending.as_ref().expect("pending decision");
    assert_eq!(pending.from, 59);
    assert_eq!(pending.to, 17);
    assert_eq!(pending.player, "p0");
    // Position holds, the card is not consumed yet, the turn is frozen.
    assert_eq!(session.players[0].position, 59);
    assert_eq!(session.players[0].card, Some(Card::Shield));
    assert_eq!(session.turn, 0);
    assert!(!outcome.bonus);
}

#[test]
fn scenario_hold_spends_shield_and_rotates() {
    let mut session = fresh_game();
    session.players[0].position = 55;
    session.players[0].card = Some(Card::Shield);
    apply_roll(&mut session, 0, 4, &mut rng()).unwrap();

    let outcome = resolve_decision(&mut session, 0, Decision::Hold).unwrap();
    assert_eq!(session.players[0].position, 59);
    assert_eq!(session.players[0].card, None);
    assert!(session.pending.is_none());
    assert!(!outcome.bonus, "the triggering roll was a 4");
    assert_eq!(session.turn, 1);
}

#[test]
fn scenario_overshoot_is_rejected_but_consumes_the_turn() {
    let mut session = fresh_game();
    session.players[0].position = 97;
    let outcome = apply_roll(&mut session, 0, 5, &mut rng()).unwrap();
    assert_eq!(session.players[0].position, 97);
    assert!(outcome.message.contains("Musisz trafić dokładnie"));
    assert!(!outcome.won);
    assert_eq!(session.turn, 1, "a failed roll still rotates the turn");
}

#[test]
fn scenario_overshoot_on_a_six_still_earns_the_bonus() {
    let mut session = fresh_game();
    session.players[0].position = 97;
    let outcome = apply_roll(&mut session, 0, 6, &mut rng()).unwrap();
    assert_eq!(session.players[0].position, 97);
    assert!(outcome.bonus);
    assert_eq!(session.turn, 0);
}

#[test]
fn scenario_exact_landing_wins_and_closes_the_game() {
    let mut session = fresh_game();
    session.players[0].position = 94;
    let outcome = apply_roll(&mut session, 0, 6, &mut rng()).unwrap();
    assert!(outcome.won);
    assert!(!outcome.bonus, "a winning six grants no bonus");
    assert!(outcome.message.contains("Meta! Wygrał(a): Gracz 1"));
    assert_eq!(session.winner.as_deref(), Some("p0"));
    assert_eq!(session.turn, 0, "no rotation after the win");
    assert_eq!(
        apply_roll(&mut session, 1, 2, &mut rng()),
        Err(ActionError::GameFinished)
    );
}

#[test]
fn winning_via_ladder_to_100_counts() {
    let mut session = fresh_game();
    session.players[0].position = 75;
    let outcome = apply_roll(&mut session, 0, 4, &mut rng()).unwrap();
    assert!(outcome.won, "79 is a ladder straight to the finish");
    assert!(outcome.message.contains("Drabina! 79 -> 100"));
    assert!(session.finished());
}

#[test]
fn every_resolved_position_matches_the_board() {
    // For all positions and rolls: the token ends on the start cell
    // (overshoot) or on resolve_landing(start + roll) - never elsewhere.
    for start in 0..=99u32 {
        for roll in 1..=6u32 {
            let mut session = fresh_game();
            session.players[0].position = start;
            apply_roll(&mut session, 0, roll, &mut rng()).unwrap();
            let expected = if start + roll > 100 {
                start
            } else {
                board::resolve_landing(start + roll)
            };
            assert_eq!(
                session.players[0].position, expected,
                "start {} roll {}",
                start, roll
            );
        }
    }
}

#[test]
fn rejected_actions_never_mutate_the_session() {
    let mut session = fresh_game();
    apply_roll(&mut session, 0, 2, &mut rng()).unwrap();
    let before = session.clone();
    for _ in 0..3 {
        assert!(apply_roll(&mut session, 0, 4, &mut rng()).is_err());
        assert!(resolve_decision(&mut session, 1, Decision::Hold).is_err());
        assert_eq!(session, before);
    }
}
