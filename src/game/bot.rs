//! Bot driver: plays non-human seats through the same public engine
//! operations a human action uses.
//!
//! The policy is deliberately simple. The bot rolls unless its teleport
//! would win or hit a ladder, and it answers shield decisions by the size
//! of the setback: small snakes are taken (keeping the shield), big ones
//! are shrugged off by spending it.

use log::debug;
use rand::Rng;

use super::board;
use super::board::BOARD_END;
use super::cards::{Card, TELEPORT_OFFSET};
use super::engine::{self, Decision, MoveOutcome};
use super::session::Session;

/// Upper bound on engine actions per drive call. A bonus-roll streak is
/// finite in practice; the fuse turns a rules regression into a visible
/// stall instead of a spin.
const MAX_BOT_ACTIONS: usize = 64;

/// Setback size (cells) at which the bot spends the shield to stay put.
const HOLD_THRESHOLD: u32 = 10;

/// Let bots act until the game waits on a human, the game ends, or the
/// fuse trips. Returns the outcomes in play order.
pub fn drive<R: Rng>(session: &mut Session, rng: &mut R) -> Vec<MoveOutcome> {
    let mut outcomes = Vec::new();
    for _ in 0..MAX_BOT_ACTIONS {
        if session.finished() {
            break;
        }
        if let Some(pending) = session.pending.clone() {
            let Some(idx) = session.player_index_by_id(&pending.player) else {
                break;
            };
            if !session.players[idx].is_bot {
                break;
            }
            let choice = if pending.from - pending.to >= HOLD_THRESHOLD {
                Decision::Hold
            } else {
                Decision::Retreat
            };
            match engine::resolve_decision(session, idx, choice) {
                Ok(outcome) => {
                    debug!("bot decision: {}", outcome.message);
                    outcomes.push(outcome);
                }
                Err(_) => break,
            }
            continue;
        }

        let idx = session.turn;
        if !session.players.get(idx).map_or(false, |p| p.is_bot) {
            break;
        }
        if session.players[idx].card == Some(Card::Teleport) {
            let target = session.players[idx].position + TELEPORT_OFFSET;
            if target == BOARD_END || (target < BOARD_END && board::is_ladder(target)) {
                if let Ok(outcome) = engine::use_card(session, idx, rng) {
                    debug!("bot teleport: {}", outcome.message);
                    outcomes.push(outcome);
                    continue;
                }
            }
        }
        match engine::resolve_roll(session, idx, rng) {
            Ok(outcome) => {
                debug!("bot roll: {}", outcome.message);
                outcomes.push(outcome);
            }
            Err(_) => break,
        }
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bot_session() -> Session {
        let mut session = Session::new_bot_game("Gracz".into(), "Bot".into());
        session.advance_turn(); // hand the turn to the bot
        session
    }

    #[test]
    fn drive_stops_on_human_turn() {
        let mut session = bot_session();
        let mut rng = StdRng::seed_from_u64(11);
        let outcomes = drive(&mut session, &mut rng);
        assert!(!outcomes.is_empty());
        assert!(session.finished() || !session.players[session.turn].is_bot);
    }

    #[test]
    fn drive_is_a_no_op_on_human_turn() {
        let mut session = Session::new_bot_game("Gracz".into(), "Bot".into());
        let mut rng = StdRng::seed_from_u64(12);
        assert!(drive(&mut session, &mut rng).is_empty());
        assert_eq!(session.move_count, 0);
    }

    #[test]
    fn bot_teleports_onto_a_ladder() {
        let mut session = bot_session();
        session.players[1].card = Some(Card::Teleport);
        session.players[1].position = 6; // 6 + 3 = 9, ladder to 27
        let mut rng = StdRng::seed_from_u64(13);
        let outcomes = drive(&mut session, &mut rng);
        assert!(outcomes[0].message.contains("Teleport!"));
        assert!(outcomes[0].message.contains("Drabina! 9 -> 27"));
    }

    #[test]
    fn bot_resolves_its_own_shield_decision() {
        let mut session = bot_session();
        session.players[1].card = Some(Card::Shield);
        session.players[1].position = 57; // 57 + 2 = 59, snake to 17
        let mut rng = StdRng::seed_from_u64(14);
        engine::apply_roll(&mut session, 1, 2, &mut rng).unwrap();
        assert!(session.pending.is_some());
        drive(&mut session, &mut rng);
        assert!(session.pending.is_none());
        // 59 -> 17 is a 42-cell setback: the bot holds and spends the card.
        assert_eq!(session.players[1].position, 59);
        assert_eq!(session.players[1].card, None);
    }

    #[test]
    fn bot_retreats_from_a_small_snake() {
        let mut session = bot_session();
        session.players[1].card = Some(Card::Shield);
        session.players[1].position = 12; // 12 + 4 = 16, snake to 7 (9 cells)
        let mut rng = StdRng::seed_from_u64(15);
        engine::apply_roll(&mut session, 1, 4, &mut rng).unwrap();
        assert!(session.pending.is_some());
        drive(&mut session, &mut rng);
        assert_eq!(session.players[1].position, 7);
        assert_eq!(session.players[1].card, Some(Card::Shield));
    }
}
