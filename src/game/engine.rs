//! Turn-resolution engine: one action in, one new game state out.
//!
//! Every public operation resolves a single player action — a die roll, a
//! card use, or a pending-decision choice — into a committed session
//! mutation plus a player-facing message. Preconditions are checked
//! before anything is touched, so a rejected action leaves the session
//! bit-for-bit unchanged and can be retried safely. All three game modes
//! run through the same operations; the mode only changes who is allowed
//! to call them and whether the per-turn roll cap applies.

use rand::Rng;
use thiserror::Error;

use super::board::{self, BOARD_END};
use super::cards::{Card, TELEPORT_OFFSET};
use super::session::{Mode, PendingDecision, Session};

/// Number of die faces; rolling the maximum earns the bonus roll.
pub const DIE_SIDES: u32 = 6;

/// Multiplayer-only cap on rolls within one turn. Reaching it ends the
/// turn even on a maximum roll; the counter resets when the turn rotates.
pub const MULTIPLAYER_ROLL_CAP: u32 = 3;

/// Structured rejection of an illegal action. Never fatal; the session is
/// left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("gra jest zakończona")]
    GameFinished,
    #[error("inna decyzja czeka na rozstrzygnięcie")]
    DecisionPending,
    #[error("nie ma takiego gracza")]
    NoSuchPlayer,
    #[error("to nie jest tura tego gracza")]
    NotYourTurn,
    #[error("gracz nie ma karty")]
    NoCard,
    #[error("tej karty nie zagrywa się aktywnie")]
    CardNotPlayable,
    #[error("teleport przekroczyłby metę")]
    MustLandExactly,
    #[error("żadna decyzja nie czeka")]
    NoDecisionPending,
    #[error("decyzja należy do innego gracza")]
    NotYourDecision,
}

/// Choice resolving a shield-vs-snake conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Apply the snake after all; the shield is kept.
    Retreat,
    /// Stay on the landed cell; the shield is spent.
    Hold,
}

/// What one resolved action did, for callers that do not want to diff the
/// session themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Die value, `None` for card and decision actions.
    pub roll: Option<u32>,
    /// The composed player-facing message, also stored on the session.
    pub message: String,
    /// The acting player just won.
    pub won: bool,
    /// The acting player rolls again.
    pub bonus: bool,
    /// A pending decision was raised; play is frozen until it resolves.
    pub pending: bool,
}

fn guard_action(session: &Session, player_index: usize) -> Result<(), ActionError> {
    if session.finished() {
        return Err(ActionError::GameFinished);
    }
    if session.pending.is_some() {
        return Err(ActionError::DecisionPending);
    }
    if player_index >= session.players.len() {
        return Err(ActionError::NoSuchPlayer);
    }
    Ok(())
}

/// Draw a die value and resolve it. See [`apply_roll`] for the rules.
pub fn resolve_roll<R: Rng>(
    session: &mut Session,
    player_index: usize,
    rng: &mut R,
) -> Result<MoveOutcome, ActionError> {
    guard_action(session, player_index)?;
    if player_index != session.turn {
        return Err(ActionError::NotYourTurn);
    }
    let roll = rng.gen_range(1..=DIE_SIDES);
    apply_roll(session, player_index, roll, rng)
}

/// Resolve a single roll with a known die value.
///
/// This is the whole §"one roll" rule set: exact-landing rejection,
/// departure-tile consumption, ladders, snake-vs-shield deferral, win
/// detection, card grant, bonus roll and turn rotation — committed as one
/// step. Public so tests and replays can drive the engine
/// deterministically; `rng` only picks the card kind on a grant.
pub fn apply_roll<R: Rng>(
    session: &mut Session,
    player_index: usize,
    roll: u32,
    rng: &mut R,
) -> Result<MoveOutcome, ActionError> {
    guard_action(session, player_index)?;
    if player_index != session.turn {
        return Err(ActionError::NotYourTurn);
    }
    debug_assert!((1..=DIE_SIDES).contains(&roll));

    session.last_roll = Some(roll);
    session.last_player = Some(player_index);
    session.move_count += 1;
    session.rolls_in_turn += 1;

    let name = session.players[player_index].name.clone();
    let start = session.players[player_index].position;
    let tentative = start + roll;
    let mut parts: Vec<String> = Vec::new();
    let mut won = false;
    let mut raised = false;

    if tentative > BOARD_END {
        // Rejected move: the token stays, but the roll still counts
        // toward bonus and rotation.
        parts.push(format!(
            "{}: wyrzucono {}. Musisz trafić dokładnie!",
            name, roll
        ));
    } else {
        parts.push(format!("{}: wyrzucono {}.", name, roll));
        let held_id = session.players[player_index].id.clone();
        session.magic_tiles.consume_on_departure(start, &held_id);
        if board::resolve_landing(tentative) == tentative {
            parts.push(format!("Ruch: {} -> {}", start, tentative));
        }
        let settled = settle_landing(session, player_index, tentative, roll, &mut parts);
        won = settled.0;
        raised = settled.1;
    }

    let mut bonus = false;
    if !won && !raised {
        if let Some(card) =
            session
                .magic_tiles
                .grant_if_eligible(&mut session.players[player_index], rng)
        {
            parts.push(format!(
                "Magiczne pole! {} dostaje kartę: {}.",
                name,
                card.label()
            ));
        }
        bonus = bonus_earned(session, roll);
        if bonus {
            parts.push("Szóstka! Dodatkowy rzut.".to_string());
        }
    }
    if !won && !raised && !bonus {
        session.advance_turn();
    }

    let message = parts.join(" ");
    session.message = message.clone();
    session.push_history(&message);
    Ok(MoveOutcome {
        roll: Some(roll),
        message,
        won,
        bonus,
        pending: raised,
    })
}

/// Play the held card. Only the teleport is an active card; the shield
/// resolves passively through the pending-decision protocol.
///
/// Card use is a free action: it is open to the card's holder regardless
/// of whose turn it is, never rotates the turn and earns no bonus. An
/// overshooting teleport is rejected outright and the card is kept.
pub fn use_card<R: Rng>(
    session: &mut Session,
    player_index: usize,
    rng: &mut R,
) -> Result<MoveOutcome, ActionError> {
    guard_action(session, player_index)?;
    let card = session.players[player_index]
        .card
        .ok_or(ActionError::NoCard)?;
    if card == Card::Shield {
        return Err(ActionError::CardNotPlayable);
    }
    let start = session.players[player_index].position;
    let tentative = start + TELEPORT_OFFSET;
    if tentative > BOARD_END {
        return Err(ActionError::MustLandExactly);
    }

    session.players[player_index].card = None;
    session.last_player = Some(player_index);
    session.move_count += 1;

    let name = session.players[player_index].name.clone();
    let held_id = session.players[player_index].id.clone();
    session.magic_tiles.consume_on_departure(start, &held_id);

    let mut parts = vec![format!("Teleport! {}: {} -> {}.", name, start, tentative)];
    let trigger_roll = session.last_roll.unwrap_or(0);
    let (won, raised) = settle_landing(session, player_index, tentative, trigger_roll, &mut parts);
    if !won && !raised {
        if let Some(card) =
            session
                .magic_tiles
                .grant_if_eligible(&mut session.players[player_index], rng)
        {
            parts.push(format!(
                "Magiczne pole! {} dostaje kartę: {}.",
                name,
                card.label()
            ));
        }
    }

    let message = parts.join(" ");
    session.message = message.clone();
    session.push_history(&message);
    Ok(MoveOutcome {
        roll: None,
        message,
        won,
        bonus: false,
        pending: raised,
    })
}

/// Submit the choice resolving an outstanding pending decision.
///
/// A discrete move event: it counts a move, emits a message and rotates
/// the turn using the roll that originally triggered the snake (a 6 still
/// earns its bonus).
pub fn resolve_decision(
    session: &mut Session,
    player_index: usize,
    choice: Decision,
) -> Result<MoveOutcome, ActionError> {
    let pending = session
        .pending
        .clone()
        .ok_or(ActionError::NoDecisionPending)?;
    let player = session
        .players
        .get(player_index)
        .ok_or(ActionError::NoSuchPlayer)?;
    if player.id != pending.player {
        return Err(ActionError::NotYourDecision);
    }

    session.pending = None;
    session.move_count += 1;
    session.last_player = Some(player_index);

    let name = session.players[player_index].name.clone();
    let mut parts = vec![match choice {
        Decision::Retreat => {
            session.players[player_index].position = pending.to;
            format!(
                "{}: Wąż! {} -> {}. Tarcza zostaje.",
                name, pending.from, pending.to
            )
        }
        Decision::Hold => {
            session.players[player_index].card = None;
            format!("{}: zostaje na {}. Tarcza zużyta.", name, pending.from)
        }
    }];

    let bonus = bonus_earned(session, pending.roll);
    if bonus {
        parts.push("Szóstka! Dodatkowy rzut.".to_string());
    } else {
        session.advance_turn();
    }

    let message = parts.join(" ");
    session.message = message.clone();
    session.push_history(&message);
    Ok(MoveOutcome {
        roll: None,
        message,
        won: false,
        bonus,
        pending: false,
    })
}

/// Ladder/snake/win settlement for a committed move onto `tentative`.
/// Returns `(won, pending_raised)`.
fn settle_landing(
    session: &mut Session,
    player_index: usize,
    tentative: u32,
    trigger_roll: u32,
    parts: &mut Vec<String>,
) -> (bool, bool) {
    let after = board::resolve_landing(tentative);
    let name = session.players[player_index].name.clone();
    if after > tentative {
        parts.push(format!("Drabina! {} -> {}", tentative, after));
        session.players[player_index].position = after;
    } else if after < tentative {
        if session.players[player_index].card == Some(Card::Shield) {
            // Shield holders decide before the snake applies; the turn is
            // frozen until they do.
            session.players[player_index].position = tentative;
            session.pending = Some(PendingDecision {
                player: session.players[player_index].id.clone(),
                from: tentative,
                to: after,
                roll: trigger_roll,
            });
            parts.push(format!(
                "Wąż na {}! {} ma Tarczę: cofnij się albo zostań.",
                tentative, name
            ));
            return (false, true);
        }
        parts.push(format!("Wąż! {} -> {}", tentative, after));
        session.players[player_index].position = after;
    } else {
        session.players[player_index].position = tentative;
    }

    if session.players[player_index].position == BOARD_END {
        session.winner = Some(session.players[player_index].id.clone());
        parts.push(format!("Meta! Wygrał(a): {}", name));
        return (true, false);
    }
    (false, false)
}

fn bonus_earned(session: &Session, roll: u32) -> bool {
    if roll != DIE_SIDES {
        return false;
    }
    if session.mode == Mode::Multiplayer && session.rolls_in_turn >= MULTIPLAYER_ROLL_CAP {
        return false;
    }
    true
}
