//! Presentation snapshot: the plain-data view a rendering layer consumes.
//!
//! The snapshot is the only contract with presentation — no markup, no
//! layout. Multiplayer identity tokens are deliberately absent: players
//! are exposed by seat index and name only, so a polling client can never
//! scrape another player's token from the shared state.

use serde::Serialize;

use super::cards::Card;
use super::session::{Mode, Session};

/// One visible seat.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub name: String,
    pub position: u32,
    pub color: String,
    pub card: Option<Card>,
    pub is_bot: bool,
}

/// The outstanding decision, if any, as the renderer needs it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingView {
    pub player: String,
    pub player_index: usize,
    pub from: u32,
    pub to: u32,
}

/// Complete render-agnostic game state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub mode: Mode,
    pub players: Vec<PlayerView>,
    pub turn: usize,
    pub last_roll: Option<u32>,
    pub last_player: Option<usize>,
    pub message: String,
    pub history: Vec<String>,
    pub move_count: u64,
    pub rolls_in_turn: u32,
    pub max_players: usize,
    /// Magic cells that still glow (free or held).
    pub active_tiles: Vec<u32>,
    pub pending: Option<PendingView>,
    pub winner: Option<String>,
    pub won: bool,
    pub version: u64,
}

impl Snapshot {
    pub fn of(session: &Session) -> Snapshot {
        let pending = session.pending.as_ref().and_then(|p| {
            let index = session.player_index_by_id(&p.player)?;
            Some(PendingView {
                player: session.players[index].name.clone(),
                player_index: index,
                from: p.from,
                to: p.to,
            })
        });
        Snapshot {
            mode: session.mode,
            players: session
                .players
                .iter()
                .map(|p| PlayerView {
                    name: p.name.clone(),
                    position: p.position,
                    color: p.color.clone(),
                    card: p.card,
                    is_bot: p.is_bot,
                })
                .collect(),
            turn: session.turn,
            last_roll: session.last_roll,
            last_player: session.last_player,
            message: session.message.clone(),
            history: session.history.clone(),
            move_count: session.move_count,
            rolls_in_turn: session.rolls_in_turn,
            max_players: session.max_players,
            active_tiles: session.magic_tiles.active_cells(),
            pending,
            winner: session.winner_name().map(str::to_string),
            won: session.finished(),
            version: session.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_never_exposes_identity_tokens() {
        let mut room = Session::new_room(4);
        let token = room.join("Ala".into());
        room.join("Bartek".into());
        let snapshot = Snapshot::of(&room);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(!json.contains(&token), "token leaked into snapshot");
        assert_eq!(snapshot.players[0].name, "Ala");
    }

    #[test]
    fn snapshot_reports_winner_by_name() {
        let mut session = Session::new_hotseat(vec!["A".into(), "B".into()]);
        session.players[1].position = 100;
        session.winner = Some("p1".into());
        let snapshot = Snapshot::of(&session);
        assert!(snapshot.won);
        assert_eq!(snapshot.winner.as_deref(), Some("B"));
    }

    #[test]
    fn snapshot_lists_glowing_tiles() {
        let session = Session::new_hotseat(vec!["A".into(), "B".into()]);
        let snapshot = Snapshot::of(&session);
        assert_eq!(snapshot.active_tiles, vec![5, 12, 22, 33, 47, 58, 71, 85]);
    }
}
