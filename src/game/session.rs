//! Game session: the aggregate every engine operation runs against.
//!
//! A session owns its players, turn pointer, bounded history, magic-tile
//! map, optional pending decision and winner. The same type backs all
//! three modes; hot-seat/bot sessions live in process memory while
//! multiplayer sessions are the persisted room record, serialized with
//! camelCase keys (players, turn, lastRoll, lastPlayer, message, history,
//! moveCount, maxPlayers, winner, magicTiles, pending, rollsInTurn,
//! version).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::board::BOARD_END;
use super::cards::Card;
use super::tiles::MagicTiles;

/// Token colors, assigned by join order. Human players within one session
/// never share a color because the palette is as large as a full room.
pub const PALETTE: [&str; 4] = ["p-red", "p-blue", "p-green", "p-yellow"];

/// Bounded message log length; the oldest entry is dropped first.
pub const HISTORY_LIMIT: usize = 8;

/// How a session is played and persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Hotseat,
    Bot,
    Multiplayer,
}

/// One token on the board.
///
/// In local games ids are positional (`p0`, `p1`, …). In multiplayer the
/// id doubles as the opaque per-room identity token handed to the client
/// on join, so it must never be echoed in presentation snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub position: u32,
    pub color: String,
    #[serde(default, deserialize_with = "super::cards::de_card_lenient")]
    pub card: Option<Card>,
    #[serde(default)]
    pub is_bot: bool,
}

/// The single in-flight choice a player owes the engine.
///
/// Raised when a shield holder lands on a snake; `roll` is the value that
/// triggered it, which still drives bonus/rotation once the decision is
/// submitted. While set, every roll/card action is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingDecision {
    pub player: String,
    pub from: u32,
    pub to: u32,
    #[serde(default)]
    pub roll: u32,
}

/// Full state of one game, in any mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    pub players: Vec<Player>,
    pub turn: usize,
    pub last_roll: Option<u32>,
    pub last_player: Option<usize>,
    pub message: String,
    pub history: Vec<String>,
    pub move_count: u64,
    pub max_players: usize,
    pub winner: Option<String>,
    pub magic_tiles: MagicTiles,
    pub pending: Option<PendingDecision>,
    pub rolls_in_turn: u32,
    pub version: u64,
    pub mode: Mode,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            players: Vec::new(),
            turn: 0,
            last_roll: None,
            last_player: None,
            message: String::new(),
            history: Vec::new(),
            move_count: 0,
            max_players: PALETTE.len(),
            winner: None,
            magic_tiles: MagicTiles::default(),
            pending: None,
            rolls_in_turn: 0,
            version: 0,
            mode: Mode::Hotseat,
        }
    }
}

impl Session {
    /// Fresh hot-seat game. Turn order is the order of `names`.
    pub fn new_hotseat(names: Vec<String>) -> Session {
        let mut session = Session::default();
        for (i, name) in names.into_iter().enumerate() {
            session.players.push(Player {
                id: format!("p{}", i),
                name,
                position: 0,
                color: PALETTE[i % PALETTE.len()].to_string(),
                card: None,
                is_bot: false,
            });
        }
        session
    }

    /// Fresh human-vs-bot game; the human moves first.
    pub fn new_bot_game(human: String, bot_name: String) -> Session {
        let mut session = Session::new_hotseat(vec![human, bot_name]);
        session.mode = Mode::Bot;
        session.players[1].is_bot = true;
        session
    }

    /// Empty multiplayer room. Players enter through [`Session::join`].
    pub fn new_room(max_players: usize) -> Session {
        Session {
            mode: Mode::Multiplayer,
            max_players: max_players.clamp(2, PALETTE.len()),
            ..Session::default()
        }
    }

    /// Add a player and return their identity token. The caller checks
    /// room capacity and the finished flag first.
    pub fn join(&mut self, name: String) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.players.push(Player {
            id: token.clone(),
            name,
            position: 0,
            color: PALETTE[self.players.len() % PALETTE.len()].to_string(),
            card: None,
            is_bot: false,
        });
        token
    }

    /// Whether any token has reached the final cell.
    pub fn finished(&self) -> bool {
        self.winner.is_some() || self.players.iter().any(|p| p.position == BOARD_END)
    }

    /// Name of the winning player, if any.
    pub fn winner_name(&self) -> Option<&str> {
        let id = self.winner.as_deref()?;
        self.players
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
    }

    /// Index of the player with identity `id`.
    pub fn player_index_by_id(&self, id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    /// Rotate the turn pointer and reset the per-turn roll counter.
    pub fn advance_turn(&mut self) {
        if self.players.is_empty() {
            return;
        }
        self.turn = (self.turn + 1) % self.players.len();
        self.rolls_in_turn = 0;
    }

    /// Append to the bounded history, dropping the oldest entries.
    pub fn push_history(&mut self, message: &str) {
        self.history.push(message.to_string());
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }

    /// Clamp loaded state back into range. Applied to every record read
    /// from disk so a mangled field degrades one value instead of the
    /// whole room.
    pub fn normalize(&mut self) {
        self.magic_tiles.ensure_cells();
        if self.turn >= self.players.len() {
            self.turn = 0;
        }
        if let Some(idx) = self.last_player {
            if idx >= self.players.len() {
                self.last_player = None;
            }
        }
        for player in &mut self.players {
            if player.position > BOARD_END {
                player.position = BOARD_END;
            }
        }
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
        if self.max_players < 2 || self.max_players > PALETTE.len() {
            self.max_players = PALETTE.len();
        }
        if let Some(pending) = &self.pending {
            if self.player_index_by_id(&pending.player).is_none() {
                self.pending = None;
            }
        }
        if let Some(id) = &self.winner {
            if self.player_index_by_id(id).is_none() {
                self.winner = None;
            }
        }
    }

    /// Field-by-field recovery of a room record that failed strict
    /// deserialization. Each unreadable field falls back to a sane
    /// default; readable fields are kept.
    pub fn salvage(value: &serde_json::Value) -> Session {
        let mut session = Session::default();
        let Some(doc) = value.as_object() else {
            return session;
        };

        if let Some(players) = doc.get("players").and_then(|v| v.as_array()) {
            session.players = players
                .iter()
                .filter_map(|p| serde_json::from_value(p.clone()).ok())
                .collect();
        }
        session.turn = doc.get("turn").and_then(|v| v.as_u64()).unwrap_or(0) as usize;
        session.last_roll = doc
            .get("lastRoll")
            .and_then(|v| v.as_u64())
            .map(|r| r as u32);
        session.last_player = doc
            .get("lastPlayer")
            .and_then(|v| v.as_u64())
            .map(|i| i as usize);
        if let Some(message) = doc.get("message").and_then(|v| v.as_str()) {
            session.message = message.to_string();
        }
        if let Some(history) = doc.get("history").and_then(|v| v.as_array()) {
            session.history = history
                .iter()
                .filter_map(|m| m.as_str().map(str::to_string))
                .collect();
        }
        session.move_count = doc.get("moveCount").and_then(|v| v.as_u64()).unwrap_or(0);
        session.max_players = doc
            .get("maxPlayers")
            .and_then(|v| v.as_u64())
            .unwrap_or(PALETTE.len() as u64) as usize;
        session.winner = doc
            .get("winner")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        if let Some(tiles) = doc.get("magicTiles") {
            session.magic_tiles =
                serde_json::from_value(tiles.clone()).unwrap_or_default();
        }
        if let Some(pending) = doc.get("pending") {
            session.pending = serde_json::from_value(pending.clone()).ok();
        }
        session.rolls_in_turn = doc
            .get("rollsInTurn")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32;
        session.version = doc.get("version").and_then(|v| v.as_u64()).unwrap_or(0);
        session.mode = Mode::Multiplayer;
        session.normalize();
        session
    }
}
