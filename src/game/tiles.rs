//! Magic-tile registry: per-game occupancy state for the card-granting
//! cells.
//!
//! Each magic cell is in one of three states: free, held by the player it
//! granted a card to (the cell still glows), or used. A held tile turns
//! used exactly once, when its holder departs the cell via a committed
//! move; it never reverts. Persisted as a string-keyed map so the room
//! record stays plain JSON: `null` = free, `"<player-id>"` = held,
//! `"USED"` = used.

use std::collections::HashMap;

use rand::Rng;
use serde::de::Deserializer;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::cards::Card;
use super::session::Player;

/// Cells that grant a card to the first eligible occupant. Disjoint from
/// the snake/ladder sources so a grant never races a reposition.
pub const MAGIC_CELLS: [u32; 8] = [5, 12, 22, 33, 47, 58, 71, 85];

/// Persisted marker for a consumed tile.
pub const USED_MARKER: &str = "USED";

/// Occupancy state of a single magic cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileState {
    Free,
    HeldBy(String),
    Used,
}

/// Mutable per-game map of magic cells to occupancy state.
#[derive(Debug, Clone, PartialEq)]
pub struct MagicTiles {
    cells: HashMap<u32, TileState>,
}

impl Default for MagicTiles {
    fn default() -> Self {
        MagicTiles {
            cells: MAGIC_CELLS.iter().map(|&c| (c, TileState::Free)).collect(),
        }
    }
}

impl MagicTiles {
    /// Occupancy of `cell`, or `None` when the cell is not magic.
    pub fn state(&self, cell: u32) -> Option<&TileState> {
        self.cells.get(&cell)
    }

    /// Whether `cell` is a magic tile that has not been consumed yet
    /// (free or held tiles still glow on the board).
    pub fn is_active(&self, cell: u32) -> bool {
        matches!(
            self.cells.get(&cell),
            Some(TileState::Free) | Some(TileState::HeldBy(_))
        )
    }

    /// Glowing cells, sorted, for presentation snapshots.
    pub fn active_cells(&self) -> Vec<u32> {
        let mut cells: Vec<u32> = self
            .cells
            .iter()
            .filter(|(_, s)| !matches!(s, TileState::Used))
            .map(|(&c, _)| c)
            .collect();
        cells.sort_unstable();
        cells
    }

    /// Grant a card for the tile under `player`, when eligible.
    ///
    /// No-op unless the player's cell is a magic tile, the tile is not
    /// used, the tile is free or already held by this player, and the
    /// player holds no card. A tile held by another player never grants
    /// to someone standing on it transiently.
    pub fn grant_if_eligible<R: Rng>(&mut self, player: &mut Player, rng: &mut R) -> Option<Card> {
        if player.card.is_some() {
            return None;
        }
        match self.cells.get(&player.position) {
            Some(TileState::Free) => {}
            Some(TileState::HeldBy(id)) if *id == player.id => {}
            _ => return None,
        }
        let card = Card::draw(rng);
        player.card = Some(card);
        self.cells
            .insert(player.position, TileState::HeldBy(player.id.clone()));
        Some(card)
    }

    /// Consume the tile at `cell` if it is held by `player_id`.
    ///
    /// Called with the departed cell of a committed move; rejected moves
    /// never reach this point, so tile state survives them.
    pub fn consume_on_departure(&mut self, cell: u32, player_id: &str) {
        if let Some(TileState::HeldBy(id)) = self.cells.get(&cell) {
            if id == player_id {
                self.cells.insert(cell, TileState::Used);
            }
        }
    }

    /// Backfill missing magic cells as free. Used when normalizing a
    /// loaded room record whose tile map was dropped or truncated.
    pub fn ensure_cells(&mut self) {
        for &cell in MAGIC_CELLS.iter() {
            self.cells.entry(cell).or_insert(TileState::Free);
        }
    }
}

impl Serialize for MagicTiles {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut entries: Vec<(&u32, &TileState)> = self.cells.iter().collect();
        entries.sort_by_key(|(&c, _)| c);
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (cell, state) in entries {
            let value: Option<&str> = match state {
                TileState::Free => None,
                TileState::HeldBy(id) => Some(id.as_str()),
                TileState::Used => Some(USED_MARKER),
            };
            map.serialize_entry(&cell.to_string(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MagicTiles {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = HashMap::<String, Option<String>>::deserialize(deserializer)?;
        let mut cells = HashMap::new();
        for (key, value) in raw {
            // Unparseable keys are dropped rather than failing the record.
            let Ok(cell) = key.parse::<u32>() else {
                continue;
            };
            let state = match value {
                None => TileState::Free,
                Some(s) if s == USED_MARKER => TileState::Used,
                Some(id) => TileState::HeldBy(id),
            };
            cells.insert(cell, state);
        }
        Ok(MagicTiles { cells })
    }
}
