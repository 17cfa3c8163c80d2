//! Card kinds and the rules constants attached to them.
//!
//! A player holds at most one card at a time. The pool is fixed: the
//! shield defers snake application into a player decision, the teleport
//! moves its holder forward by a fixed offset outside the normal roll.

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

/// Fixed forward offset of the teleport card.
pub const TELEPORT_OFFSET: u32 = 3;

/// The cards a magic tile can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Card {
    /// Defers an automatic snake into a retreat-or-hold decision.
    Shield,
    /// Moves the holder forward by [`TELEPORT_OFFSET`] cells.
    Teleport,
}

impl Card {
    /// The grantable pool. Magic tiles draw uniformly from this.
    pub const POOL: [Card; 2] = [Card::Shield, Card::Teleport];

    /// Draw one card kind uniformly from the pool.
    pub fn draw<R: Rng>(rng: &mut R) -> Card {
        Self::POOL[rng.gen_range(0..Self::POOL.len())]
    }

    /// Player-facing card name.
    pub fn label(self) -> &'static str {
        match self {
            Card::Shield => "Tarcza",
            Card::Teleport => "Teleport +3",
        }
    }
}

/// Lenient decoder for persisted card slots. An unrecognized kind in a
/// stored room record is dropped instead of failing the whole document;
/// multiple tabs may still be polling the room.
pub fn de_card_lenient<'de, D>(deserializer: D) -> Result<Option<Card>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw.as_deref() {
        Some("shield") => Some(Card::Shield),
        Some("teleport") => Some(Card::Teleport),
        _ => None,
    })
}
