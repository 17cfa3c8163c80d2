//! # Game Core
//!
//! Everything that makes the game a game: the static board, the card
//! pool, the magic-tile economy, the session aggregate and the turn
//! engine that resolves one action at a time.
//!
//! ## Components
//!
//! - [`board`] - static snake/ladder map and landing resolution
//! - [`cards`] - card kinds and their rule constants
//! - [`tiles`] - magic-tile occupancy and the grant/consume economy
//! - [`session`] - the session aggregate shared by all three modes
//! - [`engine`] - roll, card-use and decision resolution
//! - [`bot`] - drives non-human seats through the public engine ops
//! - [`snapshot`] - plain-data view for presentation layers
//!
//! ## One engine, three modes
//!
//! Hot-seat, human-vs-bot and multiplayer all mutate the same
//! [`session::Session`] through the same [`engine`] operations. The mode
//! decides who may call an operation and where the session lives
//! (process memory vs the room store); it never changes the rules.

pub mod board;
pub mod bot;
pub mod cards;
pub mod engine;
pub mod session;
pub mod snapshot;
pub mod tiles;

pub use cards::Card;
pub use engine::{ActionError, Decision, MoveOutcome};
pub use session::{Mode, PendingDecision, Player, Session};
pub use snapshot::Snapshot;
pub use tiles::{MagicTiles, TileState};
