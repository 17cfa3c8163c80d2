//! # Wezyk - asynchronous snakes and ladders
//!
//! Wezyk is a turn-based board-race game engine with three play modes
//! behind one rule set: single-device hot-seat, human-vs-bot, and
//! asynchronous multiplayer across file-backed rooms addressed by short
//! codes.
//!
//! ## Features
//!
//! - **One Turn Engine**: every mode resolves rolls, cards and decisions
//!   through the same operations; modes differ only in who may call them
//!   and where the session lives.
//! - **Magic Tiles**: fixed cells grant single-use cards (a snake-shield
//!   and a +3 teleport) with a strict grant-once, consume-on-departure
//!   economy.
//! - **Pending Decisions**: a shield holder landing on a snake freezes
//!   the game until they choose to retreat or hold; the protocol is an
//!   explicit state machine, not scattered flags.
//! - **Durable Rooms**: multiplayer sessions are versioned JSON records
//!   written atomically (temp file + rename), safe for concurrent
//!   pollers.
//! - **Bot Driver**: the bot plays through the same public operations a
//!   human action uses; no private shortcuts.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wezyk::config::Config;
//! use wezyk::server::GameService;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let mut service = GameService::new(config)?;
//!
//!     let ticket = service.create_room("Ala")?;
//!     println!("room code: {}", ticket.code);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - board, cards, magic tiles, session, turn engine, bot
//! - [`rooms`] - file-backed room store with version stamps
//! - [`server`] - mode-aware service facade and idle sweep
//! - [`config`] - configuration management and validation
//! - [`validation`] - player-name and room-code hygiene
//! - [`logutil`] - single-line-safe logging helpers

pub mod config;
pub mod game;
pub mod logutil;
pub mod rooms;
pub mod server;
pub mod validation;
