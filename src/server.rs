//! Game service: the mode-aware facade every caller goes through.
//!
//! Local games (hot-seat and human-vs-bot) live in process memory, keyed
//! by an opaque client key supplied by the caller (whatever its session
//! plumbing hands out) and reclaimed by an idle sweep. Multiplayer rooms
//! are loaded from and saved back to the [`RoomStore`] around every
//! single action; nothing multiplayer is cached across steps.
//!
//! The service is also where mode-specific access rules live: humans may
//! not roll for the bot, and room actions are located by the caller's
//! identity token. The engine itself stays mode-blind.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::{debug, info};
use rand::Rng;
use thiserror::Error;

use crate::config::Config;
use crate::game::engine::{self, ActionError, Decision};
use crate::game::session::{Mode, Session};
use crate::game::snapshot::Snapshot;
use crate::game::{bot, MoveOutcome};
use crate::logutil::escape_log;
use crate::rooms::{RoomError, RoomStore};
use crate::validation::{validate_player_name, NameError};

/// Rejections surfaced to the caller layer. All recoverable; the caller
/// decides how to present them.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no such local game")]
    NoSuchGame,

    #[error("a game needs between 2 and {max} players")]
    BadPlayerCount { max: usize },

    #[error("room is full")]
    RoomFull,

    #[error("room is already finished")]
    RoomFinished,

    #[error("unknown player token")]
    UnknownPlayer,

    #[error("the bot plays its own turns")]
    BotsTurn,

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Room(#[from] RoomError),

    #[error(transparent)]
    Name(#[from] NameError),
}

/// Everything a client needs after creating or joining a room: the room
/// code, their private identity token and the public snapshot.
#[derive(Debug, Clone)]
pub struct RoomTicket {
    pub code: String,
    pub token: String,
    pub player_index: usize,
    pub snapshot: Snapshot,
}

struct LocalGame {
    session: Session,
    last_activity: DateTime<Utc>,
}

impl LocalGame {
    fn new(session: Session) -> Self {
        LocalGame {
            session,
            last_activity: Utc::now(),
        }
    }

    fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    fn is_inactive(&self, timeout_minutes: i64) -> bool {
        Utc::now() - self.last_activity > chrono::Duration::minutes(timeout_minutes)
    }
}

/// The service owning local games and the room store.
pub struct GameService {
    config: Config,
    store: RoomStore,
    local: HashMap<String, LocalGame>,
}

impl GameService {
    pub fn new(config: Config) -> Result<Self, ServiceError> {
        let store = RoomStore::open(Path::new(&config.storage.data_dir).join("rooms"))?;
        Ok(GameService {
            config,
            store,
            local: HashMap::new(),
        })
    }

    /// The underlying room store, for operator tooling.
    pub fn store(&self) -> &RoomStore {
        &self.store
    }

    /// Drop local games idle longer than the configured TTL. Swept
    /// opportunistically on every local access.
    fn sweep_idle(&mut self) {
        let ttl = self.config.game.session_ttl_minutes;
        let before = self.local.len();
        self.local.retain(|_, game| !game.is_inactive(ttl));
        let swept = before - self.local.len();
        if swept > 0 {
            debug!("swept {} idle local game(s)", swept);
        }
    }

    fn local_mut(&mut self, key: &str) -> Result<&mut LocalGame, ServiceError> {
        self.local.get_mut(key).ok_or(ServiceError::NoSuchGame)
    }

    // === Local games (hot-seat and human-vs-bot) ===

    /// Start a fresh hot-seat game under `key`, replacing any previous
    /// game stored there.
    pub fn start_hotseat(
        &mut self,
        key: &str,
        names: Vec<String>,
    ) -> Result<Snapshot, ServiceError> {
        self.sweep_idle();
        let max = self.config.game.max_players;
        if names.len() < 2 || names.len() > max {
            return Err(ServiceError::BadPlayerCount { max });
        }
        let names = names
            .iter()
            .map(|n| validate_player_name(n))
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            "local game {}: hotseat with {} players",
            escape_log(key),
            names.len()
        );
        let session = Session::new_hotseat(names);
        let snapshot = Snapshot::of(&session);
        self.local.insert(key.to_string(), LocalGame::new(session));
        Ok(snapshot)
    }

    /// Start a fresh human-vs-bot game under `key`.
    pub fn start_bot_game(&mut self, key: &str, name: &str) -> Result<Snapshot, ServiceError> {
        self.sweep_idle();
        let name = validate_player_name(name)?;
        info!("local game {}: {} vs bot", escape_log(key), escape_log(&name));
        let session = Session::new_bot_game(name, self.config.game.bot_name.clone());
        let snapshot = Snapshot::of(&session);
        self.local.insert(key.to_string(), LocalGame::new(session));
        Ok(snapshot)
    }

    /// Current state of the local game under `key`.
    pub fn local_snapshot(&mut self, key: &str) -> Result<Snapshot, ServiceError> {
        self.sweep_idle();
        let game = self.local_mut(key)?;
        game.touch();
        Ok(Snapshot::of(&game.session))
    }

    /// Roll for the player whose turn it is. In bot mode the human may
    /// only roll their own seat; afterwards the bot plays itself out.
    pub fn local_roll(&mut self, key: &str) -> Result<Snapshot, ServiceError> {
        self.sweep_idle();
        let game = self.local_mut(key)?;
        game.touch();
        let session = &mut game.session;
        if session.mode == Mode::Bot
            && session
                .players
                .get(session.turn)
                .map_or(false, |p| p.is_bot)
        {
            return Err(ServiceError::BotsTurn);
        }
        let mut rng = rand::thread_rng();
        let turn = session.turn;
        engine::resolve_roll(session, turn, &mut rng)?;
        run_bots(session, &mut rng);
        Ok(Snapshot::of(session))
    }

    /// Play the card held by the player at `player_index`.
    pub fn local_use_card(
        &mut self,
        key: &str,
        player_index: usize,
    ) -> Result<Snapshot, ServiceError> {
        self.sweep_idle();
        let game = self.local_mut(key)?;
        game.touch();
        let session = &mut game.session;
        let mut rng = rand::thread_rng();
        engine::use_card(session, player_index, &mut rng)?;
        run_bots(session, &mut rng);
        Ok(Snapshot::of(session))
    }

    /// Submit the pending decision for the player at `player_index`.
    pub fn local_decide(
        &mut self,
        key: &str,
        player_index: usize,
        choice: Decision,
    ) -> Result<Snapshot, ServiceError> {
        self.sweep_idle();
        let game = self.local_mut(key)?;
        game.touch();
        let session = &mut game.session;
        engine::resolve_decision(session, player_index, choice)?;
        run_bots(session, &mut rand::thread_rng());
        Ok(Snapshot::of(session))
    }

    // === Multiplayer rooms ===

    /// Create a room with `host_name` in seat 0 and persist it.
    pub fn create_room(&mut self, host_name: &str) -> Result<RoomTicket, ServiceError> {
        let name = validate_player_name(host_name)?;
        let mut session = Session::new_room(self.config.game.max_players);
        let token = session.join(name.clone());
        let code = self.store.allocate_code(&mut rand::thread_rng())?;
        let greeting = format!("Pokój utworzony. {} czeka na graczy.", name);
        session.message = greeting.clone();
        session.push_history(&greeting);
        self.store.save(&code, &mut session)?;
        info!("room {} created by {}", code, escape_log(&name));
        Ok(RoomTicket {
            code,
            token,
            player_index: 0,
            snapshot: Snapshot::of(&session),
        })
    }

    /// Join an existing room.
    pub fn join_room(&mut self, code: &str, name: &str) -> Result<RoomTicket, ServiceError> {
        let name = validate_player_name(name)?;
        let mut session = self.store.load(code)?;
        if session.finished() {
            return Err(ServiceError::RoomFinished);
        }
        if session.players.len() >= session.max_players {
            return Err(ServiceError::RoomFull);
        }
        let token = session.join(name.clone());
        let player_index = session.players.len() - 1;
        let notice = format!("Dołącza: {}.", name);
        session.message = notice.clone();
        session.push_history(&notice);
        self.store.save(code, &mut session)?;
        info!("room {}: {} joined", code, escape_log(&name));
        Ok(RoomTicket {
            code: code.to_string(),
            token,
            player_index,
            snapshot: Snapshot::of(&session),
        })
    }

    /// Current public state of a room; reads never bump the version.
    pub fn room_snapshot(&self, code: &str) -> Result<Snapshot, ServiceError> {
        Ok(Snapshot::of(&self.store.load(code)?))
    }

    /// Roll in a room, acting as the player identified by `token`.
    pub fn room_roll(&mut self, code: &str, token: &str) -> Result<Snapshot, ServiceError> {
        self.room_action(code, token, |session, index| {
            engine::resolve_roll(session, index, &mut rand::thread_rng())
        })
    }

    /// Play the held card in a room.
    pub fn room_use_card(&mut self, code: &str, token: &str) -> Result<Snapshot, ServiceError> {
        self.room_action(code, token, |session, index| {
            engine::use_card(session, index, &mut rand::thread_rng())
        })
    }

    /// Submit the pending decision in a room.
    pub fn room_decide(
        &mut self,
        code: &str,
        token: &str,
        choice: Decision,
    ) -> Result<Snapshot, ServiceError> {
        self.room_action(code, token, |session, index| {
            engine::resolve_decision(session, index, choice)
        })
    }

    /// One load → mutate → save step. The engine call is the only
    /// mutation between load and save, so a failed action never writes.
    fn room_action<F>(&mut self, code: &str, token: &str, act: F) -> Result<Snapshot, ServiceError>
    where
        F: FnOnce(&mut Session, usize) -> Result<MoveOutcome, ActionError>,
    {
        let mut session = self.store.load(code)?;
        let index = session
            .player_index_by_id(token)
            .ok_or(ServiceError::UnknownPlayer)?;
        act(&mut session, index)?;
        self.store.save(code, &mut session)?;
        Ok(Snapshot::of(&session))
    }
}

/// Let the bot finish whatever the last action left it to do. No-op for
/// sessions without a bot on turn.
fn run_bots<R: Rng>(session: &mut Session, rng: &mut R) {
    if session.mode == Mode::Bot {
        bot::drive(session, rng);
    }
}
