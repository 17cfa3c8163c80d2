//! Configuration management.
//!
//! Everything lives in one TOML file (`config.toml` by default),
//! organized into `[game]`, `[storage]` and `[logging]` sections. Every
//! field has a sensible default, so an empty file is a valid
//! configuration; `validate()` runs on load and catches values the rest
//! of the system would choke on.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::game::session::PALETTE;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Game-session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seats per game; bounded by the color palette.
    #[serde(default = "default_max_players")]
    pub max_players: usize,
    /// Idle minutes before an in-memory hot-seat/bot game is reclaimed.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: i64,
    /// Display name of the bot opponent.
    #[serde(default = "default_bot_name")]
    pub bot_name: String,
}

/// Data persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base directory; room records live in `<data_dir>/rooms/`.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base level when no `-v` flags are given: trace/debug/info/warn/error.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file; stdout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_max_players() -> usize {
    PALETTE.len()
}

fn default_session_ttl() -> i64 {
    60
}

fn default_bot_name() -> String {
    "Bot".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            max_players: default_max_players(),
            session_ttl_minutes: default_session_ttl(),
            bot_name: default_bot_name(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Config {
    /// Load and validate a configuration file.
    pub async fn load(path: &str) -> Result<Config> {
        let raw = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("cannot read config {}: {}", path, e))?;
        let config: Config = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Write a starter configuration with default values.
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let rendered = toml::to_string_pretty(&config)?;
        fs::write(path, rendered).await?;
        Ok(())
    }

    /// Check values the rest of the system relies on.
    pub fn validate(&self) -> Result<()> {
        if self.game.max_players < 2 || self.game.max_players > PALETTE.len() {
            return Err(anyhow!(
                "game.max_players must be between 2 and {}",
                PALETTE.len()
            ));
        }
        if self.game.session_ttl_minutes < 1 {
            return Err(anyhow!("game.session_ttl_minutes must be at least 1"));
        }
        if self.game.bot_name.trim().is_empty() {
            return Err(anyhow!("game.bot_name cannot be empty"));
        }
        if self.storage.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir cannot be empty"));
        }
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(anyhow!("unknown logging.level: {}", other)),
        }
        Ok(())
    }
}
