//! Room store: durable, code-addressed multiplayer sessions.
//!
//! One JSON document per room code under `<root>/`. The store is the
//! single source of truth for multiplayer: handlers load, mutate through
//! the engine and save within one logical step, and every save bumps the
//! record's version stamp so polling clients can detect no-op reads
//! cheaply.
//!
//! Writes go to a temporary file that is renamed over the target, so a
//! concurrent poller never observes a half-written record. There is no
//! cross-step lock: two near-simultaneous actions on the same room are
//! last-writer-wins, an accepted risk for a human-paced game. Advisory
//! file locks only guard the individual read and write while the file is
//! open.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use rand::Rng;
use thiserror::Error;

use crate::game::session::{Mode, Session};
use crate::validation::{self, CODE_ALPHABET, CODE_LEN};

const ALLOCATE_ATTEMPTS: usize = 64;

/// Errors from the room persistence layer.
#[derive(Debug, Error)]
pub enum RoomError {
    /// No record exists for this code.
    #[error("no such room: {0}")]
    NotFound(String),

    /// The code itself is malformed (also covers path-traversal input).
    #[error("invalid room code: {0}")]
    BadCode(String),

    /// The record exists but is not JSON at all.
    #[error("room record is corrupt: {0}")]
    Corrupt(String),

    /// Wrapper around IO errors (directory creation, reads, renames).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapper around record serialization errors.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Unexpected conditions (code space exhausted).
    #[error("internal error: {0}")]
    Internal(String),
}

/// File-backed store for multiplayer rooms.
pub struct RoomStore {
    root: PathBuf,
}

impl RoomStore {
    /// Open (or create) the store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, RoomError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(RoomStore { root })
    }

    fn path_for(&self, code: &str) -> PathBuf {
        self.root.join(format!("{}.json", code))
    }

    /// Whether a record exists for `code`.
    pub fn exists(&self, code: &str) -> bool {
        validation::validate_room_code(code).is_ok() && self.path_for(code).exists()
    }

    /// Pick an unused room code. Uniqueness among live rooms is the only
    /// contract; the randomness is not load-bearing.
    pub fn allocate_code<R: Rng>(&self, rng: &mut R) -> Result<String, RoomError> {
        for _ in 0..ALLOCATE_ATTEMPTS {
            let code: String = (0..CODE_LEN)
                .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
                .collect();
            if !self.path_for(&code).exists() {
                return Ok(code);
            }
        }
        Err(RoomError::Internal("room code space exhausted".to_string()))
    }

    /// Load the session stored under `code`.
    ///
    /// A record that fails strict deserialization is salvaged field by
    /// field rather than rejected: several tabs may still be playing the
    /// room, so degrading one field beats taking the room down. Only a
    /// record that is not JSON at all is reported as corrupt.
    pub fn load(&self, code: &str) -> Result<Session, RoomError> {
        validation::validate_room_code(code)
            .map_err(|_| RoomError::BadCode(code.to_string()))?;
        let path = self.path_for(code);
        let mut file = match fs::OpenOptions::new().read(true).open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RoomError::NotFound(code.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let _ = file.lock_shared();
        let mut raw = String::new();
        let read = file.read_to_string(&mut raw);
        let _ = file.unlock();
        read?;

        let mut session = match serde_json::from_str::<Session>(&raw) {
            Ok(session) => session,
            Err(err) => {
                let value: serde_json::Value = serde_json::from_str(&raw)
                    .map_err(|_| RoomError::Corrupt(code.to_string()))?;
                log::warn!(
                    "room {}: record did not parse cleanly ({}), salvaging fields",
                    code,
                    err
                );
                Session::salvage(&value)
            }
        };
        session.mode = Mode::Multiplayer;
        session.normalize();
        Ok(session)
    }

    /// Persist the session under `code`, bumping its version stamp.
    ///
    /// The record is written to a sibling temporary file and renamed over
    /// the target so concurrent pollers only ever read complete records.
    pub fn save(&self, code: &str, session: &mut Session) -> Result<(), RoomError> {
        validation::validate_room_code(code)
            .map_err(|_| RoomError::BadCode(code.to_string()))?;
        session.version += 1;
        let data = serde_json::to_string_pretty(session)?;
        let tmp = self.root.join(format!("{}.json.tmp", code));
        {
            let mut file = fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp)?;
            let _ = file.lock_exclusive();
            let written = file
                .write_all(data.as_bytes())
                .and_then(|_| file.sync_all());
            let _ = file.unlock();
            written?;
        }
        fs::rename(&tmp, self.path_for(code))?;
        log::debug!("room {} saved at version {}", code, session.version);
        Ok(())
    }

    /// Codes of all stored rooms, sorted.
    pub fn list(&self) -> Result<Vec<String>, RoomError> {
        let mut codes = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validation::validate_room_code(stem).is_ok() {
                    codes.push(stem.to_string());
                }
            }
        }
        codes.sort();
        Ok(codes)
    }

    /// Store root, for operator tooling.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn allocated_codes_are_valid_and_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let store = RoomStore::open(dir.path()).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        let code = store.allocate_code(&mut rng).unwrap();
        assert!(validation::validate_room_code(&code).is_ok());
        assert!(!store.exists(&code));
    }

    #[test]
    fn traversal_codes_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = RoomStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.load("../oo"),
            Err(RoomError::BadCode(_))
        ));
    }
}
