//! Input validation for the two strings the outside world hands us:
//! player names and room codes.

use thiserror::Error;

/// Maximum player-name length in characters.
pub const NAME_MAX: usize = 24;

/// Length of a room code.
pub const CODE_LEN: usize = 5;

/// Room-code alphabet. Uppercase, with the easily-confused characters
/// (0/O, 1/I/L) removed so codes survive being read aloud.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Player-name validation errors with user-facing messages.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("Name cannot be empty")]
    Empty,

    #[error("Name is too long (maximum {max} characters)")]
    TooLong { max: usize },

    #[error("Name contains control characters")]
    ControlCharacters,
}

/// Room-code validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeError {
    #[error("Room code must be exactly {expected} characters")]
    BadLength { expected: usize },

    #[error("Room code contains characters outside the code alphabet")]
    BadCharacters,
}

/// Validate and normalize a player name: surrounding whitespace is
/// trimmed, the result must be non-empty, at most [`NAME_MAX`] characters
/// and free of control characters.
pub fn validate_player_name(name: &str) -> Result<String, NameError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(NameError::Empty);
    }
    if trimmed.chars().count() > NAME_MAX {
        return Err(NameError::TooLong { max: NAME_MAX });
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(NameError::ControlCharacters);
    }
    Ok(trimmed.to_string())
}

/// Validate a room code. Codes are used verbatim as file stems in the
/// room store, so the fixed alphabet doubles as path-traversal
/// protection.
pub fn validate_room_code(code: &str) -> Result<(), CodeError> {
    if code.len() != CODE_LEN {
        return Err(CodeError::BadLength { expected: CODE_LEN });
    }
    if !code
        .bytes()
        .all(|b| CODE_ALPHABET.contains(&b))
    {
        return Err(CodeError::BadCharacters);
    }
    Ok(())
}
