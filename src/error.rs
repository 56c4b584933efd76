//! Errors surfaced by ladder operations.

use crate::models::PlayerId;
use crate::store::StoreError;

/// Errors that can occur while recording matches or managing players.
///
/// Validation variants are detected before any storage access; `Storage`
/// means a write unit failed and was fully rolled back (callers may retry).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LadderError {
    /// A match needs two distinct players.
    SelfMatch,
    /// The winner id is neither of the two players.
    WinnerNotInMatch,
    /// No active player with this id.
    PlayerNotFound(PlayerId),
    /// A player with this username already exists (names are unique, case-insensitive).
    DuplicateUsername,
    /// A player with this email already exists.
    DuplicateEmail,
    /// A profile update must change at least one field.
    EmptyProfileUpdate,
    /// The storage unit failed; nothing was written.
    Storage(StoreError),
}

impl std::fmt::Display for LadderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LadderError::SelfMatch => write!(f, "A player cannot play against themselves"),
            LadderError::WinnerNotInMatch => write!(f, "Winner must be one of the two players"),
            LadderError::PlayerNotFound(id) => write!(f, "Player {} not found", id),
            LadderError::DuplicateUsername => write!(f, "A player with this username already exists"),
            LadderError::DuplicateEmail => write!(f, "A player with this email already exists"),
            LadderError::EmptyProfileUpdate => write!(f, "No fields to update"),
            LadderError::Storage(e) => write!(f, "Storage failure: {}", e),
        }
    }
}

impl From<StoreError> for LadderError {
    fn from(e: StoreError) -> Self {
        LadderError::Storage(e)
    }
}
