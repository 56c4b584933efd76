//! Match history records and the result payloads built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::player::PlayerId;

/// Unique identifier for a recorded match (assigned by the store).
pub type MatchId = i64;

/// Category of a recorded game.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    #[default]
    Casual,
    Ranked,
    Tournament,
}

/// One recorded match. Immutable once written: a correction is a new match,
/// never an edit.
///
/// Invariant: `player_rating_after = player_rating_before + delta` on each
/// side, with deltas from the rating engine; `rating_change` holds the
/// absolute value of the winner's delta.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub winner_id: PlayerId,
    pub loser_id: PlayerId,
    pub player1_rating_before: i32,
    pub player2_rating_before: i32,
    pub player1_rating_after: i32,
    pub player2_rating_after: i32,
    pub rating_change: i32,
    pub game_type: GameType,
    pub game_duration: Option<u32>,
    pub match_date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Fields of a match record before the store assigns id and timestamp.
#[derive(Clone, Debug)]
pub struct NewMatchRecord {
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub winner_id: PlayerId,
    pub loser_id: PlayerId,
    pub player1_rating_before: i32,
    pub player2_rating_before: i32,
    pub player1_rating_after: i32,
    pub player2_rating_after: i32,
    pub rating_change: i32,
    pub game_type: GameType,
    pub game_duration: Option<u32>,
    pub notes: Option<String>,
}

/// A match joined with the display fields of the involved players.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchDetails {
    #[serde(flatten)]
    pub record: MatchRecord,
    pub player1_username: String,
    pub player1_avatar: Option<String>,
    pub player2_username: String,
    pub player2_avatar: Option<String>,
    pub winner_username: String,
}

/// One player's rating movement from a recorded match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub old_rating: i32,
    pub new_rating: i32,
    /// Signed delta from this player's own perspective.
    pub change: i32,
}

/// Both sides of a recorded match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RatingChanges {
    pub player1: RatingChange,
    pub player2: RatingChange,
}

/// Success payload of recording a match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CreatedMatch {
    pub match_id: MatchId,
    pub rating_changes: RatingChanges,
}

/// Aggregate match statistics for one player, derived from stored records.
///
/// All fields are zero when the player has no matches; computing stats never
/// fails and never divides by zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerMatchStats {
    pub total_matches: u32,
    pub wins: u32,
    pub losses: u32,
    /// Win percentage (0..=100), rounded to two decimals.
    pub win_rate: f64,
    /// Mean of this player's own post-match rating, rounded to an integer.
    pub avg_rating: i32,
    /// Mean of recorded durations, ignoring matches without one.
    pub avg_game_duration: u32,
}
