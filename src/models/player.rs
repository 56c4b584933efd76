//! Player account: identity plus mutable competitive state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::rating::DEFAULT_RATING;

/// Unique identifier for a player (assigned by the store, monotonically increasing).
pub type PlayerId = i64;

/// Account lifecycle. Players are never physically deleted; a deactivated
/// player stays referenced by match history but is excluded from lookups
/// unless a query explicitly opts in.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    #[default]
    Active,
    Deactivated,
}

/// A registered player.
///
/// `rating`, `games_played`, `games_won` and `games_lost` are owned by the
/// match ledger: only recording a match changes them. Profile operations
/// touch identity fields (`username`, `email`, `avatar`) only.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub rating: i32,
    pub games_played: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub status: PlayerStatus,
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Create a fresh player with the default rating and zeroed counters.
    pub fn new(
        id: PlayerId,
        username: impl Into<String>,
        email: impl Into<String>,
        avatar: Option<String>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            avatar,
            rating: DEFAULT_RATING,
            games_played: 0,
            games_won: 0,
            games_lost: 0,
            status: PlayerStatus::Active,
            created_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Apply one match outcome: the new rating is absolute, the counters are
    /// relative increments (games_played stays equal to won + lost).
    pub fn apply_match(&mut self, new_rating: i32, won: bool) {
        self.rating = new_rating;
        self.games_played += 1;
        if won {
            self.games_won += 1;
        } else {
            self.games_lost += 1;
        }
    }
}

/// Public leaderboard projection of a player (no email).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: PlayerId,
    pub username: String,
    pub avatar: Option<String>,
    pub rating: i32,
    pub games_played: u32,
    pub games_won: u32,
    pub games_lost: u32,
}

impl From<&Player> for LeaderboardEntry {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            username: p.username.clone(),
            avatar: p.avatar.clone(),
            rating: p.rating,
            games_played: p.games_played,
            games_won: p.games_won,
            games_lost: p.games_lost,
        }
    }
}
