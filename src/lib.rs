//! Game ladder web app: library with models, store, and match/rating logic.

pub mod error;
pub mod logic;
pub mod models;
pub mod store;

pub use error::LadderError;
pub use logic::{
    compute_player_stats, compute_rating_change, create_match, deactivate_player, find_match_by_id,
    find_player, leaderboard, list_all_matches, list_matches_for_player, list_players,
    list_recent_matches, register_player, update_profile, MatchRequest, ProfileUpdate,
    RegisterPlayer, DEFAULT_K_FACTOR, DEFAULT_RATING,
};
pub use models::{
    CreatedMatch, GameType, LeaderboardEntry, MatchDetails, MatchId, MatchRecord, Player, PlayerId,
    PlayerMatchStats, PlayerStatus, RatingChange, RatingChanges,
};
pub use store::{Store, StoreError};
