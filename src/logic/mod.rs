//! Ladder business logic: accounts, match recording, rating math.

mod accounts;
mod ledger;
pub mod rating;

pub use accounts::{
    deactivate_player, find_player, leaderboard, list_players, register_player, update_profile,
    ProfileUpdate, RegisterPlayer,
};
pub use ledger::{
    compute_player_stats, create_match, find_match_by_id, list_all_matches, list_matches_for_player,
    list_recent_matches, MatchRequest,
};
pub use rating::{compute_rating_change, DEFAULT_K_FACTOR, DEFAULT_RATING};
