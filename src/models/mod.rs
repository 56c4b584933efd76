//! Data structures for the game ladder: players, match records, stats.

mod match_record;
mod player;

pub use match_record::{
    CreatedMatch, GameType, MatchDetails, MatchId, MatchRecord, NewMatchRecord, PlayerMatchStats,
    RatingChange, RatingChanges,
};
pub use player::{LeaderboardEntry, Player, PlayerId, PlayerStatus};
