//! Match ledger: records matches and keeps player ratings consistent.
//!
//! Recording a match writes one match row and two player rows in a single
//! store transaction. The ledger is the only writer of `rating`,
//! `games_played`, `games_won` and `games_lost`.

use serde::Deserialize;

use crate::error::LadderError;
use crate::logic::rating::{compute_rating_change, DEFAULT_K_FACTOR};
use crate::models::{
    CreatedMatch, GameType, MatchDetails, MatchId, MatchRecord, NewMatchRecord, PlayerId,
    PlayerMatchStats, RatingChange, RatingChanges,
};
use crate::store::{Store, Tables};

/// Request to record a finished match between two players.
#[derive(Clone, Debug, Deserialize)]
pub struct MatchRequest {
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub winner_id: PlayerId,
    #[serde(default)]
    pub game_type: GameType,
    #[serde(default)]
    pub game_duration: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Record a match: insert the match row and update both player rows as one
/// all-or-nothing unit.
///
/// Input shape is validated first (self-match, winner membership) and both
/// players must resolve to an active row, all before any write. Ratings are
/// read from committed state before the write unit opens; two overlapping
/// matches can therefore both read the same pre-match rating. Counter
/// updates are relative increments and are never lost.
pub fn create_match(store: &Store, req: &MatchRequest) -> Result<CreatedMatch, LadderError> {
    if req.player1_id == req.player2_id {
        return Err(LadderError::SelfMatch);
    }
    if req.winner_id != req.player1_id && req.winner_id != req.player2_id {
        return Err(LadderError::WinnerNotInMatch);
    }

    let (player1_rating, player2_rating) = {
        let tables = store.tables()?;
        let p1 = tables
            .active_player(req.player1_id)
            .ok_or(LadderError::PlayerNotFound(req.player1_id))?;
        let p2 = tables
            .active_player(req.player2_id)
            .ok_or(LadderError::PlayerNotFound(req.player2_id))?;
        (p1.rating, p2.rating)
    };

    let player1_won = req.winner_id == req.player1_id;
    let loser_id = if player1_won { req.player2_id } else { req.player1_id };
    let (player1_change, player2_change) =
        compute_rating_change(player1_rating, player2_rating, player1_won, DEFAULT_K_FACTOR);
    let player1_after = player1_rating + player1_change;
    let player2_after = player2_rating + player2_change;
    let winner_change = if player1_won { player1_change } else { player2_change };

    let match_id = store.transaction(|tx| {
        let id = tx.insert_match(NewMatchRecord {
            player1_id: req.player1_id,
            player2_id: req.player2_id,
            winner_id: req.winner_id,
            loser_id,
            player1_rating_before: player1_rating,
            player2_rating_before: player2_rating,
            player1_rating_after: player1_after,
            player2_rating_after: player2_after,
            rating_change: winner_change.abs(),
            game_type: req.game_type,
            game_duration: req.game_duration,
            notes: req.notes.clone(),
        })?;
        tx.apply_match_result(req.player1_id, player1_after, player1_won)?;
        tx.apply_match_result(req.player2_id, player2_after, !player1_won)?;
        Ok::<_, LadderError>(id)
    })?;

    log::info!(
        "Recorded match {}: {} vs {}, winner {} ({:+}/{:+})",
        match_id,
        req.player1_id,
        req.player2_id,
        req.winner_id,
        player1_change,
        player2_change
    );

    Ok(CreatedMatch {
        match_id,
        rating_changes: RatingChanges {
            player1: RatingChange {
                old_rating: player1_rating,
                new_rating: player1_after,
                change: player1_change,
            },
            player2: RatingChange {
                old_rating: player2_rating,
                new_rating: player2_after,
                change: player2_change,
            },
        },
    })
}

/// Join a match row with player display fields. `None` when a referenced
/// player row is gone (rows are never deleted, so this mirrors an inner
/// join's behavior rather than panicking).
fn join_details(tables: &Tables, record: &MatchRecord) -> Option<MatchDetails> {
    let p1 = tables.player_row(record.player1_id)?;
    let p2 = tables.player_row(record.player2_id)?;
    let winner = tables.player_row(record.winner_id)?;
    Some(MatchDetails {
        record: record.clone(),
        player1_username: p1.username.clone(),
        player1_avatar: p1.avatar.clone(),
        player2_username: p2.username.clone(),
        player2_avatar: p2.avatar.clone(),
        winner_username: winner.username.clone(),
    })
}

/// A match by id, joined with player display fields.
pub fn find_match_by_id(store: &Store, id: MatchId) -> Result<Option<MatchDetails>, LadderError> {
    let tables = store.tables()?;
    Ok(tables
        .matches
        .get(&id)
        .and_then(|record| join_details(&tables, record)))
}

/// Most-recent-first page of matches where the player appears on either side.
///
/// `page` is 1-based (0 is treated as 1); `page_size` is clamped by the API
/// layer, not here.
pub fn list_matches_for_player(
    store: &Store,
    player_id: PlayerId,
    page: u32,
    page_size: u32,
) -> Result<Vec<MatchDetails>, LadderError> {
    let tables = store.tables()?;
    let offset = (page.max(1) - 1) as usize * page_size as usize;
    Ok(tables
        .matches
        .values()
        .rev()
        .filter(|m| m.player1_id == player_id || m.player2_id == player_id)
        .skip(offset)
        .take(page_size as usize)
        .filter_map(|record| join_details(&tables, record))
        .collect())
}

/// Most-recent-first page of all matches.
pub fn list_all_matches(store: &Store, page: u32, page_size: u32) -> Result<Vec<MatchDetails>, LadderError> {
    let tables = store.tables()?;
    let offset = (page.max(1) - 1) as usize * page_size as usize;
    Ok(tables
        .matches
        .values()
        .rev()
        .skip(offset)
        .take(page_size as usize)
        .filter_map(|record| join_details(&tables, record))
        .collect())
}

/// The `limit` most recent matches.
pub fn list_recent_matches(store: &Store, limit: u32) -> Result<Vec<MatchDetails>, LadderError> {
    let tables = store.tables()?;
    Ok(tables
        .matches
        .values()
        .rev()
        .take(limit as usize)
        .filter_map(|record| join_details(&tables, record))
        .collect())
}

/// Aggregate stats for one player, derived from stored `winner_id` values.
///
/// A player with no matches gets the all-zero result; this never errors and
/// never divides by zero.
pub fn compute_player_stats(store: &Store, player_id: PlayerId) -> Result<PlayerMatchStats, LadderError> {
    let tables = store.tables()?;

    let mut total: u32 = 0;
    let mut wins: u32 = 0;
    let mut rating_sum: i64 = 0;
    let mut duration_sum: u64 = 0;
    let mut duration_count: u32 = 0;

    for m in tables.matches.values() {
        let own_rating_after = if m.player1_id == player_id {
            m.player1_rating_after
        } else if m.player2_id == player_id {
            m.player2_rating_after
        } else {
            continue;
        };
        total += 1;
        if m.winner_id == player_id {
            wins += 1;
        }
        rating_sum += i64::from(own_rating_after);
        if let Some(d) = m.game_duration {
            duration_sum += u64::from(d);
            duration_count += 1;
        }
    }

    if total == 0 {
        return Ok(PlayerMatchStats::default());
    }

    let losses = total - wins;
    let win_rate = (f64::from(wins) / f64::from(total) * 10_000.0).round() / 100.0;
    let avg_rating = (rating_sum as f64 / f64::from(total)).round() as i32;
    let avg_game_duration = if duration_count == 0 {
        0
    } else {
        (duration_sum as f64 / f64::from(duration_count)).round() as u32
    };

    Ok(PlayerMatchStats {
        total_matches: total,
        wins,
        losses,
        win_rate,
        avg_rating,
        avg_game_duration,
    })
}
