//! Elo rating calculation.

/// Rating assigned to every newly registered player.
pub const DEFAULT_RATING: i32 = 1000;

/// Default K-factor for rating updates (higher = more volatile).
pub const DEFAULT_K_FACTOR: i32 = 32;

/// Expected score for a player rated `own` against an opponent rated
/// `opponent`. A 400-point gap corresponds to 10:1 odds.
fn expected_score(own: i32, opponent: i32) -> f64 {
    1.0 / (1.0 + 10f64.powf(f64::from(opponent - own) / 400.0))
}

/// Rating deltas for both players after a decisive game (no draws).
///
/// `a_won` says whether the first player won; the winner scores 1, the loser
/// 0. Each delta is `round(k * (actual - expected))` from that player's own
/// perspective, rounded half away from zero (`f64::round`). The two sides
/// are rounded independently; neither is derived from the other.
pub fn compute_rating_change(rating_a: i32, rating_b: i32, a_won: bool, k_factor: i32) -> (i32, i32) {
    let expected_a = expected_score(rating_a, rating_b);
    let expected_b = expected_score(rating_b, rating_a);

    let actual_a = if a_won { 1.0 } else { 0.0 };
    let actual_b = if a_won { 0.0 } else { 1.0 };

    let delta_a = (f64::from(k_factor) * (actual_a - expected_a)).round() as i32;
    let delta_b = (f64::from(k_factor) * (actual_b - expected_b)).round() as i32;

    (delta_a, delta_b)
}
