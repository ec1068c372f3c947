//! Ranking-position aggregation.
//!
//! Two averages coexist:
//! - listing: one latest position per keyword, unranked keywords skipped;
//! - stats: every ranking row inside a trailing window.
//!
//! Both round half-up to one decimal and use `0.0` as the "no data" value;
//! `0` is never a valid search position.

use crate::model::views::KeywordWithRankings;
use crate::model::DAY_MS;

/// Width of the trailing window used by user statistics.
pub const STATS_WINDOW_DAYS: i64 = 30;

/// Rounds half-up to one decimal place (`floor(x * 10 + 0.5) / 10`).
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Arithmetic mean of `positions`, rounded; `0.0` when empty.
pub fn mean_position(positions: impl IntoIterator<Item = u32>) -> f64 {
    let (sum, count) = positions
        .into_iter()
        .fold((0_u64, 0_u64), |(sum, count), position| {
            (sum + u64::from(position), count + 1)
        });
    if count == 0 {
        return 0.0;
    }
    round_to_tenth(sum as f64 / count as f64)
}

/// Mean of each keyword's most recent position.
///
/// Relies on `rankings` being ordered newest first.
pub fn latest_position_average(keywords: &[KeywordWithRankings]) -> f64 {
    mean_position(
        keywords
            .iter()
            .filter_map(KeywordWithRankings::latest)
            .map(|ranking| ranking.position),
    )
}

/// Inclusive lower bound of the stats window ending at `now`.
pub fn stats_window_start(now: i64) -> i64 {
    now - STATS_WINDOW_DAYS * DAY_MS
}
