//! Domain model for the SEO tracking dashboard.
//!
//! # Responsibility
//! - Define canonical records for users, projects and tracking data.
//! - Define read models returned by listing/detail/profile/stats use-cases.
//! - Own input validation shared by every store implementation.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - Timestamps are Unix epoch milliseconds.
//! - A project is owned by exactly one user.

pub mod project;
pub mod tracking;
pub mod user;
pub mod validation;
pub mod views;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in epoch milliseconds.
///
/// Clamps to `0` if the system clock reports a time before the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// One day in epoch milliseconds.
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;
