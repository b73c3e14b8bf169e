//! User activity snapshots consumed by the progression engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The minimal derived state needed to evaluate progression rules.
///
/// Invariants (maintained by the progression engine, the only writer):
/// - `longest_streak >= current_streak`
/// - `level` is derivable from `points` (cached here for cheap reads)
/// - values never decrease, except `current_streak` resetting on a break
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySnapshot {
    #[serde(default)]
    pub points: u32,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    /// Calendar date of the last qualifying activity, if any.
    #[serde(default)]
    pub last_activity_date: Option<NaiveDate>,
}

fn default_level() -> u32 {
    1
}

impl Default for ActivitySnapshot {
    fn default() -> Self {
        Self {
            points: 0,
            level: 1,
            current_streak: 0,
            longest_streak: 0,
            last_activity_date: None,
        }
    }
}

/// Snapshot plus the activity counters achievement requirements compare
/// against. The snapshot alone cannot answer "how many workouts total".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProgress {
    #[serde(flatten)]
    pub snapshot: ActivitySnapshot,
    #[serde(default)]
    pub workouts_completed: u32,
    /// Kilograms lost since the first progress entry.
    #[serde(default)]
    pub weight_loss_kg: f64,
    /// Consecutive weeks with at least five workout days.
    #[serde(default)]
    pub weekly_consistency: u32,
}
