// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Progression engine: pure functions deriving points, levels, streaks and
//! achievement unlocks from an activity snapshot.
//!
//! Everything here is deterministic and side-effect free; the only inputs
//! are the snapshot and "today". Callers persist the results.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{
    ActivitySnapshot, AchievementDefinition, RequirementType, UnlockedAchievements, UserProgress,
    ACHIEVEMENTS,
};

/// Level boundaries: ascending `(level, min_points)` pairs.
const LEVEL_TABLE: &[(u32, u32)] = &[
    (1, 0),
    (2, 500),
    (3, 1000),
    (4, 2000),
    (5, 3000),
    (6, 4000),
    (7, 5000),
    (8, 6000),
    (9, 7000),
    (10, 8000),
    (15, 12000),
    (20, 20000),
];

/// Highest level whose minimum is within `points`. Monotonic in `points`.
pub fn level_for_points(points: u32) -> u32 {
    LEVEL_TABLE
        .iter()
        .rev()
        .find(|(_, min)| points >= *min)
        .map(|(level, _)| *level)
        .unwrap_or(1)
}

/// Next level above the current one, with the points still needed to reach
/// it. At the table's top the current level is returned with zero needed.
pub fn next_milestone(points: u32) -> (u32, u32) {
    let current = level_for_points(points);
    match LEVEL_TABLE.iter().find(|(level, _)| *level > current) {
        Some((level, min)) => (*level, min.saturating_sub(points)),
        None => (current, 0),
    }
}

/// Base points awarded for a user action. Unknown actions award nothing.
pub fn points_for_action(action: &str) -> u32 {
    match action {
        "complete_workout" => 50,
        "log_meal" => 25,
        "add_progress" => 30,
        "achieve_streak_7" => 100,
        "achieve_streak_30" => 300,
        "first_workout" => 50,
        "weight_milestone" => 200,
        "consistency_bonus" => 150,
        _ => 0,
    }
}

/// Streak bonus multiplier.
pub fn streak_multiplier(streak: u32) -> f64 {
    if streak >= 30 {
        2.0
    } else if streak >= 14 {
        1.5
    } else if streak >= 7 {
        1.25
    } else {
        1.0
    }
}

/// Final awarded points for a base amount, applying the streak multiplier
/// and level bonus: `floor(base × multiplier × (1 + floor(level × 0.1)))`.
///
/// The floor at each step matters: it determines achievement-unlock timing,
/// so the formula is reproduced exactly.
pub fn bonus_points(base_points: u32, snapshot: &ActivitySnapshot) -> u32 {
    let multiplier = streak_multiplier(snapshot.current_streak);
    let level_bonus = (snapshot.level as f64 * 0.1).floor();
    (base_points as f64 * multiplier * (1.0 + level_bonus)).floor() as u32
}

/// Advance the streak for a qualifying activity completed `today`.
///
/// - last activity yesterday: streak continues, +1
/// - last activity today: duplicate same-day completion, unchanged
/// - anything earlier or no prior date: streak resets to 1
///
/// `longest_streak` never decreases.
pub fn advance_streak(snapshot: &ActivitySnapshot, today: NaiveDate) -> ActivitySnapshot {
    let yesterday = today - Duration::days(1);

    let current_streak = match snapshot.last_activity_date {
        Some(last) if last == yesterday => snapshot.current_streak + 1,
        Some(last) if last == today => snapshot.current_streak,
        _ => 1,
    };

    ActivitySnapshot {
        current_streak,
        longest_streak: snapshot.longest_streak.max(current_streak),
        last_activity_date: Some(today),
        ..snapshot.clone()
    }
}

/// Apply a completed qualifying activity to the snapshot: advance the
/// streak, award bonus-adjusted points, and recompute the level.
pub fn apply_activity(
    snapshot: &ActivitySnapshot,
    action: &str,
    today: NaiveDate,
) -> ActivitySnapshot {
    let mut updated = advance_streak(snapshot, today);
    // Multipliers use the streak and level in effect after the streak
    // advance but before the award.
    updated.points += bonus_points(points_for_action(action), &updated);
    updated.level = level_for_points(updated.points);
    updated
}

/// Evaluate the achievement catalog against a user's progress.
///
/// Returns every definition that is satisfied and not already unlocked,
/// recording the unlocks. Idempotent: a second run on an unchanged snapshot
/// unlocks nothing new.
pub fn evaluate_achievements(
    progress: &UserProgress,
    unlocked: &mut UnlockedAchievements,
    now: DateTime<Utc>,
) -> Vec<&'static AchievementDefinition> {
    ACHIEVEMENTS
        .iter()
        .filter(|def| requirement_met(def, progress))
        .filter(|def| unlocked.unlock(def.id, now))
        .collect()
}

fn requirement_met(def: &AchievementDefinition, progress: &UserProgress) -> bool {
    let actual = match def.requirement_type {
        RequirementType::WorkoutsCompleted => progress.workouts_completed as f64,
        RequirementType::CurrentStreak => progress.snapshot.current_streak as f64,
        RequirementType::WeightLoss => progress.weight_loss_kg,
        RequirementType::Level => progress.snapshot.level as f64,
        RequirementType::WeeklyConsistency => progress.weekly_consistency as f64,
    };
    actual >= def.requirement_value
}
