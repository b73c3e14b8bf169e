// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end progression flows: multi-day activity sequences driving
//! streaks, levels, and achievement unlocks through the public API.

use chrono::{Duration, NaiveDate, Utc};
use gymsync::models::{ActivitySnapshot, UnlockedAchievements, UserProgress};
use gymsync::services::progression::{
    apply_activity, evaluate_achievements, level_for_points, next_milestone,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_daily_workouts_build_a_streak_and_level_up() {
    let mut snapshot = ActivitySnapshot::default();
    let start = date(2026, 8, 1);

    for day in 0..14 {
        snapshot = apply_activity(&snapshot, "complete_workout", start + Duration::days(day));
    }

    assert_eq!(snapshot.current_streak, 14);
    assert_eq!(snapshot.longest_streak, 14);
    assert_eq!(snapshot.last_activity_date, Some(date(2026, 8, 14)));
    // Points accumulated, and the level always matches them
    assert!(snapshot.points > 0);
    assert_eq!(snapshot.level, level_for_points(snapshot.points));
}

#[test]
fn test_missed_day_resets_streak_but_not_longest() {
    let mut snapshot = ActivitySnapshot::default();

    for day in 1..=5 {
        snapshot = apply_activity(&snapshot, "complete_workout", date(2026, 8, day));
    }
    assert_eq!(snapshot.current_streak, 5);

    // Skip August 6th
    snapshot = apply_activity(&snapshot, "complete_workout", date(2026, 8, 7));

    assert_eq!(snapshot.current_streak, 1);
    assert_eq!(snapshot.longest_streak, 5);
}

#[test]
fn test_same_day_repeat_does_not_inflate_streak() {
    let mut snapshot = ActivitySnapshot::default();
    let today = date(2026, 8, 27);

    snapshot = apply_activity(&snapshot, "complete_workout", today);
    let streak_after_first = snapshot.current_streak;
    snapshot = apply_activity(&snapshot, "log_meal", today);

    assert_eq!(snapshot.current_streak, streak_after_first);
    assert_eq!(snapshot.longest_streak, streak_after_first);
}

#[test]
fn test_points_never_decrease_over_any_sequence() {
    let mut snapshot = ActivitySnapshot::default();
    let start = date(2026, 1, 1);
    // Irregular gaps between activities
    let offsets = [0, 1, 2, 5, 6, 7, 8, 20, 21, 40];

    let mut last_points = 0;
    let mut last_longest = 0;
    for (i, offset) in offsets.iter().enumerate() {
        let action = if i % 2 == 0 {
            "complete_workout"
        } else {
            "add_progress"
        };
        snapshot = apply_activity(&snapshot, action, start + Duration::days(*offset));

        assert!(snapshot.points > last_points);
        assert!(snapshot.longest_streak >= last_longest);
        last_points = snapshot.points;
        last_longest = snapshot.longest_streak;
    }
}

#[test]
fn test_next_milestone_tracks_level_progression() {
    let snapshot = ActivitySnapshot {
        points: 750,
        level: level_for_points(750),
        ..ActivitySnapshot::default()
    };

    assert_eq!(snapshot.level, 2);
    let (next_level, remaining) = next_milestone(snapshot.points);
    assert_eq!(next_level, 3);
    assert_eq!(remaining, 250);
}

#[test]
fn test_first_workout_unlocks_exactly_once() {
    let mut unlocked = UnlockedAchievements::new("user-1");
    let progress = UserProgress {
        snapshot: apply_activity(
            &ActivitySnapshot::default(),
            "complete_workout",
            date(2026, 8, 27),
        ),
        workouts_completed: 1,
        weight_loss_kg: 0.0,
        weekly_consistency: 0,
    };

    let first = evaluate_achievements(&progress, &mut unlocked, Utc::now());
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].id, "first-workout");

    // Unchanged progress unlocks nothing new
    let second = evaluate_achievements(&progress, &mut unlocked, Utc::now());
    assert!(second.is_empty());
    assert_eq!(unlocked.records().len(), 1);
}

#[test]
fn test_week_of_workouts_earns_streak_achievement() {
    let mut snapshot = ActivitySnapshot::default();
    for day in 1..=7 {
        snapshot = apply_activity(&snapshot, "complete_workout", date(2026, 8, day));
    }

    let progress = UserProgress {
        snapshot,
        workouts_completed: 7,
        weight_loss_kg: 0.0,
        weekly_consistency: 1,
    };
    let mut unlocked = UnlockedAchievements::new("user-1");
    let earned = evaluate_achievements(&progress, &mut unlocked, Utc::now());

    let ids: Vec<&str> = earned.iter().map(|def| def.id).collect();
    assert!(ids.contains(&"first-workout"));
    assert!(ids.contains(&"streak-7"));
    assert!(!ids.contains(&"streak-30"));
}

#[test]
fn test_weight_loss_and_consistency_requirements() {
    let progress = UserProgress {
        snapshot: ActivitySnapshot::default(),
        workouts_completed: 0,
        weight_loss_kg: 5.5,
        weekly_consistency: 4,
    };
    let mut unlocked = UnlockedAchievements::new("user-2");
    let earned = evaluate_achievements(&progress, &mut unlocked, Utc::now());

    let ids: Vec<&str> = earned.iter().map(|def| def.id).collect();
    assert!(ids.contains(&"weight-loss-5kg"));
    assert!(ids.contains(&"consistency-king"));
    assert!(!ids.contains(&"first-workout"));
}
