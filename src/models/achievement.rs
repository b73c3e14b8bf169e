// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Achievement reference data and per-user unlock records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which field of a user's progress an achievement requirement compares
/// against. All comparators are `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementType {
    WorkoutsCompleted,
    CurrentStreak,
    WeightLoss,
    Level,
    WeeklyConsistency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Immutable achievement reference data. Only ever serialized out; the
/// catalog itself is compiled in.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub requirement_type: RequirementType,
    pub requirement_value: f64,
    /// Points awarded when unlocked.
    pub points: u32,
    pub rarity: Rarity,
}

/// The shipped achievement catalog.
pub const ACHIEVEMENTS: &[AchievementDefinition] = &[
    AchievementDefinition {
        id: "first-workout",
        name: "First Steps",
        description: "Complete your first workout",
        requirement_type: RequirementType::WorkoutsCompleted,
        requirement_value: 1.0,
        points: 50,
        rarity: Rarity::Common,
    },
    AchievementDefinition {
        id: "streak-7",
        name: "Week Warrior",
        description: "Maintain a 7-day workout streak",
        requirement_type: RequirementType::CurrentStreak,
        requirement_value: 7.0,
        points: 100,
        rarity: Rarity::Rare,
    },
    AchievementDefinition {
        id: "streak-30",
        name: "Month Master",
        description: "Maintain a 30-day workout streak",
        requirement_type: RequirementType::CurrentStreak,
        requirement_value: 30.0,
        points: 300,
        rarity: Rarity::Epic,
    },
    AchievementDefinition {
        id: "weight-loss-5kg",
        name: "First 5KG Lost",
        description: "Lose your first 5 kilograms",
        requirement_type: RequirementType::WeightLoss,
        requirement_value: 5.0,
        points: 200,
        rarity: Rarity::Rare,
    },
    AchievementDefinition {
        id: "consistency-king",
        name: "Consistency King",
        description: "Work out 5 days a week for 4 weeks",
        requirement_type: RequirementType::WeeklyConsistency,
        requirement_value: 4.0,
        points: 250,
        rarity: Rarity::Epic,
    },
    AchievementDefinition {
        id: "level-10",
        name: "Double Digits",
        description: "Reach level 10",
        requirement_type: RequirementType::Level,
        requirement_value: 10.0,
        points: 500,
        rarity: Rarity::Legendary,
    },
];

/// Look up a catalog entry by id.
pub fn achievement_by_id(id: &str) -> Option<&'static AchievementDefinition> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// A single unlock record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockRecord {
    pub user_id: String,
    pub achievement_id: String,
    pub unlocked_at: DateTime<Utc>,
}

/// The set of achievements a user has already unlocked.
///
/// Unlocking is at-most-once per (user, achievement): re-unlocking an
/// already-held achievement is a no-op, not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnlockedAchievements {
    pub user_id: String,
    records: Vec<UnlockRecord>,
}

impl UnlockedAchievements {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            records: Vec::new(),
        }
    }

    pub fn contains(&self, achievement_id: &str) -> bool {
        self.records
            .iter()
            .any(|r| r.achievement_id == achievement_id)
    }

    /// Record an unlock.
    ///
    /// Returns `true` if the achievement was newly unlocked, `false` if the
    /// user already held it (idempotent skip).
    pub fn unlock(&mut self, achievement_id: &str, now: DateTime<Utc>) -> bool {
        if self.contains(achievement_id) {
            return false;
        }
        self.records.push(UnlockRecord {
            user_id: self.user_id.clone(),
            achievement_id: achievement_id.to_string(),
            unlocked_at: now,
        });
        true
    }

    pub fn records(&self) -> &[UnlockRecord] {
        &self.records
    }
}
