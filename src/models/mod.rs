// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod achievement;
pub mod message;
pub mod mutation;
pub mod snapshot;

pub use achievement::{
    achievement_by_id, AchievementDefinition, Rarity, RequirementType, UnlockRecord,
    UnlockedAchievements, ACHIEVEMENTS,
};
pub use message::{ClientMessage, ControlMessage, Notification, NotificationAction, NotificationData};
pub use mutation::{PendingMutation, ResourceTag};
pub use snapshot::{ActivitySnapshot, UserProgress};
