// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pending mutations recorded while the client is disconnected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resource family a queued mutation belongs to.
///
/// Each tag maps to exactly one upstream endpoint and one background sync
/// trigger tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceTag {
    Workout,
    Meal,
    Progress,
}

impl ResourceTag {
    /// Lowercase name used in queue records and sync-success events.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceTag::Workout => "workout",
            ResourceTag::Meal => "meal",
            ResourceTag::Progress => "progress",
        }
    }

    /// Background sync trigger tag for this resource family.
    pub fn sync_tag(&self) -> &'static str {
        match self {
            ResourceTag::Workout => "workout-completion",
            ResourceTag::Meal => "meal-logging",
            ResourceTag::Progress => "progress-entry",
        }
    }

    /// Resolve a sync trigger tag back to its resource family.
    pub fn from_sync_tag(tag: &str) -> Option<Self> {
        match tag {
            "workout-completion" => Some(ResourceTag::Workout),
            "meal-logging" => Some(ResourceTag::Meal),
            "progress-entry" => Some(ResourceTag::Progress),
            _ => None,
        }
    }
}

/// A mutation attempted while disconnected, held until replayed.
///
/// Owned exclusively by the offline queue: deleted after confirmed
/// delivery, and never updated in place except for `attempts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingMutation {
    pub id: Uuid,
    pub resource_tag: ResourceTag,
    /// Serialized request body, replayed verbatim on delivery.
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    /// Delivery attempts so far. Incremented on each failed replay.
    pub attempts: u32,
}

impl PendingMutation {
    pub fn new(resource_tag: ResourceTag, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            resource_tag,
            payload,
            created_at: Utc::now(),
            attempts: 0,
        }
    }
}
