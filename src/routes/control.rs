// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Control channel between foreground contexts and the agent.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::cache::ControlReply;
use crate::error::Result;
use crate::models::ResourceTag;
use crate::{AgentEvent, AgentReply, AgentState};

pub fn routes() -> Router<Arc<AgentState>> {
    Router::new()
        .route("/agent/message", post(message))
        .route("/agent/sync", post(sync))
        .route("/agent/push", post(push))
        .route("/agent/status", get(status))
}

/// Control-channel messages: `{"type": "...", "data": {...}}`.
///
/// Unknown types are acknowledged and ignored, never an error.
async fn message(
    State(state): State<Arc<AgentState>>,
    Json(raw): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>> {
    let reply = state.dispatch(AgentEvent::Message(raw)).await?;

    let body = match reply {
        AgentReply::Control(ControlReply::Ack) => json!({ "ok": true }),
        AgentReply::Control(ControlReply::Queued { id }) => {
            json!({ "ok": true, "queuedId": id })
        }
        AgentReply::Control(ControlReply::CacheStatus(status)) => json!(status),
        AgentReply::Ignored => json!({ "ok": true, "ignored": true }),
        other => {
            tracing::debug!(?other, "Unexpected reply to control message");
            json!({ "ok": true })
        }
    };
    Ok(Json(body))
}

#[derive(Deserialize)]
struct SyncTrigger {
    tag: String,
}

/// Connectivity-restored trigger for one resource family.
async fn sync(
    State(state): State<Arc<AgentState>>,
    Json(trigger): Json<SyncTrigger>,
) -> Result<Json<serde_json::Value>> {
    let reply = state
        .dispatch(AgentEvent::Sync {
            tag: trigger.tag.clone(),
        })
        .await?;

    let body = match reply {
        AgentReply::Drain(Some(report)) => json!({
            "tag": trigger.tag,
            "delivered": report.delivered,
            "failed": report.failed,
        }),
        _ => json!({ "tag": trigger.tag, "ignored": true }),
    };
    Ok(Json(body))
}

/// Push trigger: dispatch the workout reminder.
async fn push(State(state): State<Arc<AgentState>>) -> Result<Json<serde_json::Value>> {
    match state.dispatch(AgentEvent::Push).await? {
        AgentReply::Notification(notification) => Ok(Json(serde_json::to_value(notification)?)),
        _ => Ok(Json(json!({ "ok": true }))),
    }
}

/// Lifecycle state, store entry counts, and pending mutation counts.
async fn status(State(state): State<Arc<AgentState>>) -> Result<Json<serde_json::Value>> {
    let mut pending = serde_json::Map::new();
    for tag in [ResourceTag::Workout, ResourceTag::Meal, ResourceTag::Progress] {
        pending.insert(
            tag.as_str().to_string(),
            json!(state.queue.pending(tag).await),
        );
    }

    Ok(Json(json!({
        "state": state.agent.state().as_str(),
        "generation": state.agent.generation(),
        "stores": state.agent.registry().status(),
        "pendingMutations": pending,
    })))
}
