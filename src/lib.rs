// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! GymSync agent: offline-capable caching proxy and progression engine for
//! a fitness-tracking web product.
//!
//! Intercepted GET traffic is served through route-classified cache
//! strategies; mutations made while offline are journaled and replayed on
//! connectivity-restored triggers; the progression engine derives points,
//! levels, streaks and achievement unlocks from user activity.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod queue;
pub mod routes;
pub mod services;

use std::sync::Arc;

use cache::{CacheAgent, ControlReply};
use config::Config;
use error::Result;
use models::{ControlMessage, Notification};
use queue::{DrainReport, OfflineQueue};
use services::{NotificationDispatcher, SyncDispatcher, UpstreamClient};

/// Shared application state.
pub struct AgentState {
    pub config: Config,
    pub agent: CacheAgent,
    pub queue: Arc<OfflineQueue>,
    pub upstream: UpstreamClient,
    pub sync: SyncDispatcher,
    pub notifier: NotificationDispatcher,
}

/// Events the agent reacts to, routed through one explicit dispatch table
/// instead of implicitly registered listeners.
///
/// Fetch interception is the hot path and has its own entry point
/// (`CacheAgent::handle_fetch`), since it carries a per-request fetch
/// closure.
#[derive(Debug)]
pub enum AgentEvent {
    /// Pre-populate the static store for this generation.
    Install,
    /// Take control and purge superseded generations.
    Activate,
    /// Connectivity restored for one resource family.
    Sync { tag: String },
    /// A push trigger arrived; issue the workout reminder.
    Push,
    /// Raw control-channel message from a foreground context.
    Message(serde_json::Value),
}

/// Outcome of dispatching an [`AgentEvent`].
#[derive(Debug)]
pub enum AgentReply {
    Ack,
    Control(ControlReply),
    /// `None` when the sync tag was unknown and ignored.
    Drain(Option<DrainReport>),
    Notification(Notification),
    /// The message was unintelligible and ignored, per the control-channel
    /// contract.
    Ignored,
}

impl AgentState {
    /// Single event-loop entry point: route an event to its handler.
    pub async fn dispatch(&self, event: AgentEvent) -> Result<AgentReply> {
        match event {
            AgentEvent::Install => {
                let upstream = self.upstream.clone();
                self.agent
                    .install(move |path| {
                        let upstream = upstream.clone();
                        async move { upstream.get(&path).await }
                    })
                    .await?;
                Ok(AgentReply::Ack)
            }
            AgentEvent::Activate => {
                self.agent.activate();
                Ok(AgentReply::Ack)
            }
            AgentEvent::Sync { tag } => Ok(AgentReply::Drain(self.sync.handle_sync(&tag).await?)),
            AgentEvent::Push => Ok(AgentReply::Notification(self.notifier.push_reminder())),
            AgentEvent::Message(raw) => match serde_json::from_value::<ControlMessage>(raw) {
                Ok(message) => Ok(AgentReply::Control(self.agent.handle_message(message).await?)),
                Err(err) => {
                    tracing::warn!(error = %err, "Ignoring unknown control message");
                    Ok(AgentReply::Ignored)
                }
            },
        }
    }
}
