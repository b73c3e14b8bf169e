// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync dispatcher: drains the offline queue when connectivity returns.
//!
//! A trigger carries one sync tag per resource family. Every delivered
//! mutation is announced to foreground contexts; failed deliveries stay
//! queued for the next trigger and are never escalated to a fatal error.

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::error::Result;
use crate::models::{ClientMessage, ResourceTag};
use crate::queue::{DrainReport, OfflineQueue};
use crate::services::UpstreamClient;

/// Drains queued mutations per resource tag on connectivity-restored
/// triggers.
pub struct SyncDispatcher {
    queue: Arc<OfflineQueue>,
    upstream: UpstreamClient,
    events: broadcast::Sender<ClientMessage>,
}

impl SyncDispatcher {
    pub fn new(
        queue: Arc<OfflineQueue>,
        upstream: UpstreamClient,
        events: broadcast::Sender<ClientMessage>,
    ) -> Self {
        Self {
            queue,
            upstream,
            events,
        }
    }

    /// Handle a connectivity-restored trigger.
    ///
    /// Unknown tags are logged and ignored. Returns the drain report for
    /// known tags so callers can observe outcomes.
    pub async fn handle_sync(&self, tag: &str) -> Result<Option<DrainReport>> {
        let Some(resource_tag) = ResourceTag::from_sync_tag(tag) else {
            tracing::warn!(tag, "Ignoring unknown sync tag");
            return Ok(None);
        };

        tracing::info!(tag, "Sync triggered");

        let upstream = self.upstream.clone();
        let report = self
            .queue
            .drain(resource_tag, move |mutation| {
                let upstream = upstream.clone();
                async move { upstream.deliver(&mutation).await }
            })
            .await?;

        for id in &report.delivered_ids {
            // Nobody listening is fine; send() only errors when there are
            // no receivers.
            let _ = self.events.send(ClientMessage::SyncSuccess {
                resource: resource_tag.as_str().to_string(),
                id: *id,
            });
        }

        if !report.is_complete_success() {
            tracing::warn!(
                tag,
                failed = report.failed,
                "Some mutations failed to sync and were retained"
            );
        }

        Ok(Some(report))
    }

    /// Subscribe to foreground-bound sync events.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientMessage> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn dispatcher_with_dead_upstream(
        dir: &tempfile::TempDir,
    ) -> (SyncDispatcher, Arc<OfflineQueue>) {
        let queue = Arc::new(
            OfflineQueue::open(dir.path().join("queue.json"), None)
                .await
                .unwrap(),
        );
        let (tx, _) = broadcast::channel(16);
        // Port 1 is never listening, so every delivery fails
        let dispatcher =
            SyncDispatcher::new(queue.clone(), UpstreamClient::new("http://127.0.0.1:1"), tx);
        (dispatcher, queue)
    }

    #[tokio::test]
    async fn unknown_tag_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let (dispatcher, _queue) = dispatcher_with_dead_upstream(&dir).await;

        let report = dispatcher.handle_sync("water-intake").await.unwrap();
        assert!(report.is_none());
    }

    #[tokio::test]
    async fn failed_delivery_retains_mutation_and_emits_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (dispatcher, queue) = dispatcher_with_dead_upstream(&dir).await;
        let mut events = dispatcher.subscribe();

        queue
            .enqueue(ResourceTag::Meal, serde_json::json!({"calories": 400}))
            .await
            .unwrap();

        let report = dispatcher
            .handle_sync("meal-logging")
            .await
            .unwrap()
            .expect("known tag");

        assert!(report.is_complete_failure());
        assert_eq!(queue.pending(ResourceTag::Meal).await, 1);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn trigger_with_empty_queue_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let (dispatcher, _queue) = dispatcher_with_dead_upstream(&dir).await;

        let report = dispatcher
            .handle_sync("workout-completion")
            .await
            .unwrap()
            .expect("known tag");

        assert!(report.is_complete_success());
        assert_eq!(report.delivered, 0);
    }
}
