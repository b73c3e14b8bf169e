// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use gymsync::cache::CacheAgent;
use gymsync::config::Config;
use gymsync::queue::OfflineQueue;
use gymsync::routes::create_router;
use gymsync::services::{NotificationDispatcher, SyncDispatcher, UpstreamClient};
use gymsync::AgentState;
use std::sync::Arc;
use std::time::Duration;

/// Create offline test state: journal in a temp directory, upstream pointed
/// at a port nothing listens on. The temp dir guard must stay alive for the
/// duration of the test.
#[allow(dead_code)]
pub async fn create_test_state() -> (Arc<AgentState>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");

    let mut config = Config::default();
    config.queue_path = dir.path().join("offline-queue.json");
    config.upstream_url = "http://127.0.0.1:1".to_string();

    let queue = Arc::new(
        OfflineQueue::open(&config.queue_path, config.max_sync_attempts)
            .await
            .expect("Failed to open offline queue"),
    );
    let upstream = UpstreamClient::new(config.upstream_url.clone());
    let (events, _) = tokio::sync::broadcast::channel(16);

    let agent = CacheAgent::new(config.cache_generation.clone(), queue.clone(), events.clone());
    // Skip install (the upstream is unreachable) and take control directly;
    // static assets fill lazily in this configuration.
    agent.activate();

    let sync = SyncDispatcher::new(queue.clone(), upstream.clone(), events);
    let notifier = NotificationDispatcher::new(Duration::from_millis(1));

    let state = Arc::new(AgentState {
        config,
        agent,
        queue,
        upstream,
        sync,
        notifier,
    });
    (state, dir)
}

/// Create a test app with offline dependencies.
/// Returns the router, the shared state, and the temp dir guard.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AgentState>, tempfile::TempDir) {
    let (state, dir) = create_test_state().await;
    (create_router(state.clone()), state, dir)
}
