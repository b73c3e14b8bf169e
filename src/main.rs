// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GymSync agent server.
//!
//! Runs the offline-capable caching proxy in front of the fitness API:
//! intercepted GETs flow through route-classified cache strategies,
//! offline mutations are journaled and replayed on sync triggers.

use gymsync::{
    cache::CacheAgent,
    config::Config,
    queue::OfflineQueue,
    services::{NotificationDispatcher, SyncDispatcher, UpstreamClient},
    AgentEvent, AgentState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        port = config.port,
        generation = %config.cache_generation,
        "Starting GymSync agent"
    );

    // Open the offline mutation journal
    let queue = Arc::new(
        OfflineQueue::open(&config.queue_path, config.max_sync_attempts)
            .await
            .expect("Failed to open offline queue"),
    );

    let upstream = UpstreamClient::new(config.upstream_url.clone());

    // Foreground-bound event channel shared by the agent and sync dispatcher
    let (events, _) = tokio::sync::broadcast::channel(64);

    let agent = CacheAgent::new(config.cache_generation.clone(), queue.clone(), events.clone());
    let sync = SyncDispatcher::new(queue.clone(), upstream.clone(), events);
    let notifier =
        NotificationDispatcher::new(Duration::from_secs(config.remind_later_delay_secs));

    let state = Arc::new(AgentState {
        config: config.clone(),
        agent,
        queue,
        upstream,
        sync,
        notifier,
    });

    // Install this generation and take control immediately
    if let Err(err) = state.dispatch(AgentEvent::Install).await {
        tracing::warn!(error = %err, "Install incomplete; static assets will fill lazily");
    }
    state.dispatch(AgentEvent::Activate).await?;

    // Build router
    let app = gymsync::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Agent listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gymsync=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
