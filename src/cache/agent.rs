// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cache orchestrator: the request-interception entry point and the
//! lifecycle of one agent generation.
//!
//! A generation owns exactly one static and one dynamic store. Activation
//! purges every store belonging to a superseded generation and claims all
//! foreground contexts, so requests route through this instance without a
//! reload.

use std::future::Future;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::cache::store::{request_key, CachedResponse, StoreRegistry};
use crate::cache::{classify, dynamic_store_name, static_store_name, Strategy, STATIC_ASSETS};
use crate::cache::strategy::{cache_first, network_first, stale_while_revalidate};
use crate::error::Result;
use crate::models::{ClientMessage, ControlMessage};
use crate::queue::OfflineQueue;

/// Lifecycle of an agent generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Static assets are being pre-populated.
    Installing,
    /// Install finished; waiting to take control.
    Installed,
    /// This generation serves all intercepted requests.
    Active,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Installing => "installing",
            LifecycleState::Installed => "installed",
            LifecycleState::Active => "active",
        }
    }
}

/// Reply to a control-channel message.
#[derive(Debug)]
pub enum ControlReply {
    Ack,
    Queued { id: uuid::Uuid },
    CacheStatus(std::collections::HashMap<String, usize>),
}

/// The request-interception entry point; owns the named cache stores.
pub struct CacheAgent {
    registry: StoreRegistry,
    generation: String,
    static_name: String,
    dynamic_name: String,
    state: RwLock<LifecycleState>,
    queue: Arc<OfflineQueue>,
    events: broadcast::Sender<ClientMessage>,
}

impl CacheAgent {
    pub fn new(
        generation: impl Into<String>,
        queue: Arc<OfflineQueue>,
        events: broadcast::Sender<ClientMessage>,
    ) -> Self {
        let generation = generation.into();
        Self {
            static_name: static_store_name(&generation),
            dynamic_name: dynamic_store_name(&generation),
            registry: StoreRegistry::new(),
            generation,
            state: RwLock::new(LifecycleState::Installing),
            queue,
            events,
        }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.read().expect("lifecycle lock poisoned")
    }

    pub fn generation(&self) -> &str {
        &self.generation
    }

    pub fn registry(&self) -> &StoreRegistry {
        &self.registry
    }

    /// Pre-populate the static store with the core asset manifest.
    ///
    /// Readiness is signalled as soon as this instance's assets are cached;
    /// nothing waits on other instances.
    pub async fn install<F, Fut>(&self, fetch: F) -> Result<()>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<CachedResponse>>,
    {
        tracing::info!(generation = %self.generation, "Installing");

        let statics = self.registry.open(&self.static_name);
        for asset in STATIC_ASSETS {
            let response = fetch(asset.to_string()).await?;
            statics.put(request_key("GET", asset), response);
        }

        *self.state.write().expect("lifecycle lock poisoned") = LifecycleState::Installed;
        tracing::info!(
            generation = %self.generation,
            assets = STATIC_ASSETS.len(),
            "Install complete"
        );
        Ok(())
    }

    /// Take control: purge every store from superseded generations, then
    /// claim all foreground contexts.
    ///
    /// The purge is wholesale: after activation no prior-generation store
    /// remains enumerable.
    pub fn activate(&self) {
        tracing::info!(generation = %self.generation, "Activating");

        for name in self.registry.names() {
            if name != self.static_name && name != self.dynamic_name {
                tracing::info!(store = %name, "Deleting superseded cache store");
                self.registry.delete(&name);
            }
        }
        // Both current stores exist from here on, even before first use.
        self.registry.open(&self.static_name);
        self.registry.open(&self.dynamic_name);

        *self.state.write().expect("lifecycle lock poisoned") = LifecycleState::Active;

        let _ = self.events.send(ClientMessage::ClientsClaimed {
            generation: self.generation.clone(),
        });
    }

    /// Whether a request is subject to interception at all. Only HTTP(S)
    /// GET traffic is; everything else goes straight to the network.
    pub fn intercepts(&self, method: &str, scheme: &str) -> bool {
        method.eq_ignore_ascii_case("GET")
            && (scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https"))
    }

    /// Serve an intercepted GET through the strategy the path classifies to.
    ///
    /// The second tuple element is the handle of a background refresh task,
    /// when stale-while-revalidate started one.
    pub async fn handle_fetch<F, Fut>(
        &self,
        path: &str,
        is_navigation: bool,
        fetch: F,
    ) -> Result<(CachedResponse, Option<JoinHandle<()>>)>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<CachedResponse>> + Send + 'static,
    {
        let key = request_key("GET", path);
        // Query strings belong to request identity but not to classification.
        let route = path.split('?').next().unwrap_or(path);

        match classify(route) {
            Strategy::NetworkFirst => {
                let dynamic = self.registry.open(&self.dynamic_name);
                let response =
                    network_first(&self.registry, &dynamic, &key, is_navigation, fetch).await?;
                Ok((response, None))
            }
            Strategy::CacheFirst => {
                let statics = self.registry.open(&self.static_name);
                let response = cache_first(&self.registry, &statics, &key, fetch).await?;
                Ok((response, None))
            }
            Strategy::StaleWhileRevalidate => {
                let dynamic = self.registry.open(&self.dynamic_name);
                stale_while_revalidate(dynamic, &key, fetch).await
            }
        }
    }

    /// Handle a control-channel message from a foreground context.
    pub async fn handle_message(&self, message: ControlMessage) -> Result<ControlReply> {
        match message {
            ControlMessage::SkipWaiting => {
                self.activate();
                Ok(ControlReply::Ack)
            }
            ControlMessage::QueueOfflineAction {
                resource_tag,
                payload,
            } => {
                let mutation = self.queue.enqueue(resource_tag, payload).await?;
                Ok(ControlReply::Queued { id: mutation.id })
            }
            ControlMessage::ClearCache { cache_name } => {
                match cache_name {
                    Some(name) => {
                        let existed = self.registry.delete(&name);
                        tracing::info!(store = %name, existed, "Cache cleared");
                    }
                    None => {
                        self.registry.clear();
                        tracing::info!("All caches cleared");
                    }
                }
                Ok(ControlReply::Ack)
            }
            ControlMessage::GetCacheStatus => {
                Ok(ControlReply::CacheStatus(self.registry.status()))
            }
        }
    }

    /// Subscribe to foreground-bound agent events.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientMessage> {
        self.events.subscribe()
    }
}
