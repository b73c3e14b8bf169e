//! Caching layer: named stores, route classification, fetch strategies,
//! and the lifecycle orchestrator.

pub mod agent;
pub mod classify;
pub mod store;
pub mod strategy;

pub use agent::{CacheAgent, ControlReply, LifecycleState};
pub use classify::{classify, Strategy};
pub use store::{CacheStore, CachedResponse, StoreRegistry};

/// Store name prefix shared by every generation.
pub const STORE_PREFIX: &str = "gymsync";

/// Name of the static (install-time asset) store for a generation.
pub fn static_store_name(generation: &str) -> String {
    format!("{STORE_PREFIX}-static-{generation}")
}

/// Name of the dynamic (runtime write-through) store for a generation.
pub fn dynamic_store_name(generation: &str) -> String {
    format!("{STORE_PREFIX}-dynamic-{generation}")
}

/// Core assets pre-populated into the static store on install.
pub const STATIC_ASSETS: &[&str] = &["/", "/manifest.json", "/favicon.svg"];
