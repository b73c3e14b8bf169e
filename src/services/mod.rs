// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod notify;
pub mod progression;
pub mod sync;
pub mod upstream;

pub use notify::{NotificationDispatcher, NotificationOutcome};
pub use sync::SyncDispatcher;
pub use upstream::UpstreamClient;
