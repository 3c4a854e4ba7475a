// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Stride Tracker: GPS run/walk tracking.
//!
//! The [`tracking`] engine turns a live position feed into a session with
//! route, distance, duration and pace. The HTTP layer persists finished
//! activities and serves per-user statistics.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod tracking;

use config::Config;
use services::InMemoryActivityStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: InMemoryActivityStore,
}
