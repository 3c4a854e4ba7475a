// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - persistence collaborators of the tracker.

pub mod activity_api;
pub mod activity_store;

pub use activity_api::HttpActivityStore;
pub use activity_store::{ActivityStore, InMemoryActivityStore, PersistenceError};
