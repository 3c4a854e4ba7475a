// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity persistence boundary.
//!
//! [`ActivityStore`] is what the tracker hands finished sessions to.
//! [`InMemoryActivityStore`] backs the API server and tests.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::models::{CompletedActivity, NewActivity, UserStats};
use crate::time_utils::format_utc_rfc3339;

/// Destination for completed activities.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Persist an activity and return its stored id.
    async fn save(&self, activity: NewActivity) -> Result<u64, PersistenceError>;
}

/// Errors from the persistence boundary.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Activity rejected: {0}")]
    Validation(String),

    #[error("Activity API request failed: {0}")]
    Http(String),

    #[error("Unexpected response from activity API ({status}): {body}")]
    Unexpected { status: u16, body: String },
}

/// In-process activity store with per-user stats aggregates.
#[derive(Clone, Default)]
pub struct InMemoryActivityStore {
    activities: Arc<DashMap<u64, CompletedActivity>>,
    stats: Arc<DashMap<u64, UserStats>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store an activity, updating the owner's stats.
    pub fn insert(&self, activity: NewActivity) -> Result<CompletedActivity, PersistenceError> {
        activity.validate().map_err(PersistenceError::Validation)?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let completed = activity.into_completed(id);
        self.activities.insert(id, completed.clone());

        let now = format_utc_rfc3339(chrono::Utc::now());
        self.stats
            .entry(completed.user_id)
            .or_default()
            .update_from_activity(&completed, &now);

        tracing::info!(
            user_id = completed.user_id,
            activity_id = id,
            activity_type = completed.activity_type.as_str(),
            distance_km = completed.distance_km,
            "Activity stored"
        );
        Ok(completed)
    }

    /// Get an activity owned by `user_id`.
    pub fn get(&self, user_id: u64, activity_id: u64) -> Option<CompletedActivity> {
        self.activities
            .get(&activity_id)
            .filter(|a| a.user_id == user_id)
            .map(|a| a.clone())
    }

    /// All activities of a user, newest first.
    pub fn list_for_user(&self, user_id: u64) -> Vec<CompletedActivity> {
        let mut activities: Vec<CompletedActivity> = self
            .activities
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        activities.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        activities
    }

    /// Stats aggregate for a user (empty if they have no activities).
    pub fn user_stats(&self, user_id: u64) -> UserStats {
        self.stats
            .get(&user_id)
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ActivityStore for InMemoryActivityStore {
    async fn save(&self, activity: NewActivity) -> Result<u64, PersistenceError> {
        self.insert(activity).map(|a| a.id)
    }
}
