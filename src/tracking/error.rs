// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Errors surfaced by the activity tracker.

use crate::services::PersistenceError;
use crate::tracking::session::SessionState;
use crate::tracking::validator::UnsavableSession;

/// Failure of a tracker operation.
///
/// None of these are fatal: the session is left untouched and the caller
/// decides how to report the problem.
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error(transparent)]
    Unsavable(#[from] UnsavableSession),

    #[error("Session must be stopped before saving (currently {0:?})")]
    NotStopped(SessionState),

    #[error("Invalid title: {0}")]
    InvalidTitle(String),

    #[error("Failed to save activity: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Tracker is no longer running")]
    TrackerClosed,
}
