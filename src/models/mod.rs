// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod geo_point;
pub mod stats;

pub use activity::{validate_title, ActivityType, CompletedActivity, NewActivity};
pub use geo_point::{GeoPoint, GeoPointError};
pub use stats::{Achievement, UserStats, WeeklyActivity};
