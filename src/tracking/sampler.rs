// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Position feed abstraction.
//!
//! A [`PositionSource`] pushes fixes and errors into a channel until its
//! [`Subscription`] is dropped. [`GeoSampler`] turns raw fixes into
//! validated [`GeoPoint`]s.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::{GeoPoint, GeoPointError};

/// Raw coordinates as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One position report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub coords: Coordinates,
    pub timestamp_ms: i64,
}

impl PositionFix {
    pub fn new(latitude: f64, longitude: f64, timestamp_ms: i64) -> Self {
        Self {
            coords: Coordinates {
                latitude,
                longitude,
            },
            timestamp_ms,
        }
    }
}

/// Why the platform could not deliver a position.
///
/// Numeric codes follow the browser geolocation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingErrorCode {
    Unsupported,
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

impl SamplingErrorCode {
    pub fn code(&self) -> u16 {
        match self {
            SamplingErrorCode::Unsupported => 0,
            SamplingErrorCode::PermissionDenied => 1,
            SamplingErrorCode::PositionUnavailable => 2,
            SamplingErrorCode::Timeout => 3,
        }
    }
}

/// Non-fatal position source failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("Location error ({}): {message}", .code.code())]
pub struct SamplingError {
    pub code: SamplingErrorCode,
    pub message: String,
}

impl SamplingError {
    pub fn new(code: SamplingErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Event on the position channel: a fix, or an error tagged as such.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionEvent {
    Fix(PositionFix),
    Error(SamplingError),
}

/// Sender half handed to a [`PositionSource`].
pub type PositionSink = mpsc::UnboundedSender<PositionEvent>;

/// Continuous position feed.
pub trait PositionSource: Send + Sync {
    /// Start delivering events to `sink`. Delivery stops when the returned
    /// subscription is dropped or cancelled.
    fn subscribe(&self, sink: PositionSink) -> Subscription;
}

/// Handle to an active feed. Cancels the feed on drop.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Subscription backed by a spawned task; cancelling aborts the task.
    pub fn from_task(task: JoinHandle<()>) -> Self {
        Self::new(move || task.abort())
    }

    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Normalizes raw fixes into route points.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoSampler;

impl GeoSampler {
    /// Validate a fix. Out-of-range coordinates are rejected, not clamped.
    pub fn normalize(&self, fix: &PositionFix) -> Result<GeoPoint, GeoPointError> {
        GeoPoint::new(fix.coords.latitude, fix.coords.longitude, fix.timestamp_ms)
    }
}

/// Replays a scripted sequence of events, each after its own delay.
///
/// Used by the demo binary and tests in place of a device feed.
#[derive(Debug, Clone, Default)]
pub struct ReplayPositionSource {
    script: Vec<(Duration, PositionEvent)>,
}

impl ReplayPositionSource {
    pub fn new(script: Vec<(Duration, PositionEvent)>) -> Self {
        Self { script }
    }

    /// Evenly spaced fixes.
    pub fn from_fixes(interval: Duration, fixes: impl IntoIterator<Item = PositionFix>) -> Self {
        Self::new(
            fixes
                .into_iter()
                .map(|fix| (interval, PositionEvent::Fix(fix)))
                .collect(),
        )
    }
}

impl PositionSource for ReplayPositionSource {
    fn subscribe(&self, sink: PositionSink) -> Subscription {
        let script = self.script.clone();
        let task = tokio::spawn(async move {
            for (delay, event) in script {
                tokio::time::sleep(delay).await;
                if sink.send(event).is_err() {
                    tracing::debug!("Position sink closed, ending replay");
                    return;
                }
            }
        });
        Subscription::from_task(task)
    }
}
