// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Live session state machine.
//!
//! ```text
//! Idle ──start──▶ Tracking ◀──start── Paused
//!                    │  └────pause────▶ │
//!                    └──stop──▶ Stopped ◀┘
//! ```
//!
//! All operations take the current wall time explicitly, so the machine is
//! deterministic and owns no timers itself. Each call returns a
//! [`Transition`] telling the host whether the duration timer must be armed
//! or cancelled.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{ActivityType, GeoPoint};
use crate::tracking::distance::point_distance_km;

/// Tracking state of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum SessionState {
    #[default]
    Idle,
    Tracking,
    Paused,
    Stopped,
}

/// One in-progress or just-finished activity.
///
/// Clones of this value are the read-only snapshots handed to display code
/// and to the save path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Session {
    state: SessionState,
    route: Vec<GeoPoint>,
    distance_km: f64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    duration_sec: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    start_timestamp_ms: Option<i64>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    last_tick_timestamp_ms: Option<i64>,
    activity_type: ActivityType,
}

impl Session {
    /// Fresh idle session of the given type.
    pub fn new(activity_type: ActivityType) -> Self {
        Self {
            activity_type,
            ..Self::default()
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn route(&self) -> &[GeoPoint] {
        &self.route
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_sec(&self) -> i64 {
        self.duration_sec
    }

    pub fn start_timestamp_ms(&self) -> Option<i64> {
        self.start_timestamp_ms
    }

    pub fn last_tick_timestamp_ms(&self) -> Option<i64> {
        self.last_tick_timestamp_ms
    }

    pub fn activity_type(&self) -> ActivityType {
        self.activity_type
    }

    fn begin(&mut self, now_ms: i64, point: Option<GeoPoint>) {
        self.state = SessionState::Tracking;
        self.start_timestamp_ms = Some(now_ms);
        self.last_tick_timestamp_ms = Some(now_ms);
        if let Some(point) = point {
            self.append(point);
        }
    }

    /// Append a point and add the segment length. Returns the added distance.
    fn append(&mut self, point: GeoPoint) -> f64 {
        let delta_km = self
            .route
            .last()
            .map_or(0.0, |last| point_distance_km(last, &point));
        self.route.push(point);
        self.distance_km += delta_km;
        delta_km
    }
}

/// Outcome of a state machine operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// A new tracking run began; the duration timer must be armed.
    Started,
    /// Paused session is tracking again.
    Resumed,
    /// A sample was appended while tracking.
    SampleAppended { delta_km: f64 },
    Paused,
    /// Tracking ended; the duration timer must be cancelled.
    Stopped,
    /// Session discarded; the duration timer must be cancelled.
    Reset,
    /// A duration tick was accrued.
    Ticked { added_sec: i64 },
    /// Activity type changed; applies to this and later sessions.
    ActivityTypeChanged(ActivityType),
    /// Operation not applicable in the current state. Nothing changed.
    Ignored,
}

impl Transition {
    /// Whether this transition arms the duration timer.
    pub fn arms_timer(&self) -> bool {
        matches!(self, Transition::Started)
    }

    /// Whether this transition cancels the duration timer.
    pub fn cancels_timer(&self) -> bool {
        matches!(self, Transition::Stopped | Transition::Reset)
    }
}

/// Owns the live [`Session`] and applies commands, samples and ticks to it.
#[derive(Debug, Clone, Default)]
pub struct SessionStateMachine {
    session: Session,
}

impl SessionStateMachine {
    pub fn new(activity_type: ActivityType) -> Self {
        Self {
            session: Session::new(activity_type),
        }
    }

    /// Read-only view of the current session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Owned snapshot for display binding or saving.
    pub fn snapshot(&self) -> Session {
        self.session.clone()
    }

    pub fn state(&self) -> SessionState {
        self.session.state
    }

    /// Change the activity type. Applies to the current and later sessions.
    pub fn set_activity_type(&mut self, activity_type: ActivityType) -> Transition {
        if self.session.activity_type == activity_type {
            return Transition::Ignored;
        }
        self.session.activity_type = activity_type;
        Transition::ActivityTypeChanged(activity_type)
    }

    /// Start, resume, or ingest a sample, depending on state.
    ///
    /// While tracking, `start` with a point is how live samples are ingested.
    /// After a stop, `start` begins a brand-new session; the stopped one is
    /// never resumed.
    pub fn start(&mut self, now_ms: i64, point: Option<GeoPoint>) -> Transition {
        match self.session.state {
            SessionState::Idle => {
                self.session.begin(now_ms, point);
                Transition::Started
            }
            SessionState::Stopped => {
                self.session = Session::new(self.session.activity_type);
                self.session.begin(now_ms, point);
                Transition::Started
            }
            SessionState::Paused => {
                self.session.state = SessionState::Tracking;
                self.session.last_tick_timestamp_ms = Some(now_ms);
                Transition::Resumed
            }
            SessionState::Tracking => match point {
                Some(point) => Transition::SampleAppended {
                    delta_km: self.session.append(point),
                },
                None => Transition::Ignored,
            },
        }
    }

    /// Pause accrual. A no-op unless tracking.
    pub fn pause(&mut self) -> Transition {
        if self.session.state != SessionState::Tracking {
            return Transition::Ignored;
        }
        self.session.state = SessionState::Paused;
        Transition::Paused
    }

    /// Finish the session, keeping its final values for read-out.
    pub fn stop(&mut self) -> Transition {
        match self.session.state {
            SessionState::Tracking | SessionState::Paused => {
                self.session.state = SessionState::Stopped;
                Transition::Stopped
            }
            SessionState::Idle | SessionState::Stopped => Transition::Ignored,
        }
    }

    /// Discard all history and return to idle.
    pub fn reset(&mut self) -> Transition {
        self.session = Session::new(self.session.activity_type);
        Transition::Reset
    }

    /// Accrue whole seconds elapsed since the last tick.
    ///
    /// Ticks outside `Tracking` are ignored but do not disarm the timer.
    /// The fractional remainder is dropped when `last_tick` advances, so the
    /// total can lag wall time under delayed scheduling.
    pub fn tick(&mut self, now_ms: i64) -> Transition {
        if self.session.state != SessionState::Tracking {
            return Transition::Ignored;
        }
        let last = self.session.last_tick_timestamp_ms.unwrap_or(now_ms);
        let added_sec = ((now_ms - last) / 1000).max(0);
        self.session.duration_sec += added_sec;
        self.session.last_tick_timestamp_ms = Some(now_ms);
        Transition::Ticked { added_sec }
    }
}
