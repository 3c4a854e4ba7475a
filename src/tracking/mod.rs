// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity tracking engine: live session state, route geometry and pace.

pub mod clock;
pub mod distance;
pub mod error;
pub mod pace;
pub mod sampler;
pub mod session;
pub mod tracker;
pub mod validator;

pub use clock::{Clock, ManualClock, TokioClock};
pub use distance::{point_distance_km, route_distance_km};
pub use error::TrackingError;
pub use pace::pace_sec_per_km;
pub use sampler::{
    GeoSampler, PositionEvent, PositionFix, PositionSource, ReplayPositionSource, SamplingError,
    SamplingErrorCode, Subscription,
};
pub use session::{Session, SessionState, SessionStateMachine, Transition};
pub use tracker::{ActivityTracker, SaveRequest, TrackerOptions, TrackerStatus};
pub use validator::{ensure_savable, is_session_savable, UnsavableSession};
