// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gate deciding whether a finished session may be persisted.

use crate::tracking::session::Session;

/// Minimum number of route points for a savable session.
pub const MIN_ROUTE_POINTS: usize = 2;

/// True iff the session has distance, duration and at least two points.
pub fn is_session_savable(session: &Session) -> bool {
    ensure_savable(session).is_ok()
}

/// Like [`is_session_savable`], reporting the first failed requirement.
pub fn ensure_savable(session: &Session) -> Result<(), UnsavableSession> {
    if session.distance_km() <= 0.0 {
        return Err(UnsavableSession::NoDistance);
    }
    if session.duration_sec() <= 0 {
        return Err(UnsavableSession::NoDuration);
    }
    if session.route().len() < MIN_ROUTE_POINTS {
        return Err(UnsavableSession::TooFewPoints(session.route().len()));
    }
    Ok(())
}

/// Reason a session was refused by the save gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UnsavableSession {
    #[error("Not enough tracking data to save the activity: no distance recorded")]
    NoDistance,

    #[error("Not enough tracking data to save the activity: no duration recorded")]
    NoDuration,

    #[error("Not enough tracking data to save the activity: {0} route point(s)")]
    TooFewPoints(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityType, GeoPoint};
    use crate::tracking::session::SessionStateMachine;

    /// Drive a machine to the requested route length and duration.
    fn session_with(points: &[(f64, f64)], duration_sec: i64) -> Session {
        let mut machine = SessionStateMachine::new(ActivityType::Running);
        machine.start(0, None);
        for (i, (lat, lng)) in points.iter().enumerate() {
            machine.start(0, Some(GeoPoint::new(*lat, *lng, i as i64).unwrap()));
        }
        machine.tick(duration_sec * 1000);
        machine.stop();
        machine.snapshot()
    }

    #[test]
    fn test_empty_session_not_savable() {
        let session = session_with(&[], 0);
        assert!(!is_session_savable(&session));
        assert_eq!(ensure_savable(&session), Err(UnsavableSession::NoDistance));
    }

    #[test]
    fn test_zero_duration_not_savable() {
        let session = session_with(&[(0.0, 0.0), (0.0, 0.045)], 0);
        assert!(session.distance_km() > 0.0);
        assert!(!is_session_savable(&session));
        assert_eq!(ensure_savable(&session), Err(UnsavableSession::NoDuration));
    }

    #[test]
    fn test_same_position_twice_not_savable() {
        let session = session_with(&[(1.0, 1.0), (1.0, 1.0)], 60);
        assert_eq!(ensure_savable(&session), Err(UnsavableSession::NoDistance));
    }

    #[test]
    fn test_complete_session_savable() {
        let session = session_with(&[(37.0, -122.0), (37.005, -122.0), (37.0108, -122.0)], 300);
        assert!(session.distance_km() > 1.0);
        assert!(is_session_savable(&session));
    }

    #[test]
    fn test_idle_session_not_savable() {
        assert!(!is_session_savable(&Session::default()));
    }
}
