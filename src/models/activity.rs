// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity records exchanged with the activity store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::GeoPoint;
use crate::tracking::pace::pace_sec_per_km;
use crate::tracking::session::Session;

/// Maximum accepted title length (characters).
pub const MAX_TITLE_LEN: usize = 100;

/// Kind of tracked activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ActivityType {
    #[default]
    Running,
    Walking,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Running => "running",
            ActivityType::Walking => "walking",
        }
    }
}

/// Payload handed to the activity store when a session is saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewActivity {
    pub user_id: u64,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub title: String,
    pub distance_km: f64,
    pub duration_sec: i64,
    pub date: DateTime<Utc>,
    pub route: Vec<GeoPoint>,
    pub average_pace_sec_per_km: f64,
}

impl NewActivity {
    /// Build the save payload from a finished session.
    pub fn from_session(
        session: &Session,
        user_id: u64,
        title: &str,
        activity_type: ActivityType,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            activity_type,
            title: title.trim().to_string(),
            distance_km: session.distance_km(),
            duration_sec: session.duration_sec(),
            date,
            route: session.route().to_vec(),
            average_pace_sec_per_km: pace_sec_per_km(
                session.distance_km(),
                session.duration_sec(),
            ),
        }
    }

    /// Check the payload before it is stored.
    pub fn validate(&self) -> Result<(), String> {
        validate_title(&self.title)?;
        if self.route.len() < 2 {
            return Err("route must contain at least 2 points".to_string());
        }
        if !self.distance_km.is_finite() || self.distance_km <= 0.0 {
            return Err("distance_km must be a positive number".to_string());
        }
        if self.duration_sec <= 0 {
            return Err("duration_sec must be positive".to_string());
        }
        if !self.average_pace_sec_per_km.is_finite() || self.average_pace_sec_per_km < 0.0 {
            return Err("average_pace_sec_per_km must be a non-negative number".to_string());
        }
        Ok(())
    }

    /// Attach the store-assigned id.
    pub fn into_completed(self, id: u64) -> CompletedActivity {
        CompletedActivity {
            id,
            user_id: self.user_id,
            activity_type: self.activity_type,
            title: self.title,
            distance_km: self.distance_km,
            duration_sec: self.duration_sec,
            date: self.date,
            route: self.route,
            average_pace_sec_per_km: self.average_pace_sec_per_km,
        }
    }
}

/// Title rule shared by the tracker and the API.
pub fn validate_title(title: &str) -> Result<(), String> {
    let title = title.trim();
    if title.is_empty() {
        return Err("Please provide a title".to_string());
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(format!("title must be at most {} characters", MAX_TITLE_LEN));
    }
    Ok(())
}

/// Stored activity record. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedActivity {
    pub id: u64,
    pub user_id: u64,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub title: String,
    pub distance_km: f64,
    pub duration_sec: i64,
    pub date: DateTime<Utc>,
    pub route: Vec<GeoPoint>,
    pub average_pace_sec_per_km: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: &str, route_len: usize) -> NewActivity {
        let route = (0..route_len)
            .map(|i| GeoPoint::new(37.0 + i as f64 * 0.001, -122.0, i as i64 * 1000).unwrap())
            .collect();
        NewActivity {
            user_id: 7,
            activity_type: ActivityType::Running,
            title: title.to_string(),
            distance_km: 1.2,
            duration_sec: 300,
            date: Utc::now(),
            route,
            average_pace_sec_per_km: 250.0,
        }
    }

    #[test]
    fn test_activity_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ActivityType::Walking).unwrap(),
            "\"walking\""
        );
        assert_eq!(ActivityType::default(), ActivityType::Running);
    }

    #[test]
    fn test_payload_type_field_name() {
        let json = serde_json::to_value(payload("Morning Run", 2)).unwrap();
        assert_eq!(json["type"], "running");
        assert!(json.get("activity_type").is_none());
    }

    #[test]
    fn test_validate_accepts_good_payload() {
        assert!(payload("Morning Run", 3).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        assert!(payload("   ", 3).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_long_title() {
        let title = "a".repeat(MAX_TITLE_LEN + 1);
        assert!(payload(&title, 3).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_short_route() {
        assert!(payload("Morning Run", 1).validate().is_err());
    }

    #[test]
    fn test_into_completed_keeps_fields() {
        let new = payload("Morning Run", 2);
        let completed = new.clone().into_completed(42);
        assert_eq!(completed.id, 42);
        assert_eq!(completed.title, new.title);
        assert_eq!(completed.route, new.route);
    }
}
