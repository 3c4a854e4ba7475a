// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Geographic sample recorded along a route.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A validated, timestamped coordinate.
///
/// Construction goes through [`GeoPoint::new`], so an out-of-range or
/// non-finite coordinate can never enter a route. Deserialization runs the
/// same checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    timestamp_ms: i64,
}

impl GeoPoint {
    /// Create a point, rejecting coordinates outside the WGS84 ranges.
    pub fn new(lat: f64, lng: f64, timestamp_ms: i64) -> Result<Self, GeoPointError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeoPointError::Latitude(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(GeoPointError::Longitude(lng));
        }
        Ok(Self {
            lat,
            lng,
            timestamp_ms,
        })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Unix timestamp in milliseconds.
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }
}

/// Unchecked wire form of [`GeoPoint`].
#[derive(Deserialize)]
struct RawGeoPoint {
    lat: f64,
    lng: f64,
    timestamp_ms: i64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = GeoPointError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        GeoPoint::new(raw.lat, raw.lng, raw.timestamp_ms)
    }
}

/// Coordinate outside the valid range.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GeoPointError {
    #[error("Latitude out of range [-90, 90]: {0}")]
    Latitude(f64),

    #[error("Longitude out of range [-180, 180]: {0}")]
    Longitude(f64),
}
