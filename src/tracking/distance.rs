// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Great-circle distance and route geometry.

use geo::{Coord, LineString};
use geojson::{Feature, Geometry};

use crate::models::GeoPoint;

/// Mean Earth radius used for all distance figures.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Precision used for encoded route polylines (Google format).
pub const POLYLINE_PRECISION: u32 = 5;

fn deg_to_rad(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}

/// Haversine distance between two points in kilometers.
pub fn point_distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let d_lat = deg_to_rad(b.lat() - a.lat());
    let d_lng = deg_to_rad(b.lng() - a.lng());
    let h = (d_lat / 2.0).sin().powi(2)
        + deg_to_rad(a.lat()).cos() * deg_to_rad(b.lat()).cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Total length of a route, summed pairwise in route order.
///
/// Live tracking adds exactly these pairwise terms one at a time, so the
/// incremental total and this recomputation agree.
pub fn route_distance_km(route: &[GeoPoint]) -> f64 {
    if route.len() < 2 {
        return 0.0;
    }
    route
        .windows(2)
        .map(|pair| point_distance_km(&pair[0], &pair[1]))
        .sum()
}

/// Route as a line string (x = longitude, y = latitude).
pub fn route_line_string(route: &[GeoPoint]) -> LineString<f64> {
    route
        .iter()
        .map(|p| Coord {
            x: p.lng(),
            y: p.lat(),
        })
        .collect()
}

/// Encode a route as a polyline string for compact display and storage.
pub fn encode_route_polyline(route: &[GeoPoint]) -> Result<String, RouteGeometryError> {
    polyline::encode_coordinates(route_line_string(route), POLYLINE_PRECISION)
        .map_err(|e| RouteGeometryError::Polyline(e.to_string()))
}

/// GeoJSON feature for map display, carrying the route length.
pub fn route_to_geojson(route: &[GeoPoint]) -> Feature {
    let line = route_line_string(route);
    let mut feature = Feature::from(Geometry::new(geojson::Value::from(&line)));
    feature.set_property("distance_km", route_distance_km(route));
    feature.set_property("points", route.len());
    feature
}

/// Errors from route geometry conversions.
#[derive(Debug, thiserror::Error)]
pub enum RouteGeometryError {
    #[error("Failed to encode polyline: {0}")]
    Polyline(String),
}
