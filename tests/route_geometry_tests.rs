// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route distance and geometry properties over generated walks.

use stride_tracker::models::{ActivityType, GeoPoint};
use stride_tracker::tracking::distance::{encode_route_polyline, route_to_geojson};
use stride_tracker::tracking::{route_distance_km, SessionStateMachine, Transition};

/// Deterministic jittery walk starting at `origin`.
fn generated_walk(seed: u64, len: usize, origin: (f64, f64)) -> Vec<GeoPoint> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) as f64 / (1u64 << 31) as f64) - 0.5
    };
    let (mut lat, mut lng) = origin;
    (0..len)
        .map(|i| {
            lat += next() * 0.001;
            lng += next() * 0.001;
            GeoPoint::new(lat, lng, i as i64 * 1_000).unwrap()
        })
        .collect()
}

#[test]
fn test_incremental_distance_matches_batch() {
    for (seed, origin) in [(1, (37.4, -122.1)), (2, (-33.9, 151.2)), (3, (64.1, -21.9))] {
        let route = generated_walk(seed, 200, origin);
        let mut machine = SessionStateMachine::new(ActivityType::Running);
        machine.start(0, None);

        let mut previous = 0.0;
        for point in &route {
            match machine.start(point.timestamp_ms(), Some(*point)) {
                Transition::SampleAppended { delta_km } => assert!(delta_km >= 0.0),
                other => panic!("unexpected transition {:?}", other),
            }
            let distance = machine.session().distance_km();
            assert!(distance >= previous, "distance decreased");
            previous = distance;
        }

        let batch = route_distance_km(&route);
        assert!(
            (machine.session().distance_km() - batch).abs() < 1e-9,
            "incremental {} vs batch {}",
            machine.session().distance_km(),
            batch
        );
        assert_eq!(machine.session().route(), route.as_slice());
    }
}

#[test]
fn test_repeated_point_adds_nothing() {
    let point = GeoPoint::new(51.5, -0.12, 0).unwrap();
    let mut machine = SessionStateMachine::new(ActivityType::Walking);
    machine.start(0, Some(point));
    for t in 1..10 {
        machine.start(t, Some(point));
    }
    assert_eq!(machine.session().route().len(), 10);
    assert_eq!(machine.session().distance_km(), 0.0);
}

#[test]
fn test_polyline_and_geojson_cover_route() {
    let route = generated_walk(9, 50, (48.85, 2.35));

    let encoded = encode_route_polyline(&route).unwrap();
    let decoded = polyline::decode_polyline(&encoded, 5).unwrap();
    assert_eq!(decoded.0.len(), route.len());
    for (coord, point) in decoded.0.iter().zip(&route) {
        assert!((coord.x - point.lng()).abs() < 1e-5);
        assert!((coord.y - point.lat()).abs() < 1e-5);
    }

    let feature = route_to_geojson(&route);
    let distance = feature
        .property("distance_km")
        .and_then(|v| v.as_f64())
        .unwrap();
    assert!((distance - route_distance_km(&route)).abs() < 1e-9);
}
