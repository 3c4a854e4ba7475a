// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use stride_tracker::config::Config;
use stride_tracker::models::{ActivityType, GeoPoint, NewActivity};
use stride_tracker::routes::create_router;
use stride_tracker::services::InMemoryActivityStore;
use stride_tracker::tracking::sampler::PositionSink;
use stride_tracker::tracking::{PositionSource, Subscription};
use stride_tracker::AppState;

/// Create a test app backed by an empty in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        store: InMemoryActivityStore::new(),
    });
    (create_router(state.clone()), state)
}

/// Point `step` × ~100 m north of a fixed origin.
#[allow(dead_code)]
pub fn point_north(step: u32, timestamp_ms: i64) -> GeoPoint {
    GeoPoint::new(37.0 + f64::from(step) * 0.0009, -122.0, timestamp_ms).unwrap()
}

/// A valid save payload with a three point route.
#[allow(dead_code)]
pub fn sample_activity(user_id: u64, activity_type: ActivityType) -> NewActivity {
    let route: Vec<GeoPoint> = (0..3).map(|i| point_north(i, i64::from(i) * 10_000)).collect();
    let distance_km = stride_tracker::tracking::route_distance_km(&route);
    NewActivity {
        user_id,
        activity_type,
        title: "Morning Run".to_string(),
        distance_km,
        duration_sec: 60,
        date: chrono::Utc::now(),
        route,
        average_pace_sec_per_km: 60.0 / distance_km,
    }
}

/// Position source that never emits, recording subscribe/cancel calls.
#[allow(dead_code)]
#[derive(Default)]
pub struct ProbeSource {
    pub subscriptions: AtomicUsize,
    pub cancelled: Arc<AtomicBool>,
}

impl PositionSource for ProbeSource {
    fn subscribe(&self, sink: PositionSink) -> Subscription {
        self.subscriptions.fetch_add(1, Ordering::SeqCst);
        self.cancelled.store(false, Ordering::SeqCst);
        let cancelled = self.cancelled.clone();
        Subscription::new(move || {
            drop(sink);
            cancelled.store(true, Ordering::SeqCst);
        })
    }
}
