// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Replay a synthetic run through the tracker and save it to the API.
//!
//! Start the API server first; the activity is posted to
//! `ACTIVITY_API_URL`.

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use stride_tracker::config::Config;
use stride_tracker::services::HttpActivityStore;
use stride_tracker::tracking::pace::{format_distance, format_duration, format_pace};
use stride_tracker::tracking::{
    pace_sec_per_km, ActivityTracker, Clock, PositionEvent, PositionFix, ReplayPositionSource,
    SaveRequest, TokioClock, TrackerOptions,
};

const SAMPLE_COUNT: u32 = 30;
const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);
/// Roughly 3 m of latitude per sample.
const LAT_STEP: f64 = 0.000027;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stride_tracker=info".parse()?),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let clock = Arc::new(TokioClock::new());

    let start_ms = clock.now_ms();
    let script = (0..SAMPLE_COUNT)
        .map(|i| {
            let fix = PositionFix::new(
                37.4419 + f64::from(i) * LAT_STEP,
                -122.1430,
                start_ms + i64::from(i) * SAMPLE_INTERVAL.as_millis() as i64,
            );
            (SAMPLE_INTERVAL, PositionEvent::Fix(fix))
        })
        .collect();
    let source = Arc::new(ReplayPositionSource::new(script));
    let store = Arc::new(HttpActivityStore::new(config.activity_api_url.clone()));

    let tracker = ActivityTracker::spawn(
        source,
        store,
        clock,
        TrackerOptions::default(),
    );

    tracker.start(None).await?;
    let mut status = tracker.watch();
    while status.changed().await.is_ok() {
        let session = status.borrow_and_update().session.clone();
        println!(
            "{:>8}  {:>7}  {}",
            format_duration(session.duration_sec()),
            format_distance(session.distance_km()),
            format_pace(pace_sec_per_km(session.distance_km(), session.duration_sec()))
        );
        if session.route().len() as u32 >= SAMPLE_COUNT {
            break;
        }
    }

    tracker.stop().await?;
    let finished = tracker.status().session;

    let id = tracker
        .save(SaveRequest {
            user_id: 1,
            title: "Replayed Run".to_string(),
            activity_type: None,
        })
        .await?;
    println!(
        "Saved activity {}: {} in {}",
        id,
        format_distance(finished.distance_km()),
        format_duration(finished.duration_sec())
    );
    Ok(())
}
