// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity API: the persistence boundary used by tracker clients.

use crate::error::{AppError, Result};
use crate::models::stats::weekly_activity;
use crate::models::{
    Achievement, ActivityType, CompletedActivity, NewActivity, UserStats, WeeklyActivity,
};
use crate::time_utils::format_utc_rfc3339;
use crate::tracking::distance::{encode_route_polyline, route_to_geojson};
use crate::tracking::pace::{format_duration, format_pace};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Activity API routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", post(create_activity))
        .route("/api/users/{user_id}/activities", get(list_activities))
        .route("/api/users/{user_id}/activities/{id}", get(get_activity))
        .route(
            "/api/users/{user_id}/activities/{id}/route",
            get(get_activity_route),
        )
        .route("/api/users/{user_id}/stats", get(get_stats))
}

// ─── Activities ──────────────────────────────────────────────

/// Store a completed activity.
async fn create_activity(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<NewActivity>, JsonRejection>,
) -> Result<(StatusCode, Json<CompletedActivity>)> {
    let Json(activity) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    tracing::debug!(
        user_id = activity.user_id,
        points = activity.route.len(),
        "Creating activity"
    );

    let stored = state.store.insert(activity)?;
    Ok((StatusCode::CREATED, Json(stored)))
}

#[derive(Serialize, Clone, Debug)]
pub struct ActivitySummary {
    pub id: u64,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub title: String,
    pub date: String,
    pub distance_km: f64,
    pub duration_sec: i64,
    pub duration: String,
    pub average_pace_sec_per_km: f64,
    pub pace: String,
    /// Encoded route (precision 5)
    pub polyline: String,
}

impl ActivitySummary {
    fn from_activity(activity: &CompletedActivity) -> Result<Self> {
        let polyline = encode_route_polyline(&activity.route)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
        Ok(Self {
            id: activity.id,
            activity_type: activity.activity_type,
            title: activity.title.clone(),
            date: format_utc_rfc3339(activity.date),
            distance_km: activity.distance_km,
            duration_sec: activity.duration_sec,
            duration: format_duration(activity.duration_sec),
            average_pace_sec_per_km: activity.average_pace_sec_per_km,
            pace: format_pace(activity.average_pace_sec_per_km),
            polyline,
        })
    }
}

/// List a user's activities, newest first.
async fn list_activities(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<u64>,
) -> Result<Json<Vec<ActivitySummary>>> {
    let summaries = state
        .store
        .list_for_user(user_id)
        .iter()
        .map(ActivitySummary::from_activity)
        .collect::<Result<Vec<_>>>()?;
    Ok(Json(summaries))
}

fn find_activity(state: &AppState, user_id: u64, id: u64) -> Result<CompletedActivity> {
    state
        .store
        .get(user_id, id)
        .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", id)))
}

/// Get one activity with its full route.
async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path((user_id, id)): Path<(u64, u64)>,
) -> Result<Json<CompletedActivity>> {
    find_activity(&state, user_id, id).map(Json)
}

/// Route of one activity as a GeoJSON feature, for map display.
async fn get_activity_route(
    State(state): State<Arc<AppState>>,
    Path((user_id, id)): Path<(u64, u64)>,
) -> Result<Json<geojson::Feature>> {
    let activity = find_activity(&state, user_id, id)?;
    let mut feature = route_to_geojson(&activity.route);
    feature.set_property("title", activity.title);
    feature.set_property("type", activity.activity_type.as_str());
    Ok(Json(feature))
}

// ─── Stats ───────────────────────────────────────────────────

#[derive(Serialize, Debug)]
pub struct TypeStats {
    pub count: u32,
    pub distance_km: f64,
    pub duration_sec: i64,
    pub average_pace_sec_per_km: f64,
}

#[derive(Serialize, Debug)]
pub struct StatsResponse {
    pub total_activities: u32,
    pub total_distance_km: f64,
    pub total_duration_sec: i64,
    pub running: TypeStats,
    pub walking: TypeStats,
    pub weekly_activity: Vec<WeeklyActivity>,
    pub achievements: Vec<Achievement>,
}

fn type_stats(stats: &UserStats, kind: ActivityType) -> TypeStats {
    TypeStats {
        count: stats.activities_by_type.get(&kind).copied().unwrap_or(0),
        distance_km: stats.distance_by_type.get(&kind).copied().unwrap_or(0.0),
        duration_sec: stats.duration_by_type.get(&kind).copied().unwrap_or(0),
        average_pace_sec_per_km: stats.average_pace(kind),
    }
}

/// Totals, per-type breakdown, this week's activity and achievements.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<u64>,
) -> Result<Json<StatsResponse>> {
    let stats = state.store.user_stats(user_id);
    let activities = state.store.list_for_user(user_id);

    Ok(Json(StatsResponse {
        total_activities: stats.total_activities,
        total_distance_km: stats.total_distance_km,
        total_duration_sec: stats.total_duration_sec,
        running: type_stats(&stats, ActivityType::Running),
        walking: type_stats(&stats, ActivityType::Walking),
        weekly_activity: weekly_activity(&activities, chrono::Utc::now()),
        achievements: stats.achievements(),
    }))
}
