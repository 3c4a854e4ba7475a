//! User statistics aggregates for dashboard queries.
//!
//! Aggregates are updated as each activity is stored, so reading the
//! dashboard does not scan the user's whole history.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{ActivityType, CompletedActivity};
use crate::time_utils::utc_day_key;
use crate::tracking::pace::{format_pace, pace_sec_per_km};

const DAY_LABELS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

/// Pre-computed statistics for a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserStats {
    // ─── Totals ──────────────────────────────────────────────────
    #[serde(default)]
    pub total_activities: u32,
    #[serde(default)]
    pub total_distance_km: f64,
    #[serde(default)]
    pub total_duration_sec: i64,

    // ─── By Activity Type ────────────────────────────────────────
    #[serde(default)]
    pub activities_by_type: HashMap<ActivityType, u32>,
    #[serde(default)]
    pub distance_by_type: HashMap<ActivityType, f64>,
    #[serde(default)]
    pub duration_by_type: HashMap<ActivityType, i64>,

    // ─── Time Series ─────────────────────────────────────────────
    /// Distance per calendar day ("YYYY-MM-DD", UTC)
    #[serde(default)]
    pub distance_by_day: BTreeMap<String, f64>,

    // ─── Records ─────────────────────────────────────────────────
    #[serde(default)]
    pub longest_run: Option<Highlight>,
    /// Lowest running pace (s/km); zero paces are not records
    #[serde(default)]
    pub fastest_run_pace: Option<Highlight>,

    // ─── Idempotency ─────────────────────────────────────────────
    #[serde(default)]
    pub processed_activity_ids: HashSet<u64>,

    #[serde(default)]
    pub updated_at: String,
}

/// A record-setting activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub activity_id: u64,
    pub value: f64,
    pub date: DateTime<Utc>,
}

impl UserStats {
    /// Update stats with a new activity.
    ///
    /// Returns `false` without changes if the activity was already counted.
    pub fn update_from_activity(&mut self, activity: &CompletedActivity, now: &str) -> bool {
        if !self.processed_activity_ids.insert(activity.id) {
            return false;
        }
        self.updated_at = now.to_string();

        self.total_activities += 1;
        self.total_distance_km += activity.distance_km;
        self.total_duration_sec += activity.duration_sec;

        let kind = activity.activity_type;
        *self.activities_by_type.entry(kind).or_insert(0) += 1;
        *self.distance_by_type.entry(kind).or_insert(0.0) += activity.distance_km;
        *self.duration_by_type.entry(kind).or_insert(0) += activity.duration_sec;

        *self
            .distance_by_day
            .entry(utc_day_key(activity.date))
            .or_insert(0.0) += activity.distance_km;

        if kind == ActivityType::Running {
            let highlight = Highlight {
                activity_id: activity.id,
                value: activity.distance_km,
                date: activity.date,
            };
            if self
                .longest_run
                .as_ref()
                .is_none_or(|best| activity.distance_km > best.value)
            {
                self.longest_run = Some(highlight);
            }

            let pace = activity.average_pace_sec_per_km;
            if pace > 0.0
                && self
                    .fastest_run_pace
                    .as_ref()
                    .is_none_or(|best| pace < best.value)
            {
                self.fastest_run_pace = Some(Highlight {
                    activity_id: activity.id,
                    value: pace,
                    date: activity.date,
                });
            }
        }

        true
    }

    /// Aggregate pace for one activity type (total time over total distance).
    pub fn average_pace(&self, kind: ActivityType) -> f64 {
        pace_sec_per_km(
            self.distance_by_type.get(&kind).copied().unwrap_or(0.0),
            self.duration_by_type.get(&kind).copied().unwrap_or(0),
        )
    }

    /// Milestones derived from the aggregate.
    pub fn achievements(&self) -> Vec<Achievement> {
        let mut achievements = Vec::new();

        if let Some(run) = &self.longest_run {
            achievements.push(Achievement {
                kind: "longest_run".to_string(),
                title: "Longest Run".to_string(),
                description: format!("{:.1}km on {}", run.value, run.date.format("%Y-%m-%d")),
                date: run.date,
            });
        }

        if let Some(fastest) = &self.fastest_run_pace {
            achievements.push(Achievement {
                kind: "fastest_pace".to_string(),
                title: "Fastest Pace".to_string(),
                description: format!(
                    "{} on {}",
                    format_pace(fastest.value),
                    fastest.date.format("%Y-%m-%d")
                ),
                date: fastest.date,
            });
        }

        // Earliest day wins ties.
        let mut most_active: Option<(&String, f64)> = None;
        for (day, distance) in &self.distance_by_day {
            if *distance > most_active.map_or(0.0, |(_, best)| best) {
                most_active = Some((day, *distance));
            }
        }
        if let Some((day, _)) = most_active {
            if let Ok(date) = NaiveDate::parse_from_str(day, "%Y-%m-%d") {
                if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                    achievements.push(Achievement {
                        kind: "most_active_day".to_string(),
                        title: "Most Active Day".to_string(),
                        description: date.format("%A, %Y-%m-%d").to_string(),
                        date: midnight.and_utc(),
                    });
                }
            }
        }

        achievements
    }
}

/// A user milestone for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub kind: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
}

/// Distance per activity type for one day of the current week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyActivity {
    pub day: String,
    pub running: f64,
    pub walking: f64,
}

/// Per-day distances for the week (starting Sunday) containing `today`,
/// counting activities up to `today` inclusive.
pub fn weekly_activity(activities: &[CompletedActivity], today: DateTime<Utc>) -> Vec<WeeklyActivity> {
    let mut week: Vec<WeeklyActivity> = DAY_LABELS
        .iter()
        .map(|day| WeeklyActivity {
            day: day.to_string(),
            running: 0.0,
            walking: 0.0,
        })
        .collect();

    let today_date = today.date_naive();
    let week_start =
        today_date - Duration::days(i64::from(today_date.weekday().num_days_from_sunday()));

    for activity in activities {
        let date = activity.date.date_naive();
        if date < week_start || activity.date > today {
            continue;
        }
        let slot = &mut week[date.weekday().num_days_from_sunday() as usize];
        match activity.activity_type {
            ActivityType::Running => slot.running += activity.distance_km,
            ActivityType::Walking => slot.walking += activity.distance_km,
        }
    }

    week
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;

    fn make_activity(
        id: u64,
        kind: ActivityType,
        date: &str,
        distance_km: f64,
        duration_sec: i64,
    ) -> CompletedActivity {
        CompletedActivity {
            id,
            user_id: 12345,
            activity_type: kind,
            title: format!("Test Activity {}", id),
            distance_km,
            duration_sec,
            date: DateTime::parse_from_rfc3339(date).unwrap().with_timezone(&Utc),
            route: vec![
                GeoPoint::new(37.0, -122.0, 0).unwrap(),
                GeoPoint::new(37.01, -122.0, 1).unwrap(),
            ],
            average_pace_sec_per_km: pace_sec_per_km(distance_km, duration_sec),
        }
    }

    #[test]
    fn test_update_from_activity_basic() {
        let mut stats = UserStats::default();
        let activity = make_activity(1, ActivityType::Running, "2024-01-15T10:00:00Z", 5.0, 1500);

        assert!(stats.update_from_activity(&activity, "2024-01-15T12:00:00Z"));
        assert_eq!(stats.total_activities, 1);
        assert_eq!(stats.total_distance_km, 5.0);
        assert_eq!(stats.total_duration_sec, 1500);
        assert_eq!(stats.activities_by_type.get(&ActivityType::Running), Some(&1));
        assert_eq!(stats.distance_by_day.get("2024-01-15"), Some(&5.0));
        assert_eq!(stats.average_pace(ActivityType::Running), 300.0);
        assert_eq!(stats.average_pace(ActivityType::Walking), 0.0);
    }

    #[test]
    fn test_idempotency_skips_duplicate() {
        let mut stats = UserStats::default();
        let activity = make_activity(1, ActivityType::Walking, "2024-01-15T10:00:00Z", 2.0, 1200);

        stats.update_from_activity(&activity, "2024-01-15T12:00:00Z");
        assert!(!stats.update_from_activity(&activity, "2024-01-15T13:00:00Z"));
        assert_eq!(stats.total_activities, 1);
        assert_eq!(stats.updated_at, "2024-01-15T12:00:00Z");
    }

    #[test]
    fn test_average_pace_is_aggregate() {
        let mut stats = UserStats::default();
        stats.update_from_activity(
            &make_activity(1, ActivityType::Running, "2024-01-15T10:00:00Z", 10.0, 3000),
            "now",
        );
        stats.update_from_activity(
            &make_activity(2, ActivityType::Running, "2024-01-16T10:00:00Z", 5.0, 1800),
            "now",
        );
        // (3000 + 1800) / 15
        assert_eq!(stats.average_pace(ActivityType::Running), 320.0);
    }

    #[test]
    fn test_records_track_running_only() {
        let mut stats = UserStats::default();
        stats.update_from_activity(
            &make_activity(1, ActivityType::Running, "2024-01-10T10:00:00Z", 5.0, 1500),
            "now",
        );
        stats.update_from_activity(
            &make_activity(2, ActivityType::Running, "2024-01-12T10:00:00Z", 8.0, 2800),
            "now",
        );
        stats.update_from_activity(
            &make_activity(3, ActivityType::Walking, "2024-01-13T10:00:00Z", 20.0, 14400),
            "now",
        );

        assert_eq!(stats.longest_run.as_ref().map(|h| h.activity_id), Some(2));
        // 300 s/km beats 350 s/km
        assert_eq!(stats.fastest_run_pace.as_ref().map(|h| h.activity_id), Some(1));
    }

    #[test]
    fn test_achievements() {
        let mut stats = UserStats::default();
        assert!(stats.achievements().is_empty());

        stats.update_from_activity(
            &make_activity(1, ActivityType::Running, "2024-01-10T10:00:00Z", 5.0, 1500),
            "now",
        );
        stats.update_from_activity(
            &make_activity(2, ActivityType::Walking, "2024-01-11T10:00:00Z", 3.0, 1800),
            "now",
        );
        stats.update_from_activity(
            &make_activity(3, ActivityType::Walking, "2024-01-11T18:00:00Z", 3.0, 1800),
            "now",
        );

        let achievements = stats.achievements();
        let kinds: Vec<&str> = achievements.iter().map(|a| a.kind.as_str()).collect();
        assert_eq!(kinds, vec!["longest_run", "fastest_pace", "most_active_day"]);
        assert_eq!(achievements[0].description, "5.0km on 2024-01-10");
        assert_eq!(achievements[1].description, "5'00\"/km on 2024-01-10");
        assert_eq!(achievements[2].description, "Thursday, 2024-01-11");
    }

    #[test]
    fn test_weekly_activity_current_week_only() {
        // 2024-01-17 is a Wednesday; the week starts Sunday 2024-01-14.
        let today = DateTime::parse_from_rfc3339("2024-01-17T20:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let activities = vec![
            make_activity(1, ActivityType::Running, "2024-01-13T10:00:00Z", 9.0, 2700),
            make_activity(2, ActivityType::Running, "2024-01-14T10:00:00Z", 5.0, 1500),
            make_activity(3, ActivityType::Walking, "2024-01-16T10:00:00Z", 2.0, 1200),
            make_activity(4, ActivityType::Running, "2024-01-16T18:00:00Z", 3.0, 900),
            make_activity(5, ActivityType::Running, "2024-01-18T10:00:00Z", 7.0, 2100),
        ];

        let week = weekly_activity(&activities, today);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].day, "S");
        assert_eq!(week[0].running, 5.0);
        assert_eq!(week[2].running, 3.0);
        assert_eq!(week[2].walking, 2.0);
        assert_eq!(week[4].running, 0.0);
        assert_eq!(week[6].running, 0.0);
    }
}
