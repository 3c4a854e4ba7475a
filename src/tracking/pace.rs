// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pace derivation and display formatting.

/// Seconds per kilometer. Returns 0 when there is no distance yet.
pub fn pace_sec_per_km(distance_km: f64, duration_sec: i64) -> f64 {
    if distance_km <= 0.0 {
        return 0.0;
    }
    duration_sec as f64 / distance_km
}

/// Format a pace as `M'SS"/km`, or `-` when there is no pace.
pub fn format_pace(sec_per_km: f64) -> String {
    if !sec_per_km.is_finite() || sec_per_km <= 0.0 {
        return "-".to_string();
    }
    let whole = sec_per_km.floor() as u64;
    format!("{}'{:02}\"/km", whole / 60, whole % 60)
}

/// Format a duration as `M:SS`, or `H:MM:SS` from one hour up.
pub fn format_duration(duration_sec: i64) -> String {
    let total = duration_sec.max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Format a distance with one decimal and unit.
pub fn format_distance(distance_km: f64) -> String {
    format!("{:.1} km", distance_km)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pace_zero_distance_sentinel() {
        assert_eq!(pace_sec_per_km(0.0, 600), 0.0);
        assert_eq!(pace_sec_per_km(-1.0, 600), 0.0);
    }

    #[test]
    fn test_pace_basic() {
        assert_eq!(pace_sec_per_km(2.0, 600), 300.0);
        assert_eq!(pace_sec_per_km(1.2, 300), 250.0);
    }

    #[test]
    fn test_format_pace() {
        assert_eq!(format_pace(0.0), "-");
        assert_eq!(format_pace(300.0), "5'00\"/km");
        assert_eq!(format_pace(365.7), "6'05\"/km");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(75), "1:15");
        assert_eq!(format_duration(3_725), "1:02:05");
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(5.04), "5.0 km");
        assert_eq!(format_distance(0.0), "0.0 km");
    }
}
