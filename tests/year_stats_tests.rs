// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Year summary tests over the public API.
//!
//! Exercises the complete dashboard payload: totals, heatmap
//! normalization, longest-run selection and the formatter split between
//! best efforts and total time.

use chrono::{TimeZone, Utc};
use runstory::models::{default_distance_targets, Activity};
use runstory::services::efforts::EffortAliases;
use runstory::services::summary::compute_year_stats;

fn run_on(id: u64, month: u32, day: u32, distance_meters: f64, moving_time_seconds: f64) -> Activity {
    Activity {
        strava_activity_id: id,
        athlete_id: 42,
        name: format!("Run {}", id),
        activity_type: "Run".to_string(),
        distance_meters,
        moving_time_seconds,
        elapsed_time_seconds: moving_time_seconds,
        start_date: Utc.with_ymd_and_hms(2025, month, day, 7, 0, 0).unwrap(),
        native_efforts: vec![],
        synced_at: "2025-12-31T00:00:00Z".to_string(),
    }
}

#[test]
fn test_full_payload_for_a_small_year() {
    let activities = vec![
        run_on(1, 1, 5, 5000.0, 1500.0),
        run_on(2, 1, 19, 8000.0, 2500.0),
        run_on(3, 3, 2, 10000.0, 3100.0),
        run_on(4, 3, 9, 21100.0, 6800.0),
        run_on(5, 3, 30, 5000.0, 1200.0),
        run_on(6, 6, 14, 12000.0, 3900.0),
    ];

    let stats = compute_year_stats(
        2025,
        &activities,
        &default_distance_targets(),
        &EffortAliases::default(),
    )
    .unwrap();

    assert_eq!(stats.year, 2025);
    assert_eq!(stats.total_activities, 6);
    // 61.1 km total, rounded to whole km
    assert_eq!(stats.total_distance, "61");
    assert_eq!(stats.distance_unit, "km");
    // 19000 s = 5h 16m 40s -> "5h 16m"
    assert_eq!(stats.total_time, "5h 16m");
    assert_eq!(stats.longest_run.distance, "21.1 km");
    assert_eq!(stats.longest_run.date, "Mar 9, 2025");
    // Fastest 5 km: run 5 at 1200 s
    assert_eq!(stats.best_efforts["pb5k"], "20:00");
    assert_eq!(stats.best_efforts["pbFull"], "-");
}

#[test]
fn test_heatmap_exact_normalization() {
    // Months (0-based) [0, 0, 2, 2, 2, 5]: Jan x2, Mar x3, Jun x1; max 3
    let activities = vec![
        run_on(1, 1, 3, 5000.0, 1500.0),
        run_on(2, 1, 10, 5000.0, 1500.0),
        run_on(3, 3, 4, 5000.0, 1500.0),
        run_on(4, 3, 11, 5000.0, 1500.0),
        run_on(5, 3, 18, 5000.0, 1500.0),
        run_on(6, 6, 21, 5000.0, 1500.0),
    ];

    let stats = compute_year_stats(
        2025,
        &activities,
        &default_distance_targets(),
        &EffortAliases::default(),
    )
    .unwrap();

    let expected = [
        0.1 + (2.0 / 3.0) * 0.9, // January: 0.7
        0.0,
        1.0, // March: 0.1 + (3/3) * 0.9
        0.0,
        0.0,
        0.1 + (1.0 / 3.0) * 0.9, // June: 0.4
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
    ];

    assert_eq!(stats.heatmap.len(), 12);
    for (month, (&actual, &wanted)) in stats.heatmap.iter().zip(expected.iter()).enumerate() {
        assert!(
            (actual - wanted).abs() < 1e-9,
            "month {}: expected {}, got {}",
            month,
            wanted,
            actual
        );
    }
}

#[test]
fn test_empty_year_never_fails() {
    let stats = compute_year_stats(
        2025,
        &[],
        &default_distance_targets(),
        &EffortAliases::default(),
    )
    .unwrap();

    assert_eq!(stats.total_distance, "0");
    assert_eq!(stats.total_activities, 0);
    assert_eq!(stats.total_time, "0h 0m");
    assert_eq!(stats.heatmap, vec![0.0; 12]);
    assert_eq!(stats.longest_run.distance, "0 km");
    assert_eq!(stats.longest_run.date, "-");
    assert_eq!(stats.best_efforts.len(), 4);
    assert!(stats.best_efforts.values().all(|v| v == "-"));
}

#[test]
fn test_empty_target_list_gives_empty_best_efforts_map() {
    let activities = vec![run_on(1, 2, 2, 5000.0, 1500.0)];
    let stats = compute_year_stats(2025, &activities, &[], &EffortAliases::default()).unwrap();

    assert!(stats.best_efforts.is_empty());
    // The rest of the payload is unaffected
    assert_eq!(stats.total_activities, 1);
}

#[test]
fn test_formatters_are_not_interchangeable() {
    // 34 minutes of running: total time keeps the zero hour field,
    // the best-effort rendering drops it.
    let activities = vec![run_on(1, 4, 12, 5000.0, 2040.0)];
    let stats = compute_year_stats(
        2025,
        &activities,
        &default_distance_targets(),
        &EffortAliases::default(),
    )
    .unwrap();

    assert_eq!(stats.total_time, "0h 34m");
    assert_eq!(stats.best_efforts["pb5k"], "34:00");
}

#[test]
fn test_rides_do_not_leak_into_run_stats() {
    let mut ride = run_on(1, 5, 5, 80000.0, 10000.0);
    ride.activity_type = "Ride".to_string();
    let activities = vec![ride, run_on(2, 5, 6, 5000.0, 1500.0)];

    let stats = compute_year_stats(
        2025,
        &activities,
        &default_distance_targets(),
        &EffortAliases::default(),
    )
    .unwrap();

    assert_eq!(stats.total_activities, 1);
    assert_eq!(stats.total_distance, "5");
    assert_eq!(stats.longest_run.distance, "5.0 km");
}
