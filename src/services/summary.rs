// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Year-level summary statistics for the story dashboard.
//!
//! Computed fresh from the Firestore snapshot on every request; nothing
//! here caches or mutates. Totals, heatmap and longest-run selection are
//! independent of the best-effort logic but consume the same activity set.

use chrono::Datelike;
use serde::Serialize;
use std::collections::HashMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{Activity, DistanceTarget};
use crate::services::efforts::{compute_best_efforts, EffortAliases, TargetConfigError};
use crate::time_utils::format_display_date;

/// Lower bound of the heatmap intensity band for active months. Keeps a
/// one-run month visually distinguishable from an empty month.
const HEATMAP_FLOOR: f64 = 0.1;

/// Assembled yearly statistics, serialized into the dashboard response.
///
/// Field names go over the wire in camelCase ("totalDistance",
/// "bestEfforts", ...), matching what the story frontend consumes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct YearStats {
    pub year: i32,
    /// Total run distance in km, thousands-separated, no decimals
    pub total_distance: String,
    pub distance_unit: String,
    pub total_activities: u32,
    /// Total moving time as "Xh Ym" (hour field kept even when zero)
    pub total_time: String,
    pub longest_run: LongestRun,
    /// Activity intensity per calendar month, each value in [0, 1]
    pub heatmap: Vec<f64>,
    /// Formatted best effort (or "-") per configured target id
    pub best_efforts: HashMap<String, String>,
}

/// The single longest run of the year, for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LongestRun {
    pub distance: String,
    pub date: String,
}

impl LongestRun {
    /// Placeholder shown when the year has no qualifying runs.
    fn placeholder() -> Self {
        Self {
            distance: "0 km".to_string(),
            date: "-".to_string(),
        }
    }
}

/// Compute the full yearly summary over an activity snapshot.
///
/// The caller restricts the set to one year; run filtering and
/// malformed-record exclusion happen here. An empty snapshot yields a
/// complete zeroed structure, never an error.
pub fn compute_year_stats(
    year: i32,
    activities: &[Activity],
    targets: &[DistanceTarget],
    aliases: &EffortAliases,
) -> Result<YearStats, TargetConfigError> {
    let best_efforts = compute_best_efforts(activities, targets, aliases)?;

    let runs: Vec<&Activity> = activities.iter().filter(|a| a.is_qualifying_run()).collect();

    let total_distance_meters: f64 = runs.iter().map(|a| a.distance_meters).sum();
    let total_moving_seconds: f64 = runs.iter().map(|a| a.moving_time_seconds).sum();

    Ok(YearStats {
        year,
        total_distance: format_total_distance_km(total_distance_meters),
        distance_unit: "km".to_string(),
        total_activities: runs.len() as u32,
        total_time: format_total_duration(total_moving_seconds),
        longest_run: longest_run(&runs),
        heatmap: monthly_heatmap(&runs).to_vec(),
        best_efforts,
    })
}

/// Count qualifying runs per calendar month and compress the counts into
/// the [0.1, 1.0] intensity band.
///
/// Zero-activity months stay at 0; active months map to
/// `0.1 + (count / max_count) * 0.9` so the busiest month hits 1.0 and no
/// active month is nearly invisible. `max_count` is floored at 1.
pub fn monthly_heatmap(runs: &[&Activity]) -> [f64; 12] {
    let mut counts = [0u32; 12];
    for activity in runs {
        counts[activity.start_date.month0() as usize] += 1;
    }

    let max_count = counts.iter().copied().max().unwrap_or(0).max(1);

    counts.map(|count| {
        if count == 0 {
            0.0
        } else {
            HEATMAP_FLOOR + (count as f64 / max_count as f64) * (1.0 - HEATMAP_FLOOR)
        }
    })
}

/// Pick the run with the greatest distance.
///
/// Ties keep the first-encountered activity; the store query returns
/// activities sorted by start date descending, so that choice is stable.
fn longest_run(runs: &[&Activity]) -> LongestRun {
    let mut longest: Option<&Activity> = None;
    for activity in runs {
        if longest.is_none_or(|l| activity.distance_meters > l.distance_meters) {
            longest = Some(activity);
        }
    }

    match longest {
        Some(activity) => LongestRun {
            distance: format!("{:.1} km", activity.distance_meters / 1000.0),
            date: format_display_date(activity.start_date),
        },
        None => LongestRun::placeholder(),
    }
}

/// Total-time formatter: `"Xh Ym"`, hour field always present.
///
/// Deliberately distinct from the best-effort formatter, which drops the
/// hour field entirely below one hour. The two are not interchangeable.
pub fn format_total_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    format!("{}h {}m", h, m)
}

/// Sum of run distances in km, rounded to whole units, thousands-grouped
/// for display ("1,204").
fn format_total_distance_km(total_meters: f64) -> String {
    group_thousands((total_meters / 1000.0).round() as u64)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
