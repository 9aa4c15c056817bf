// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava activity model for storage and stats computation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored activity record in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Strava activity ID (also used as document ID)
    pub strava_activity_id: u64,
    /// Strava athlete ID (owner)
    pub athlete_id: u64,
    /// Activity name/title
    pub name: String,
    /// Activity type ("Run", "Ride", ...); only "Run" feeds the story stats
    pub activity_type: String,
    /// Distance in meters
    pub distance_meters: f64,
    /// Moving time in seconds
    pub moving_time_seconds: f64,
    /// Elapsed time in seconds
    pub elapsed_time_seconds: f64,
    /// Start date/time
    pub start_date: DateTime<Utc>,
    /// Provider-reported record splits embedded in the raw payload
    #[serde(default)]
    pub native_efforts: Vec<NativeEffort>,
    /// When this activity was synced (ISO 8601)
    pub synced_at: String,
}

/// A provider-reported best-effort split ("5k", "Half Marathon", ...).
///
/// Names are free text and not guaranteed to match any configured label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeEffort {
    pub name: String,
    pub moving_time_seconds: f64,
}

impl Activity {
    /// Whether this activity counts toward the yearly run story.
    ///
    /// Only runs qualify, and a record with missing or nonsensical numeric
    /// fields is excluded from every aggregate rather than aborting the
    /// whole computation.
    pub fn is_qualifying_run(&self) -> bool {
        self.activity_type == "Run" && self.has_valid_metrics()
    }

    /// Distance and moving time must be finite and non-negative.
    pub fn has_valid_metrics(&self) -> bool {
        self.distance_meters.is_finite()
            && self.distance_meters >= 0.0
            && self.moving_time_seconds.is_finite()
            && self.moving_time_seconds >= 0.0
    }
}
