// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod efforts;
pub mod strava;
pub mod summary;

pub use efforts::{compute_best_efforts, EffortAliases, TargetConfigError};
pub use strava::{OAuthResult, StravaService};
pub use summary::{compute_year_stats, LongestRun, YearStats};
