// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user story preferences, including the configurable list of
//! best-effort target distances.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// A user-configurable best-effort target distance.
///
/// `id` is the stable key used in the best-efforts output map; `name` is
/// the display label matched (case-insensitively) against Strava's native
/// split names. Duplicate `meters` across different ids are tolerated.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DistanceTarget {
    #[validate(length(min = 1, message = "target id must not be empty"))]
    pub id: String,
    #[validate(length(min = 1, message = "target name must not be empty"))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0, message = "target meters must be positive"))]
    pub meters: f64,
}

impl DistanceTarget {
    pub fn new(id: &str, name: &str, meters: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            meters,
        }
    }
}

/// Story preferences stored in Firestore, one document per athlete.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Preferences {
    /// Color theme id ("dark", "light", "midnight", "forest", "sunset")
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Story layout id ("default", "compact", "minimal")
    #[serde(default = "default_layout")]
    pub layout: String,
    /// Target distances for the personal-record panel
    #[validate(nested)]
    #[serde(default = "default_distance_targets")]
    pub best_effort_distances: Vec<DistanceTarget>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            layout: default_layout(),
            best_effort_distances: default_distance_targets(),
        }
    }
}

fn default_theme() -> String {
    "dark".to_string()
}

fn default_layout() -> String {
    "default".to_string()
}

/// The built-in target distances shown to users who have not customized
/// their record panel. Half/full marathon meters follow the official
/// race distances.
pub fn default_distance_targets() -> Vec<DistanceTarget> {
    vec![
        DistanceTarget::new("pb5k", "5k", 5000.0),
        DistanceTarget::new("pb10k", "10k", 10000.0),
        DistanceTarget::new("pbHalf", "Half-Marathon", 21097.5),
        DistanceTarget::new("pbFull", "Marathon", 42195.0),
    ]
}
