// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Personal-record ("best effort") computation.
//!
//! For every configured target distance we reduce the year's runs to the
//! fastest known duration, drawing on two sources per activity:
//! - native splits reported by Strava in the raw payload, matched by
//!   label (case-insensitive) or via the alias table;
//! - a uniform-pace estimate, whenever the run is at least as long as the
//!   target distance.
//!
//! The per-activity candidate for a target is the minimum of the two, so a
//! genuinely faster native split is never shadowed by a looser estimate,
//! and runs without native splits still contribute. The fold over
//! activities is commutative and associative; input order never affects
//! the result.

use std::collections::HashMap;

use crate::models::{Activity, DistanceTarget};

/// Sentinel rendered for a target with no qualifying candidate.
pub const NO_DATA: &str = "-";

/// Invalid target configuration, rejected before any computation begins.
#[derive(Debug, thiserror::Error)]
pub enum TargetConfigError {
    #[error("distance target '{id}' has non-positive meters")]
    NonPositiveMeters { id: String },
}

/// Accepted native split labels per target id, all lowercase.
///
/// Strava names the two marathon distances differently from our built-in
/// display labels ("Half Marathon" vs "Half-Marathon"), so exact matching
/// alone would miss them. The table is injected as data rather than
/// hard-coded so new provider label variants don't require code changes.
#[derive(Debug, Clone)]
pub struct EffortAliases {
    by_target: HashMap<String, Vec<String>>,
}

impl EffortAliases {
    pub fn new(by_target: HashMap<String, Vec<String>>) -> Self {
        Self { by_target }
    }

    /// Whether `native_name_lower` is an accepted alias for the target.
    pub fn accepts(&self, target_id: &str, native_name_lower: &str) -> bool {
        self.by_target
            .get(target_id)
            .is_some_and(|names| names.iter().any(|n| n == native_name_lower))
    }
}

impl Default for EffortAliases {
    /// Aliases for the two Strava labels that differ from ours.
    fn default() -> Self {
        let mut by_target = HashMap::new();
        by_target.insert("pbHalf".to_string(), vec!["half marathon".to_string()]);
        by_target.insert("pbFull".to_string(), vec!["marathon".to_string()]);
        Self { by_target }
    }
}

/// One per-activity-per-target duration observation. Ephemeral; only the
/// minimum per target survives the fold.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EffortCandidate {
    pub target_index: usize,
    pub duration_seconds: f64,
}

/// Reject targets with non-positive (or non-finite) distances.
///
/// This is a caller-configuration error and is checked once up front, not
/// defended against per candidate.
pub fn validate_targets(targets: &[DistanceTarget]) -> Result<(), TargetConfigError> {
    for target in targets {
        if !(target.meters.is_finite() && target.meters > 0.0) {
            return Err(TargetConfigError::NonPositiveMeters {
                id: target.id.clone(),
            });
        }
    }
    Ok(())
}

/// Extract the best available duration per target from one activity.
///
/// Returns at most one candidate per target; nothing if neither a native
/// match nor the distance threshold applies. Targets must already be
/// validated.
pub(crate) fn extract_candidates(
    activity: &Activity,
    targets: &[DistanceTarget],
    aliases: &EffortAliases,
) -> Vec<EffortCandidate> {
    let mut candidates = Vec::new();

    for (target_index, target) in targets.iter().enumerate() {
        let target_name_lower = target.name.to_lowercase();

        // Native splits: label equality or alias hit; min over duplicates.
        let native: Option<f64> = activity
            .native_efforts
            .iter()
            .filter(|effort| {
                effort.moving_time_seconds.is_finite() && effort.moving_time_seconds >= 0.0
            })
            .filter(|effort| {
                let name_lower = effort.name.to_lowercase();
                name_lower == target_name_lower || aliases.accepts(&target.id, &name_lower)
            })
            .map(|effort| effort.moving_time_seconds)
            .fold(None, |best, d| Some(best.map_or(d, |b: f64| b.min(d))));

        // Uniform-pace estimate, for any run at least as long as the target
        // (inclusive: a run of exactly the target distance qualifies).
        let estimated = (activity.distance_meters >= target.meters)
            .then(|| activity.moving_time_seconds * (target.meters / activity.distance_meters));

        let duration = match (native, estimated) {
            (Some(n), Some(e)) => Some(n.min(e)),
            (Some(n), None) => Some(n),
            (None, Some(e)) => Some(e),
            (None, None) => None,
        };

        if let Some(duration_seconds) = duration {
            candidates.push(EffortCandidate {
                target_index,
                duration_seconds,
            });
        }
    }

    candidates
}

/// Reduce all qualifying runs to one formatted best effort per target.
///
/// The output map has exactly one entry per configured target id,
/// regardless of data availability; targets nothing satisfied map to
/// [`NO_DATA`]. An empty activity list is not an error.
pub fn compute_best_efforts(
    activities: &[Activity],
    targets: &[DistanceTarget],
    aliases: &EffortAliases,
) -> Result<HashMap<String, String>, TargetConfigError> {
    validate_targets(targets)?;

    let mut best: Vec<Option<f64>> = vec![None; targets.len()];

    for activity in activities.iter().filter(|a| a.is_qualifying_run()) {
        for candidate in extract_candidates(activity, targets, aliases) {
            let slot = &mut best[candidate.target_index];
            *slot = Some(match *slot {
                Some(current) => current.min(candidate.duration_seconds),
                None => candidate.duration_seconds,
            });
        }
    }

    Ok(targets
        .iter()
        .zip(best)
        .map(|(target, duration)| {
            let formatted = duration.map_or_else(|| NO_DATA.to_string(), format_effort_duration);
            (target.id.clone(), formatted)
        })
        .collect())
}

/// Canonical best-effort duration formatter.
///
/// Durations of an hour or more render as `H:MM:SS`; shorter ones as
/// `M:SS` with unpadded minutes. Rounded to the nearest whole second
/// before splitting, so 3599.7 s renders as `1:00:00`, not `59:60`.
///
/// Not interchangeable with the total-time formatter in the summary
/// module, which keeps a zero hour field.
pub fn format_effort_duration(seconds: f64) -> String {
    let total = seconds.round() as u64;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;

    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}
