// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{DistanceTarget, Preferences};
use crate::services::efforts::EffortAliases;
use crate::services::summary::{compute_year_stats, YearStats};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Number of recent runs echoed alongside the stats payload.
const RECENT_ACTIVITY_LIMIT: usize = 10;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/preferences", patch(update_preferences))
        .route("/api/activities", get(get_activities))
        .route("/api/activities/sync", post(sync_activities))
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub athlete_id: u64,
    pub name: String,
    pub firstname: String,
    pub lastname: String,
    pub profile_picture: Option<String>,
    pub preferences: Preferences,
}

/// Get current user profile and story preferences.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let profile = state
        .db
        .get_user(user.athlete_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.athlete_id)))?;

    let preferences = state
        .db
        .get_preferences(user.athlete_id)
        .await?
        .unwrap_or_default();

    Ok(Json(UserResponse {
        athlete_id: profile.strava_athlete_id,
        name: profile.display_name(),
        firstname: profile.firstname,
        lastname: profile.lastname,
        profile_picture: profile.profile_picture,
        preferences,
    }))
}

// ─── Preferences ─────────────────────────────────────────────

/// Partial preferences update; omitted fields keep their stored values.
#[derive(Deserialize, Validate)]
pub struct PreferencesUpdate {
    pub theme: Option<String>,
    pub layout: Option<String>,
    #[validate(nested)]
    pub best_effort_distances: Option<Vec<DistanceTarget>>,
}

/// Response for a preferences update.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PreferencesResponse {
    pub success: bool,
    pub preferences: Preferences,
}

/// Update story preferences (theme, layout, best-effort distances).
async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(update): Json<PreferencesUpdate>,
) -> Result<Json<PreferencesResponse>> {
    update.validate()?;

    if let Some(targets) = &update.best_effort_distances {
        let mut seen = HashSet::new();
        for target in targets {
            if !seen.insert(target.id.as_str()) {
                return Err(AppError::BadRequest(format!(
                    "Duplicate distance target id '{}'",
                    target.id
                )));
            }
        }
    }

    let mut preferences = state
        .db
        .get_preferences(user.athlete_id)
        .await?
        .unwrap_or_default();

    if let Some(theme) = update.theme {
        preferences.theme = theme;
    }
    if let Some(layout) = update.layout {
        preferences.layout = layout;
    }
    if let Some(targets) = update.best_effort_distances {
        preferences.best_effort_distances = targets;
    }

    state
        .db
        .set_preferences(user.athlete_id, &preferences)
        .await?;

    tracing::info!(athlete_id = user.athlete_id, "Preferences updated");

    Ok(Json(PreferencesResponse {
        success: true,
        preferences,
    }))
}

// ─── Activities & Stats ──────────────────────────────────────

/// Dashboard payload: the year's stats plus the most recent runs.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivitiesResponse {
    pub activities: Vec<ActivitySummary>,
    pub stats: YearStats,
}

#[derive(Serialize, Clone, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivitySummary {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub name: String,
    pub activity_type: String,
    pub distance_meters: f64,
    pub moving_time_seconds: f64,
    pub start_date: String,
}

/// Get the yearly story stats for the current user.
///
/// Recomputed from the stored snapshot on every request; identical
/// snapshots always produce identical output.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ActivitiesResponse>> {
    let activities = state.db.get_activities_for_athlete(user.athlete_id).await?;

    let preferences = state
        .db
        .get_preferences(user.athlete_id)
        .await?
        .unwrap_or_default();

    tracing::debug!(
        athlete_id = user.athlete_id,
        activity_count = activities.len(),
        target_count = preferences.best_effort_distances.len(),
        "Computing year stats"
    );

    let stats = compute_year_stats(
        state.config.story_year,
        &activities,
        &preferences.best_effort_distances,
        &EffortAliases::default(),
    )
    .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let recent: Vec<ActivitySummary> = activities
        .iter()
        .filter(|a| a.is_qualifying_run())
        .take(RECENT_ACTIVITY_LIMIT)
        .map(|a| ActivitySummary {
            id: a.strava_activity_id,
            name: a.name.clone(),
            activity_type: a.activity_type.clone(),
            distance_meters: a.distance_meters,
            moving_time_seconds: a.moving_time_seconds,
            start_date: format_utc_rfc3339(a.start_date),
        })
        .collect();

    Ok(Json(ActivitiesResponse {
        activities: recent,
        stats,
    }))
}

// ─── Sync ────────────────────────────────────────────────────

/// Response for an activity sync.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SyncResponse {
    pub success: bool,
    pub count: u32,
}

/// Pull the story year's activities from Strava into Firestore.
async fn sync_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SyncResponse>> {
    let count = state
        .strava_service
        .sync_year(user.athlete_id, state.config.story_year)
        .await?;

    Ok(Json(SyncResponse {
        success: true,
        count,
    }))
}
