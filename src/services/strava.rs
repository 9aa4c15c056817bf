// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for OAuth and activity syncing.
//!
//! Handles:
//! - OAuth code exchange
//! - Paginated activity listing for the story year
//! - Rate limit and auth error detection
//!
//! Tokens are used as issued; there is no refresh flow. When Strava
//! rejects a stored token the sync fails with a gateway error and the
//! user reconnects through the OAuth flow.

use crate::error::AppError;
use serde::Deserialize;

/// Activities fetched per page during sync (Strava maximum).
const SYNC_PER_PAGE: u32 = 200;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://www.strava.com/api/v3".to_string(),
            client_id,
            client_secret,
        }
    }

    /// Exchange an authorization code for tokens and the athlete profile.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenExchangeResponse, AppError> {
        let response = self
            .http
            .post("https://www.strava.com/oauth/token")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token exchange failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// List activities within a Unix-timestamp window (paginated).
    pub async fn list_activities(
        &self,
        access_token: &str,
        after: i64,
        before: i64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StravaActivitySummary>, AppError> {
        let url = format!("{}/athlete/activities", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("after", after.to_string()),
                ("before", before.to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Strava rate limit hit (429)");
                return Err(AppError::StravaApi("rate limited by Strava".to_string()));
            }

            if status.as_u16() == 401 {
                return Err(AppError::StravaApi(
                    "Strava token rejected; reconnect required".to_string(),
                ));
            }

            return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
    }
}

/// Token exchange response from Strava OAuth (includes athlete info).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchangeResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub athlete: StravaAthlete,
}

/// Athlete info from OAuth token exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaAthlete {
    pub id: u64,
    pub firstname: String,
    pub lastname: String,
    pub profile: Option<String>,
}

/// Summary activity from the list endpoint.
///
/// Every field Strava might omit is optional here; conversion to a stored
/// [`Activity`](crate::models::Activity) drops records whose required
/// numeric fields are missing, so one bad record never poisons a sync.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaActivitySummary {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub moving_time: Option<f64>,
    #[serde(default)]
    pub elapsed_time: Option<f64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub best_efforts: Option<Vec<StravaBestEffort>>,
}

/// Provider-reported record split in a raw activity payload.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaBestEffort {
    pub name: String,
    pub moving_time: f64,
}

impl StravaActivitySummary {
    /// Convert to a stored activity record.
    ///
    /// Returns `None` when required numeric fields or the start date are
    /// missing or unparseable; such malformed records are skipped.
    pub fn into_activity(
        self,
        athlete_id: u64,
        synced_at: &str,
    ) -> Option<crate::models::Activity> {
        let distance_meters = self.distance?;
        let moving_time_seconds = self.moving_time?;
        let start_date = chrono::DateTime::parse_from_rfc3339(self.start_date.as_deref()?)
            .ok()?
            .with_timezone(&chrono::Utc);

        let native_efforts = self
            .best_efforts
            .unwrap_or_default()
            .into_iter()
            .map(|e| crate::models::NativeEffort {
                name: e.name,
                moving_time_seconds: e.moving_time,
            })
            .collect();

        Some(crate::models::Activity {
            strava_activity_id: self.id,
            athlete_id,
            name: self.name.unwrap_or_default(),
            activity_type: self.activity_type.unwrap_or_default(),
            distance_meters,
            moving_time_seconds,
            elapsed_time_seconds: self.elapsed_time.unwrap_or(moving_time_seconds),
            start_date,
            native_efforts,
            synced_at: synced_at.to_string(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StravaService - High-level service combining the client with persistence
// ─────────────────────────────────────────────────────────────────────────────

use crate::db::FirestoreDb;
use crate::models::{Preferences, User, UserTokens};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared per-athlete sync locks for use in AppState.
pub type SyncLocks = Arc<DashMap<u64, Arc<Mutex<()>>>>;

/// High-level Strava service: OAuth callback handling and year syncing.
#[derive(Clone)]
pub struct StravaService {
    client: StravaClient,
    db: FirestoreDb,
    /// Per-athlete mutex so concurrent sync requests coalesce instead of
    /// hammering the Strava API twice for the same data.
    sync_locks: SyncLocks,
}

impl StravaService {
    pub fn new(client_id: String, client_secret: String, db: FirestoreDb) -> Self {
        Self {
            client: StravaClient::new(client_id, client_secret),
            db,
            sync_locks: Arc::new(DashMap::new()),
        }
    }

    // ─── OAuth Callback Handling ─────────────────────────────────

    /// Handle OAuth callback: exchange code for tokens, store user,
    /// tokens, and default preferences for first-time users.
    pub async fn handle_oauth_callback(&self, code: &str) -> Result<OAuthResult, AppError> {
        let token_response = self.client.exchange_code(code).await?;

        let athlete_id = token_response.athlete.id;
        let now = chrono::Utc::now().to_rfc3339();

        // Returning users keep their original created_at
        let created_at = match self.db.get_user(athlete_id).await {
            Ok(Some(existing)) => existing.created_at,
            _ => now.clone(),
        };

        let user = User {
            strava_athlete_id: athlete_id,
            firstname: token_response.athlete.firstname.clone(),
            lastname: token_response.athlete.lastname.clone(),
            profile_picture: token_response.athlete.profile.clone(),
            created_at,
            last_login: now.clone(),
        };
        self.db.upsert_user(&user).await?;

        let expires_at = chrono::DateTime::from_timestamp(token_response.expires_at, 0)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| now.clone());

        let tokens = UserTokens {
            access_token: token_response.access_token,
            refresh_token: token_response.refresh_token,
            expires_at,
            scopes: vec!["activity:read".to_string()],
        };
        self.db.set_tokens(athlete_id, &tokens).await?;

        // Seed default preferences so the dashboard works before the user
        // ever opens the customization panel.
        if self.db.get_preferences(athlete_id).await?.is_none() {
            self.db
                .set_preferences(athlete_id, &Preferences::default())
                .await?;
        }

        tracing::info!(
            athlete_id,
            firstname = %user.firstname,
            "OAuth callback handled, user and tokens stored"
        );

        Ok(OAuthResult {
            athlete_id,
            firstname: user.firstname,
            lastname: user.lastname,
        })
    }

    // ─── Activity Sync ───────────────────────────────────────────

    /// Sync the story year's activities from Strava into Firestore.
    ///
    /// Pages through the year window until a short page; malformed
    /// records are dropped, everything else is upserted. Concurrent calls
    /// for the same athlete serialize on a per-athlete lock; the second
    /// caller re-syncs against Strava's (identical) snapshot, which keeps
    /// the operation idempotent.
    pub async fn sync_year(&self, athlete_id: u64, year: i32) -> Result<u32, AppError> {
        let lock = self
            .sync_locks
            .entry(athlete_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        let tokens = self
            .db
            .get_tokens(athlete_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tokens for athlete {}", athlete_id)))?;

        let (after, before) = year_window(year);

        tracing::info!(athlete_id, year, "Syncing activities from Strava");

        let mut fetched: u32 = 0;
        let mut stored: u32 = 0;
        let mut page = 1u32;

        loop {
            let summaries = self
                .client
                .list_activities(&tokens.access_token, after, before, page, SYNC_PER_PAGE)
                .await?;

            let page_len = summaries.len() as u32;
            if page_len == 0 {
                break;
            }
            fetched += page_len;

            let synced_at = chrono::Utc::now().to_rfc3339();
            let activities: Vec<_> = summaries
                .into_iter()
                .filter_map(|s| s.into_activity(athlete_id, &synced_at))
                .collect();

            stored += activities.len() as u32;
            self.db.batch_upsert_activities(&activities).await?;

            if page_len < SYNC_PER_PAGE {
                break;
            }
            page += 1;
        }

        if stored < fetched {
            tracing::warn!(
                athlete_id,
                dropped = fetched - stored,
                "Skipped malformed activity records during sync"
            );
        }

        tracing::info!(athlete_id, year, count = stored, "Sync complete");
        Ok(stored)
    }
}

/// Unix-timestamp bounds of a calendar year (UTC, half-open).
fn year_window(year: i32) -> (i64, i64) {
    let start = |y: i32| {
        chrono::NaiveDate::from_ymd_opt(y, 1, 1)
            .expect("January 1st always exists")
            .and_hms_opt(0, 0, 0)
            .expect("midnight always exists")
            .and_utc()
            .timestamp()
    };
    (start(year), start(year + 1))
}

/// Result of handling OAuth callback.
#[derive(Debug, Clone)]
pub struct OAuthResult {
    pub athlete_id: u64,
    pub firstname: String,
    pub lastname: String,
}
