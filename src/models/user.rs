//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Strava athlete ID (also used as document ID)
    pub strava_athlete_id: u64,
    /// First name
    pub firstname: String,
    /// Last name
    pub lastname: String,
    /// Profile picture URL
    pub profile_picture: Option<String>,
    /// When user first connected
    pub created_at: String,
    /// Last login timestamp
    pub last_login: String,
}

impl User {
    /// Display name as the frontend shows it ("First Last", trimmed).
    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_string()
    }
}

/// User's OAuth tokens stored in Firestore.
///
/// Tokens are used as issued; there is no refresh flow. A revoked or
/// expired token surfaces as a Strava API error on the next sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserTokens {
    /// Strava access token
    pub access_token: String,
    /// Strava refresh token (stored for completeness, unused)
    pub refresh_token: String,
    /// When the access token expires (ISO 8601)
    pub expires_at: String,
    /// Granted OAuth scopes
    pub scopes: Vec<String>,
}
