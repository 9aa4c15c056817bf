//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const TOKENS: &str = "tokens";
    pub const ACTIVITIES: &str = "activities";
    /// Story preferences (keyed by athlete_id)
    pub const PREFERENCES: &str = "preferences";
}
