//! Preference storage trait.

use async_trait::async_trait;
use thiserror::Error;

use super::UserFilterPreference;

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Preference store unavailable: {0}")]
    Unavailable(String),
}

/// Source of persisted per-user, per-country filter preferences.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// The user's saved preference for a country, if any.
    async fn get(
        &self,
        user_id: &str,
        country_id: &str,
    ) -> Result<Option<UserFilterPreference>, PreferenceError>;
}
