//! Mock preference store for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::preferences::{PreferenceError, PreferenceStore, UserFilterPreference};

/// Mock implementation of [`PreferenceStore`].
#[derive(Debug, Default)]
pub struct MockPreferenceStore {
    /// Saved preferences keyed by `(user_id, country_id)`.
    preferences: Arc<RwLock<HashMap<(String, String), UserFilterPreference>>>,
    /// If set, the next get will fail with this error.
    next_error: Arc<RwLock<Option<PreferenceError>>>,
    /// Every `(user_id, country_id)` requested.
    gets: Arc<RwLock<Vec<(String, String)>>>,
}

impl MockPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_preference(
        &self,
        user_id: &str,
        country_id: &str,
        preference: UserFilterPreference,
    ) {
        self.preferences
            .write()
            .await
            .insert((user_id.to_string(), country_id.to_string()), preference);
    }

    /// Configure the next get to fail with the given error.
    pub async fn set_next_error(&self, error: PreferenceError) {
        *self.next_error.write().await = Some(error);
    }

    /// Requests received, in call order.
    pub async fn recorded_gets(&self) -> Vec<(String, String)> {
        self.gets.read().await.clone()
    }
}

#[async_trait]
impl PreferenceStore for MockPreferenceStore {
    async fn get(
        &self,
        user_id: &str,
        country_id: &str,
    ) -> Result<Option<UserFilterPreference>, PreferenceError> {
        self.gets
            .write()
            .await
            .push((user_id.to_string(), country_id.to_string()));

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(self
            .preferences
            .read()
            .await
            .get(&(user_id.to_string(), country_id.to_string()))
            .cloned())
    }
}
