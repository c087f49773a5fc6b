//! Preference load cycle.
//!
//! A load moves the engine from `Idle` (or `Loaded` for another country)
//! to `Loading`, fetches metadata and the saved preference, and commits
//! the merged filter state. Every load carries a token; only the load
//! holding the current token may commit.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::catalog::{CountryId, CountryMetadata};
use crate::metadata::CatalogMetadataProvider;
use crate::metrics;

use super::{PreferenceStore, UserFilterPreference};

/// Where the load cycle stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum LoadPhase {
    Idle,
    Loading { country_id: CountryId, token: u64 },
    Loaded { country_id: CountryId },
}

impl LoadPhase {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    /// Country loaded or being loaded.
    pub fn country_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Loading { country_id, .. } | Self::Loaded { country_id } => Some(country_id),
        }
    }
}

/// Token bookkeeping for the load cycle.
#[derive(Debug, Clone)]
pub struct LoadCycle {
    phase: LoadPhase,
    last_token: u64,
    shut_down: bool,
}

impl Default for LoadCycle {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadCycle {
    pub fn new() -> Self {
        Self {
            phase: LoadPhase::Idle,
            last_token: 0,
            shut_down: false,
        }
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Enter `Loading` for a country and return the new token.
    ///
    /// Returns `None` when the country is already loaded or loading, or
    /// after shutdown.
    pub fn begin(&mut self, country_id: &str) -> Option<u64> {
        if self.shut_down || self.phase.country_id() == Some(country_id) {
            return None;
        }
        self.last_token += 1;
        self.phase = LoadPhase::Loading {
            country_id: country_id.to_string(),
            token: self.last_token,
        };
        Some(self.last_token)
    }

    /// Whether a completion carrying `token` may still commit.
    pub fn is_current(&self, token: u64) -> bool {
        !self.shut_down
            && matches!(self.phase, LoadPhase::Loading { token: current, .. } if current == token)
    }

    /// Move to `Loaded` if `token` is current. Returns false for stale tokens.
    pub fn complete(&mut self, token: u64) -> bool {
        if !self.is_current(token) {
            return false;
        }
        if let LoadPhase::Loading { country_id, .. } = &self.phase {
            self.phase = LoadPhase::Loaded {
                country_id: country_id.clone(),
            };
        }
        true
    }

    /// Stop accepting commits for good.
    pub fn shutdown(&mut self) {
        self.shut_down = true;
    }
}

/// A load in flight: everything needed to fetch, detached from the engine.
#[derive(Clone)]
pub struct LoadRequest {
    pub token: u64,
    pub country_id: CountryId,
    pub user_id: Option<String>,
    metadata: Arc<dyn CatalogMetadataProvider>,
    preferences: Arc<dyn PreferenceStore>,
}

/// Fetched inputs of a load, ready to commit.
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub token: u64,
    pub metadata: CountryMetadata,
    pub preference: Option<UserFilterPreference>,
}

impl LoadRequest {
    pub fn new(
        token: u64,
        country_id: CountryId,
        user_id: Option<String>,
        metadata: Arc<dyn CatalogMetadataProvider>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            token,
            country_id,
            user_id,
            metadata,
            preferences,
        }
    }

    /// Fetch metadata and the saved preference concurrently.
    ///
    /// Never fails: a metadata failure yields empty metadata and a
    /// preference failure yields no preference, both logged at warn.
    #[instrument(skip(self), fields(country_id = %self.country_id, token = self.token))]
    pub async fn fetch(self) -> LoadResult {
        let metadata_fut = self.metadata.country_metadata(&self.country_id);
        let preference_fut = async {
            match &self.user_id {
                Some(user_id) => Some(self.preferences.get(user_id, &self.country_id).await),
                None => None,
            }
        };

        let (metadata, preference) = futures::join!(metadata_fut, preference_fut);

        let metadata = match metadata {
            Ok(metadata) => {
                metrics::METADATA_LOADS.with_label_values(&["success"]).inc();
                metadata
            }
            Err(e) => {
                metrics::METADATA_LOADS.with_label_values(&["error"]).inc();
                warn!(error = %e, "Metadata fetch failed, continuing with empty metadata");
                CountryMetadata::empty(self.country_id.clone())
            }
        };

        let preference = match preference {
            None => {
                metrics::PREFERENCE_LOADS.with_label_values(&["anonymous"]).inc();
                None
            }
            Some(Ok(Some(preference))) => {
                metrics::PREFERENCE_LOADS.with_label_values(&["found"]).inc();
                Some(preference)
            }
            Some(Ok(None)) => {
                metrics::PREFERENCE_LOADS.with_label_values(&["absent"]).inc();
                None
            }
            Some(Err(e)) => {
                metrics::PREFERENCE_LOADS.with_label_values(&["error"]).inc();
                warn!(error = %e, "Preference fetch failed, using defaults");
                None
            }
        };

        debug!(
            categories = metadata.categories.len(),
            types = metadata.types.len(),
            sort_options = metadata.sort_options.len(),
            has_preference = preference.is_some(),
            "Load fetched"
        );

        LoadResult {
            token: self.token,
            metadata,
            preference,
        }
    }
}

impl std::fmt::Debug for LoadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadRequest")
            .field("token", &self.token)
            .field("country_id", &self.country_id)
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}
