//! Engine options and outputs.

use serde::Serialize;

use crate::catalog::{CountryId, FilterableItem};
use crate::config::EngineConfig;
use crate::grouping::GroupItem;
use crate::preferences::{FilterPatch, FilterState};

/// Construction parameters for a [`CatalogEngine`](super::CatalogEngine).
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// User whose saved preference is loaded. Anonymous engines use defaults.
    pub user_id: Option<String>,
    pub country_id: CountryId,
    /// Caller overrides applied before the first load.
    pub initial_filters: FilterPatch,
    pub config: EngineConfig,
}

impl EngineOptions {
    pub fn new(country_id: impl Into<CountryId>) -> Self {
        Self {
            country_id: country_id.into(),
            ..Default::default()
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_filters(mut self, filters: FilterPatch) -> Self {
        self.initial_filters = filters;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }
}

/// Snapshot of a derivation. Shared, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    pub filters: FilterState,
    /// Matching items in sort order.
    pub items: Vec<FilterableItem>,
    pub groups: Vec<GroupItem>,
    pub loading: bool,
}

/// Result of a filter update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    Applied,
    /// Ignored: a load is in flight or the engine is shut down.
    Dropped,
}
