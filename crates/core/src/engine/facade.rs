//! The catalog engine: one memoized derivation over items, metadata and
//! the effective filter state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, instrument};

use crate::catalog::{CountryId, CountryMetadata, FilterableItem};
use crate::config::EngineConfig;
use crate::grouping::group_items;
use crate::matching::Matcher;
use crate::metadata::CatalogMetadataProvider;
use crate::metrics;
use crate::ordering::{sort_items, SortKey};
use crate::preferences::{
    resolve_filter_state, FilterPatch, FilterState, LoadCycle, LoadPhase, LoadRequest, LoadResult,
    PreferenceStore,
};

use super::types::{CatalogView, EngineOptions, UpdateOutcome};

struct EngineState {
    cycle: LoadCycle,
    country_id: CountryId,
    filters: FilterState,
    metadata: CountryMetadata,
    items: Arc<Vec<FilterableItem>>,
    /// Bumped on every input change.
    revision: u64,
    cached: Option<(u64, Arc<CatalogView>)>,
}

impl EngineState {
    fn touch(&mut self) {
        self.revision += 1;
    }
}

/// Filtering, sorting and grouping engine for one user's catalog view.
///
/// The state lock is never held across an await: loads fetch through a
/// detached [`LoadRequest`] and re-lock to commit.
pub struct CatalogEngine {
    metadata: Arc<dyn CatalogMetadataProvider>,
    preferences: Arc<dyn PreferenceStore>,
    user_id: Option<String>,
    config: EngineConfig,
    state: Mutex<EngineState>,
}

impl CatalogEngine {
    pub fn new(
        metadata: Arc<dyn CatalogMetadataProvider>,
        preferences: Arc<dyn PreferenceStore>,
        options: EngineOptions,
    ) -> Self {
        let mut filters = FilterState {
            country_id: options.country_id.clone(),
            ..Default::default()
        };
        filters.apply(options.initial_filters);

        Self {
            metadata,
            preferences,
            user_id: options.user_id,
            config: options.config,
            state: Mutex::new(EngineState {
                cycle: LoadCycle::new(),
                metadata: CountryMetadata::empty(options.country_id.clone()),
                country_id: options.country_id,
                filters,
                items: Arc::new(Vec::new()),
                revision: 0,
                cached: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run the load cycle for the current country.
    ///
    /// Returns true if this call committed a filter state.
    pub async fn load(&self) -> bool {
        let country_id = self.lock().country_id.clone();
        self.set_country(&country_id).await
    }

    /// Switch country and run the load cycle for it.
    ///
    /// A no-op returning false when the country is already loaded or
    /// loading, or when a later load superseded this one.
    pub async fn set_country(&self, country_id: &str) -> bool {
        match self.begin_load(country_id) {
            Some(request) => {
                let result = request.fetch().await;
                self.commit(result)
            }
            None => false,
        }
    }

    /// Enter `Loading` for a country and hand back the fetch to run.
    pub fn begin_load(&self, country_id: &str) -> Option<LoadRequest> {
        let mut state = self.lock();
        if state.cycle.is_shut_down() {
            return None;
        }
        if state.country_id != country_id {
            state.country_id = country_id.to_string();
            state.filters.country_id = country_id.to_string();
            state.touch();
        }

        let token = state.cycle.begin(country_id)?;
        state.touch();
        debug!(country_id, token, "Load started");

        Some(LoadRequest::new(
            token,
            country_id.to_string(),
            self.user_id.clone(),
            Arc::clone(&self.metadata),
            Arc::clone(&self.preferences),
        ))
    }

    /// Apply a fetched load. Stale or post-shutdown results are discarded.
    pub fn commit(&self, result: LoadResult) -> bool {
        let mut state = self.lock();
        if !state.cycle.is_current(result.token) {
            metrics::STALE_LOADS_DISCARDED.inc();
            debug!(token = result.token, "Discarding stale load");
            return false;
        }

        let search = std::mem::take(&mut state.filters.search);
        let mut filters = resolve_filter_state(&result.metadata, result.preference.as_ref(), search);
        filters.country_id = state.country_id.clone();

        info!(
            country_id = %state.country_id,
            token = result.token,
            categories = filters.categories.len(),
            types = filters.types.len(),
            sort = ?filters.sort,
            "Filters loaded"
        );

        state.filters = filters;
        state.metadata = result.metadata;
        state.cycle.complete(result.token);
        state.touch();
        true
    }

    /// Replace the source items.
    pub fn set_items(&self, items: Vec<FilterableItem>) {
        let mut state = self.lock();
        state.items = Arc::new(items);
        state.touch();
    }

    /// Merge a patch into the filter state.
    ///
    /// Dropped while a load is in flight or after shutdown. Required sort
    /// fields are re-appended after the merge.
    pub fn update_filters(&self, patch: FilterPatch) -> UpdateOutcome {
        let mut state = self.lock();
        if state.cycle.is_shut_down() || matches!(state.cycle.phase(), LoadPhase::Loading { .. }) {
            metrics::UPDATES_DROPPED.inc();
            debug!("Dropping filter update during load");
            return UpdateOutcome::Dropped;
        }

        let required = state.metadata.required_sort_fields();
        let country_id = state.country_id.clone();
        state.filters.apply(patch);
        state.filters.country_id = country_id;
        state.filters.ensure_sort_fields(&required);
        state.touch();
        UpdateOutcome::Applied
    }

    pub fn filters(&self) -> FilterState {
        self.lock().filters.clone()
    }

    pub fn metadata(&self) -> CountryMetadata {
        self.lock().metadata.clone()
    }

    pub fn country_id(&self) -> CountryId {
        self.lock().country_id.clone()
    }

    /// True until the current country's load has committed.
    pub fn is_loading(&self) -> bool {
        !self.lock().cycle.phase().is_loaded()
    }

    pub fn phase(&self) -> LoadPhase {
        self.lock().cycle.phase().clone()
    }

    /// Stop applying loads and filter updates.
    pub fn shutdown(&self) {
        self.lock().cycle.shutdown();
        debug!("Engine shut down");
    }

    /// The current derivation, recomputed only when an input changed.
    pub fn view(&self) -> Arc<CatalogView> {
        let mut state = self.lock();
        if let Some((revision, view)) = &state.cached {
            if *revision == state.revision {
                return Arc::clone(view);
            }
        }

        let view = Arc::new(derive_view(&state, &self.config));
        state.cached = Some((state.revision, Arc::clone(&view)));
        view
    }
}

#[instrument(skip_all, fields(revision = state.revision, items = state.items.len()))]
fn derive_view(state: &EngineState, config: &EngineConfig) -> CatalogView {
    let filters = state.filters.clone();
    if !state.cycle.phase().is_loaded() {
        return CatalogView {
            filters,
            items: Vec::new(),
            groups: Vec::new(),
            loading: true,
        };
    }

    let timer = metrics::DERIVATION_DURATION
        .with_label_values(&[])
        .start_timer();

    let matcher = Matcher::new(&filters, &state.metadata, config);
    let mut items = matcher.filter(&state.items);
    let keys = SortKey::parse_all(&filters.sort);
    sort_items(&mut items, &keys);
    let groups = group_items(&items, &state.metadata, &keys, config);

    timer.observe_duration();
    metrics::DERIVATIONS_TOTAL.inc();
    metrics::DERIVATION_ITEMS
        .with_label_values(&["input"])
        .observe(state.items.len() as f64);
    metrics::DERIVATION_ITEMS
        .with_label_values(&["filtered"])
        .observe(items.len() as f64);
    debug!(
        filtered = items.len(),
        groups = groups.len(),
        "Derived catalog view"
    );

    CatalogView {
        filters,
        items,
        groups,
        loading: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockMetadataProvider, MockPreferenceStore};

    fn engine(options: EngineOptions) -> CatalogEngine {
        CatalogEngine::new(
            Arc::new(MockMetadataProvider::with_metadata(fixtures::turkey_metadata())),
            Arc::new(MockPreferenceStore::new()),
            options,
        )
    }

    #[test]
    fn test_new_engine_is_loading_with_empty_view() {
        let engine = engine(EngineOptions::new("tr").with_filters(FilterPatch::search("lira")));
        engine.set_items(fixtures::turkey_items());

        assert!(engine.is_loading());
        assert_eq!(engine.phase(), LoadPhase::Idle);
        let view = engine.view();
        assert!(view.loading);
        assert!(view.items.is_empty());
        assert!(view.groups.is_empty());
        assert_eq!(view.filters.search, "lira");
        assert_eq!(view.filters.country_id, "tr");
    }

    #[tokio::test]
    async fn test_load_commits_defaults_and_keeps_search() {
        let engine = engine(EngineOptions::new("tr").with_filters(FilterPatch::search("lira")));

        assert!(engine.load().await);

        let filters = engine.filters();
        assert!(!engine.is_loading());
        assert_eq!(filters.search, "lira");
        assert_eq!(filters.types, vec!["issued"]);
        assert_eq!(filters.sort, vec!["sultan", "extPick"]);
        assert!(!engine.load().await);
    }

    #[tokio::test]
    async fn test_view_is_memoized_per_revision() {
        let engine = engine(EngineOptions::new("tr"));
        engine.set_items(fixtures::turkey_items());
        engine.load().await;

        let first = engine.view();
        let second = engine.view();
        assert!(Arc::ptr_eq(&first, &second));

        engine.update_filters(FilterPatch::search("1927"));
        let third = engine.view();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(fixtures::item_ids(&third.items), vec!["n4"]);
    }

    #[tokio::test]
    async fn test_update_keeps_required_sort_fields() {
        let engine = engine(EngineOptions::new("tr"));
        engine.load().await;

        let outcome = engine.update_filters(FilterPatch::sort(["faceValue"]));

        assert_eq!(outcome, UpdateOutcome::Applied);
        assert_eq!(engine.filters().sort, vec!["faceValue", "extPick"]);
    }

    #[test]
    fn test_update_dropped_while_loading() {
        let engine = engine(EngineOptions::new("tr"));
        let request = engine.begin_load("tr");
        assert!(request.is_some());

        assert_eq!(
            engine.update_filters(FilterPatch::search("x")),
            UpdateOutcome::Dropped
        );
        assert_eq!(engine.filters().search, "");
    }

    #[tokio::test]
    async fn test_split_cycle_discards_superseded_load() {
        let engine = engine(EngineOptions::new("tr"));
        let stale = engine.begin_load("tr").unwrap();
        let current = engine.begin_load("gr").unwrap();

        let stale_result = stale.fetch().await;
        let current_result = current.fetch().await;

        assert!(engine.commit(current_result));
        assert!(!engine.commit(stale_result));
        assert_eq!(engine.country_id(), "gr");
        assert_eq!(engine.filters().country_id, "gr");
        assert!(engine.filters().categories.is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_blocks_commit_and_updates() {
        let engine = engine(EngineOptions::new("tr"));
        let request = engine.begin_load("tr").unwrap();
        engine.shutdown();

        let result = request.fetch().await;
        assert!(!engine.commit(result));
        assert!(engine.is_loading());
        assert_eq!(
            engine.update_filters(FilterPatch::search("x")),
            UpdateOutcome::Dropped
        );
        assert!(engine.begin_load("gr").is_none());
    }
}
