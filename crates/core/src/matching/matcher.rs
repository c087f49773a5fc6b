//! Item matching against a filter state.

use tracing::debug;

use crate::catalog::{CatalogEntry, CountryMetadata, FilterableItem};
use crate::config::EngineConfig;
use crate::preferences::FilterState;

use super::note_type::{normalize_note_type_or, note_types_match};

/// Predicate built once per derivation from the filter state.
///
/// Selected category and type ids are resolved to names up front, so
/// matching an entry does no metadata lookups.
#[derive(Debug, Clone)]
pub struct Matcher {
    /// Lower-cased search needle; `None` when the search is blank.
    search: Option<String>,
    /// Lower-cased selected category names; `None` when no filter applies.
    categories: Option<Vec<String>>,
    /// Normalized selected type names; `None` when no filter applies.
    types: Option<Vec<String>>,
    default_note_type: String,
}

impl Matcher {
    pub fn new(filters: &FilterState, metadata: &CountryMetadata, config: &EngineConfig) -> Self {
        let search = Some(filters.search.trim().to_lowercase()).filter(|s| !s.is_empty());

        let categories = (!filters.categories.is_empty()).then(|| {
            filters
                .categories
                .iter()
                .filter_map(|id| metadata.category(id))
                .map(|c| c.name.trim().to_lowercase())
                .collect::<Vec<_>>()
        });

        let types = (!filters.types.is_empty()).then(|| {
            filters
                .types
                .iter()
                .filter_map(|id| metadata.note_type(id))
                .map(|t| normalize_note_type_or(Some(&t.name), &config.default_note_type))
                .collect::<Vec<_>>()
        });

        debug!(
            search = search.as_deref().unwrap_or(""),
            categories = categories.as_ref().map(Vec::len),
            types = types.as_ref().map(Vec::len),
            "Built matcher"
        );

        Self {
            search,
            categories,
            types,
            default_note_type: config.default_note_type.clone(),
        }
    }

    /// Whether the entry passes search, category and type predicates.
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        self.matches_search(entry) && self.matches_category(entry) && self.matches_type(entry)
    }

    /// Keep the items whose entry matches, in input order.
    /// Items without a resolvable entry are dropped.
    pub fn filter(&self, items: &[FilterableItem]) -> Vec<FilterableItem> {
        items
            .iter()
            .filter(|item| item.entry().is_some_and(|entry| self.matches(entry)))
            .cloned()
            .collect()
    }

    fn matches_search(&self, entry: &CatalogEntry) -> bool {
        let Some(needle) = &self.search else {
            return true;
        };
        entry
            .text_values()
            .any(|value| value.to_lowercase().contains(needle.as_str()))
    }

    fn matches_category(&self, entry: &CatalogEntry) -> bool {
        let Some(names) = &self.categories else {
            return true;
        };
        let Some(name) = entry.category_name().or_else(|| entry.series()) else {
            return false;
        };
        let name = name.to_lowercase();
        names.iter().any(|selected| *selected == name)
    }

    fn matches_type(&self, entry: &CatalogEntry) -> bool {
        let Some(types) = &self.types else {
            return true;
        };
        let own = normalize_note_type_or(entry.note_type(), &self.default_note_type);
        types.iter().any(|selected| note_types_match(&own, selected))
    }
}
