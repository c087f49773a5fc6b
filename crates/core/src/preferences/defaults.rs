//! Merging persisted preferences with metadata-derived defaults.

use crate::catalog::{CategoryId, CountryMetadata, TypeId};

use super::{FilterState, UserFilterPreference};

/// Selection applied when the user has saved nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDefaults {
    pub categories: Vec<CategoryId>,
    pub types: Vec<TypeId>,
    pub sort: Vec<String>,
}

/// Defaults for a country: every category, the "issued" types (all types
/// when none is issued), and the default or required sort fields in
/// display order.
pub fn compute_defaults(metadata: &CountryMetadata) -> FilterDefaults {
    let categories = metadata.categories.iter().map(|c| c.id.clone()).collect();

    let issued: Vec<TypeId> = metadata
        .types
        .iter()
        .filter(|t| t.name.to_lowercase().contains("issued"))
        .map(|t| t.id.clone())
        .collect();
    let types = if issued.is_empty() {
        metadata.types.iter().map(|t| t.id.clone()).collect()
    } else {
        issued
    };

    let mut sort: Vec<String> = Vec::new();
    for option in metadata
        .sort_options_in_order()
        .filter(|o| o.is_default || o.is_required)
    {
        if !sort.contains(&option.field_name) {
            sort.push(option.field_name.clone());
        }
    }

    FilterDefaults {
        categories,
        types,
        sort,
    }
}

/// Effective filter state after a load.
///
/// With a preference, the selected sort option ids become field names
/// (unknown ids are skipped) and required fields missing from them are
/// appended. Category and type ids the metadata does not define are
/// dropped; a selection left empty falls back to the defaults.
pub fn resolve_filter_state(
    metadata: &CountryMetadata,
    preference: Option<&UserFilterPreference>,
    search: String,
) -> FilterState {
    let defaults = compute_defaults(metadata);

    let mut state = match preference {
        None => FilterState {
            search,
            categories: defaults.categories,
            types: defaults.types,
            sort: defaults.sort,
            country_id: metadata.country_id.clone(),
        },
        Some(preference) => {
            let mut sort: Vec<String> = Vec::new();
            for field in preference
                .selected_sort_options
                .iter()
                .filter_map(|id| metadata.sort_option(id))
                .map(|o| &o.field_name)
            {
                if !sort.contains(field) {
                    sort.push(field.clone());
                }
            }

            let categories = known_or(&preference.selected_categories, defaults.categories, |id| {
                metadata.category(id).is_some()
            });
            let types = known_or(&preference.selected_types, defaults.types, |id| {
                metadata.note_type(id).is_some()
            });

            FilterState {
                search,
                categories,
                types,
                sort,
                country_id: metadata.country_id.clone(),
            }
        }
    };

    state.ensure_sort_fields(&metadata.required_sort_fields());
    state
}

fn known_or(
    selected: &[String],
    fallback: Vec<String>,
    is_known: impl Fn(&str) -> bool,
) -> Vec<String> {
    let known: Vec<String> = selected.iter().filter(|id| is_known(id)).cloned().collect();
    if known.is_empty() {
        fallback
    } else {
        known
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_defaults_select_all_categories_and_issued_types() {
        let defaults = compute_defaults(&fixtures::turkey_metadata());

        assert_eq!(defaults.categories, vec!["ottoman", "first", "second"]);
        assert_eq!(defaults.types, vec!["issued"]);
        assert_eq!(defaults.sort, vec!["sultan", "extPick"]);
    }

    #[test]
    fn test_defaults_fall_back_to_all_types() {
        let mut metadata = fixtures::turkey_metadata();
        metadata.types.retain(|t| t.id != "issued");

        let defaults = compute_defaults(&metadata);
        assert_eq!(defaults.types, vec!["specimen", "trial"]);
    }

    #[test]
    fn test_no_preference_uses_defaults() {
        let metadata = fixtures::turkey_metadata();
        let state = resolve_filter_state(&metadata, None, "kept".to_string());

        assert_eq!(state.search, "kept");
        assert_eq!(state.categories.len(), 3);
        assert_eq!(state.types, vec!["issued"]);
        assert_eq!(state.sort, vec!["sultan", "extPick"]);
        assert_eq!(state.country_id, "tr");
    }

    #[test]
    fn test_empty_preference_fills_defaults() {
        let metadata = fixtures::turkey_metadata();
        let state = resolve_filter_state(
            &metadata,
            Some(&UserFilterPreference::default()),
            String::new(),
        );

        assert_eq!(state.categories, vec!["ottoman", "first", "second"]);
        assert_eq!(state.types, vec!["issued"]);
        assert_eq!(state.sort, vec!["extPick"]);
    }

    #[test]
    fn test_preference_sort_then_required_appended() {
        let metadata = fixtures::turkey_metadata();
        let preference = UserFilterPreference {
            selected_categories: vec!["first".to_string()],
            selected_types: vec![],
            selected_sort_options: vec![
                "sort-newest".to_string(),
                "gone".to_string(),
                "sort-newest".to_string(),
            ],
        };

        let state = resolve_filter_state(&metadata, Some(&preference), String::new());

        assert_eq!(state.categories, vec!["first"]);
        assert_eq!(state.types, vec!["issued"]);
        assert_eq!(state.sort, vec!["newest", "extPick"]);
    }

    #[test]
    fn test_required_field_not_duplicated() {
        let metadata = fixtures::turkey_metadata();
        let preference = UserFilterPreference {
            selected_sort_options: vec!["sort-pick".to_string(), "sort-face".to_string()],
            ..Default::default()
        };

        let state = resolve_filter_state(&metadata, Some(&preference), String::new());
        assert_eq!(state.sort, vec!["extPick", "faceValue"]);
    }

    #[test]
    fn test_unknown_preference_ids_are_dropped() {
        let metadata = fixtures::turkey_metadata();
        let preference = UserFilterPreference {
            selected_categories: vec!["retired".to_string(), "second".to_string()],
            selected_types: vec!["retired".to_string()],
            ..Default::default()
        };

        let state = resolve_filter_state(&metadata, Some(&preference), String::new());
        assert_eq!(state.categories, vec!["second"]);
        assert_eq!(state.types, vec!["issued"]);
    }

    #[test]
    fn test_saved_preference_over_empty_metadata_selects_nothing() {
        let state = resolve_filter_state(
            &CountryMetadata::empty("tr"),
            Some(&fixtures::saved_preference()),
            String::new(),
        );
        assert!(state.categories.is_empty());
        assert!(state.types.is_empty());
        assert!(state.sort.is_empty());
    }

    #[test]
    fn test_empty_metadata_gives_empty_state() {
        let state = resolve_filter_state(&CountryMetadata::empty("tr"), None, String::new());
        assert!(state.categories.is_empty());
        assert!(state.types.is_empty());
        assert!(state.sort.is_empty());
    }
}
