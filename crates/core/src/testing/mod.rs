//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the collaborator traits,
//! allowing engine and HTTP tests without a database.
//!
//! # Example
//!
//! ```rust,ignore
//! use pickbook_core::testing::{fixtures, MockMetadataProvider, MockPreferenceStore};
//!
//! let metadata = MockMetadataProvider::with_metadata(fixtures::turkey_metadata());
//! let preferences = MockPreferenceStore::new();
//! preferences.set_preference("u1", "tr", fixtures::saved_preference()).await;
//! ```

mod mock_metadata;
mod mock_preferences;

pub use mock_metadata::MockMetadataProvider;
pub use mock_preferences::MockPreferenceStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::{json, Value};

    use crate::catalog::{
        CategoryDefinition, CountryMetadata, FilterableItem, SortOption, TypeDefinition,
    };
    use crate::preferences::UserFilterPreference;

    fn category(id: &str, name: &str, display_order: i64) -> CategoryDefinition {
        CategoryDefinition {
            id: id.to_string(),
            name: name.to_string(),
            display_order,
            count: None,
        }
    }

    fn note_type(id: &str, name: &str, display_order: i64) -> TypeDefinition {
        TypeDefinition {
            id: id.to_string(),
            name: name.to_string(),
            display_order,
            count: None,
        }
    }

    /// Create a sort option.
    pub fn sort_option(
        id: &str,
        field_name: &str,
        is_required: bool,
        is_default: bool,
        display_order: i64,
    ) -> SortOption {
        SortOption {
            id: id.to_string(),
            name: field_name.to_string(),
            field_name: field_name.to_string(),
            is_required,
            is_default,
            display_order,
        }
    }

    /// Turkish catalog taxonomy.
    ///
    /// Categories `ottoman`, `first`, `second`; types `issued`, `specimen`,
    /// `trial`; sort options `sultan` (default), `extPick` (required),
    /// `newest` and `faceValue`.
    pub fn turkey_metadata() -> CountryMetadata {
        CountryMetadata {
            country_id: "tr".to_string(),
            categories: vec![
                category("ottoman", "Ottoman Empire", 1),
                category("first", "First Issue", 2),
                category("second", "Second Issue", 3),
            ],
            types: vec![
                note_type("issued", "Issued Notes", 1),
                note_type("specimen", "Specimen", 2),
                note_type("trial", "Trial Notes", 3),
            ],
            sort_options: vec![
                sort_option("sort-sultan", "sultan", false, true, 1),
                sort_option("sort-pick", "extPick", true, false, 2),
                sort_option("sort-newest", "newest", false, false, 3),
                sort_option("sort-face", "faceValue", false, false, 4),
            ],
        }
    }

    /// Greek catalog taxonomy with no required sort.
    pub fn greece_metadata() -> CountryMetadata {
        CountryMetadata {
            country_id: "gr".to_string(),
            categories: vec![category("drachma", "Drachma", 1)],
            types: vec![note_type("gr-issued", "Issued notes", 1)],
            sort_options: vec![sort_option("gr-face", "faceValue", false, true, 1)],
        }
    }

    /// Preference selecting the First Issue, sorted by newest.
    pub fn saved_preference() -> UserFilterPreference {
        UserFilterPreference {
            selected_categories: vec!["first".to_string()],
            selected_types: vec![],
            selected_sort_options: vec!["sort-newest".to_string()],
        }
    }

    /// Raw catalog records for the Turkish taxonomy.
    pub fn turkey_records() -> Vec<Value> {
        vec![
            json!({
                "id": "n1", "category": "Ottoman Empire", "sultanName": "Mehmed V",
                "type": "Issued Note", "extPick": "99", "faceValue": "1 Lira",
                "created_at": "2024-01-01T00:00:00Z"
            }),
            json!({
                "id": "n2", "category": "Ottoman Empire", "sultan": "Abdulmecid",
                "type": "Issued", "extPick": "1a", "faceValue": "20 Kurush",
                "created_at": "2024-02-01T00:00:00Z"
            }),
            json!({
                "id": "n3", "category": "Ottoman Empire", "sultan": "Mehmed V",
                "type": "Specimen", "extPick": "98", "faceValue": "5 Lira",
                "created_at": "2024-03-01T00:00:00Z"
            }),
            json!({
                "id": "n4", "category": { "id": "first", "name": "First Issue" },
                "type": "Issued notes", "extended_pick_number": "120",
                "face_value": "5 Lira", "description": "Printed 1927",
                "created_at": "2024-04-01T00:00:00Z"
            }),
            json!({
                "id": "col-1", "condition": "VF",
                "banknote": {
                    "id": "n5", "category_name": "First Issue", "type": "Trial Note",
                    "extPick": "119", "faceValue": "1 Lira",
                    "created_at": "2024-05-01T00:00:00Z"
                }
            }),
            json!({
                "id": "n6", "series": "Second Issue", "type": "Issued",
                "extPick": "130A", "faceValue": "50 Lira", "description": "Dated 1937",
                "created_at": "2024-06-01T00:00:00Z"
            }),
            json!({
                "id": "n7", "type": "Issued", "pick_number": "5", "faceValue": "10 Kurush",
                "created_at": "2024-07-01T00:00:00Z"
            }),
            json!({ "id": "broken", "banknote": null }),
        ]
    }

    /// [`turkey_records`] as engine items.
    pub fn turkey_items() -> Vec<FilterableItem> {
        turkey_records().into_iter().map(FilterableItem::new).collect()
    }

    /// Ids of items, in order.
    pub fn item_ids(items: &[FilterableItem]) -> Vec<String> {
        items.iter().filter_map(FilterableItem::id).collect()
    }
}
