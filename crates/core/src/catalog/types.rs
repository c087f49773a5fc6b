//! Country-scoped catalog taxonomy: categories, note types and sort options.

use serde::{Deserialize, Serialize};

pub type CountryId = String;
pub type CategoryId = String;
pub type TypeId = String;
pub type SortOptionId = String;

/// A category (series) of notes within a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub id: CategoryId,
    pub name: String,
    pub display_order: i64,
    /// Number of catalog entries in the category, when the source counts them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

/// A note type (issued, specimen, trial...) within a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub id: TypeId,
    pub name: String,
    pub display_order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

/// A field users may sort by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOption {
    pub id: SortOptionId,
    pub name: String,
    /// Field name handed to the comparator chain (`extPick`, `newest`, ...).
    pub field_name: String,
    /// Always part of the effective sort, whatever the user picked.
    #[serde(default)]
    pub is_required: bool,
    /// Selected when the user has no saved preference.
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub display_order: i64,
}

/// Everything the engine needs to know about a country's taxonomy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryMetadata {
    pub country_id: CountryId,
    #[serde(default)]
    pub categories: Vec<CategoryDefinition>,
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
    #[serde(default)]
    pub sort_options: Vec<SortOption>,
}

impl CountryMetadata {
    /// Empty metadata for a country, used when the provider is unavailable.
    pub fn empty(country_id: impl Into<CountryId>) -> Self {
        Self {
            country_id: country_id.into(),
            ..Default::default()
        }
    }

    pub fn category(&self, id: &str) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Case-insensitive category lookup by display name.
    pub fn category_by_name(&self, name: &str) -> Option<&CategoryDefinition> {
        let name = name.trim().to_lowercase();
        self.categories
            .iter()
            .find(|c| c.name.trim().to_lowercase() == name)
    }

    pub fn note_type(&self, id: &str) -> Option<&TypeDefinition> {
        self.types.iter().find(|t| t.id == id)
    }

    pub fn sort_option(&self, id: &str) -> Option<&SortOption> {
        self.sort_options.iter().find(|o| o.id == id)
    }

    /// Field names of every required sort option, in display order.
    pub fn required_sort_fields(&self) -> Vec<String> {
        self.sort_options_in_order()
            .filter(|o| o.is_required)
            .map(|o| o.field_name.clone())
            .collect()
    }

    /// Sort options ordered by `display_order`, declaration order on ties.
    pub fn sort_options_in_order(&self) -> impl Iterator<Item = &SortOption> {
        let mut options: Vec<&SortOption> = self.sort_options.iter().collect();
        options.sort_by_key(|o| o.display_order);
        options.into_iter()
    }
}
