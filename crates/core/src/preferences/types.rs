//! Filter state and persisted preference types.

use serde::{Deserialize, Serialize};

use crate::catalog::{CategoryId, CountryId, SortOptionId, TypeId};

/// A user's saved filter choices for one country.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFilterPreference {
    #[serde(default)]
    pub selected_categories: Vec<CategoryId>,
    #[serde(default)]
    pub selected_types: Vec<TypeId>,
    /// Sort option ids, not field names.
    #[serde(default)]
    pub selected_sort_options: Vec<SortOptionId>,
}

impl UserFilterPreference {
    pub fn is_empty(&self) -> bool {
        self.selected_categories.is_empty()
            && self.selected_types.is_empty()
            && self.selected_sort_options.is_empty()
    }
}

/// The effective filter and sort selection.
///
/// Once metadata is loaded, `sort` contains every required sort field.
/// The order of `sort` is the comparator precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub categories: Vec<CategoryId>,
    #[serde(default)]
    pub types: Vec<TypeId>,
    /// Sort field names.
    #[serde(default)]
    pub sort: Vec<String>,
    #[serde(default)]
    pub country_id: CountryId,
}

impl FilterState {
    /// Merge a partial update. Fields absent from the patch are kept.
    pub fn apply(&mut self, patch: FilterPatch) {
        if let Some(search) = patch.search {
            self.search = search;
        }
        if let Some(categories) = patch.categories {
            self.categories = categories;
        }
        if let Some(types) = patch.types {
            self.types = types;
        }
        if let Some(sort) = patch.sort {
            self.sort = sort;
        }
    }

    /// Append each of `required` missing from `sort`, keeping first occurrences.
    pub fn ensure_sort_fields<'a>(&mut self, required: impl IntoIterator<Item = &'a String>) {
        for field in required {
            if !self.sort.contains(field) {
                self.sort.push(field.clone());
            }
        }
    }
}

/// Partial [`FilterState`]; the country is owned by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<TypeId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<String>>,
}

impl FilterPatch {
    pub fn search(search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            ..Default::default()
        }
    }

    pub fn sort<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sort: Some(fields.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.categories.is_none()
            && self.types.is_none()
            && self.sort.is_none()
    }
}
