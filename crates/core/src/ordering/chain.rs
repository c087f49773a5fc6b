//! Multi-key comparator chain.

use std::cmp::Ordering;

use crate::catalog::{canonical_key, CatalogEntry, EntryField, FieldValue, FilterableItem};

use super::face_value::compare_face_values;
use super::pick_number::compare_pick_numbers;

/// One parsed sort field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    /// Creation time, newest first.
    Newest,
    /// Catalog number ordering.
    PickNumber,
    /// Denomination ordering.
    FaceValue,
    /// Any other field, by canonical name.
    Field(String),
}

impl SortKey {
    pub fn parse(field_name: &str) -> Self {
        let key = canonical_key(field_name);
        match key.as_str() {
            "newest" => Self::Newest,
            "ext_pick" | "extended_pick_number" => Self::PickNumber,
            "face_value" => Self::FaceValue,
            _ => Self::Field(key),
        }
    }

    pub fn parse_all<S: AsRef<str>>(fields: &[S]) -> Vec<Self> {
        fields.iter().map(|f| Self::parse(f.as_ref())).collect()
    }

    /// True for the issuing-authority fields that trigger sub-grouping.
    pub fn is_authority(&self) -> bool {
        match self {
            Self::Field(name) => EntryField::Authority.aliases().contains(&name.as_str()),
            _ => false,
        }
    }

    pub fn compare(&self, a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
        match self {
            Self::Newest => match (a.created_at(), b.created_at()) {
                (Some(a), Some(b)) => b.cmp(&a),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            Self::PickNumber => compare_pick_numbers(
                a.catalog_number().as_deref().unwrap_or_default(),
                b.catalog_number().as_deref().unwrap_or_default(),
            ),
            Self::FaceValue => compare_face_values(
                a.value(EntryField::FaceValue),
                b.value(EntryField::FaceValue),
            ),
            Self::Field(name) => compare_field_values(a.lookup(name), b.lookup(name)),
        }
    }
}

/// Generic comparison for fields without a dedicated rule.
///
/// Booleans sort false first, numbers numerically, text case-insensitively
/// with the raw text as tie-break. Numeric-looking text is still text. Values of
/// different kinds order as boolean, number, text. Missing or unorderable
/// values (lists) go last and are equal to each other.
pub fn compare_field_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    let (a, b) = (FieldKey::of(a), FieldKey::of(b));
    a.rank().cmp(&b.rank()).then_with(|| match (&a, &b) {
        (FieldKey::Bool(a), FieldKey::Bool(b)) => a.cmp(b),
        (FieldKey::Number(a), FieldKey::Number(b)) => a.total_cmp(b),
        (FieldKey::Text(a), FieldKey::Text(b)) => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
        _ => Ordering::Equal,
    })
}

enum FieldKey<'a> {
    Bool(bool),
    Number(f64),
    Text(&'a str),
    Unresolved,
}

impl<'a> FieldKey<'a> {
    fn of(value: Option<&'a FieldValue>) -> Self {
        match value {
            Some(FieldValue::Bool(b)) => Self::Bool(*b),
            Some(FieldValue::Number(n)) => Self::Number(*n),
            Some(FieldValue::Text(s)) => Self::Text(s),
            _ => Self::Unresolved,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Number(_) => 1,
            Self::Text(_) => 2,
            Self::Unresolved => 3,
        }
    }
}

/// Evaluate keys in order until one decides.
pub fn compare_entries(keys: &[SortKey], a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
    keys.iter()
        .map(|key| key.compare(a, b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Stable sort of items by their resolved entries. Items without an entry
/// go last.
pub fn sort_items(items: &mut [FilterableItem], keys: &[SortKey]) {
    if keys.is_empty() {
        return;
    }
    items.sort_by(|a, b| match (a.entry(), b.entry()) {
        (Some(a), Some(b)) => compare_entries(keys, a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
