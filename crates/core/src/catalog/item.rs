//! Catalog entries and the items that carry them.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::schema::{canonical_key, EntryField, FieldValue};

/// Keys under which collection, wishlist and marketplace records wrap
/// their catalog entry (compared after canonicalization).
pub const WRAPPER_KEYS: &[&str] = &["banknote", "banknote_data", "unlisted_banknote"];

/// A catalog entity with canonical snake_case field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CatalogEntry {
    fields: BTreeMap<String, FieldValue>,
}

impl CatalogEntry {
    /// Build an entry from a JSON object.
    ///
    /// Scalar fields are kept under their canonical key. One level of nested
    /// objects is flattened into `<parent>_<child>` keys, which never
    /// override a top-level field of the same name.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut fields = BTreeMap::new();

        for (key, value) in object {
            if value.is_object() {
                continue;
            }
            if let Some(field) = FieldValue::from_json(value) {
                fields.entry(canonical_key(key)).or_insert(field);
            }
        }

        for (key, value) in object {
            let Some(nested) = value.as_object() else {
                continue;
            };
            let parent = canonical_key(key);
            for (child_key, child) in nested {
                if let Some(field) = FieldValue::from_json(child) {
                    fields
                        .entry(format!("{}_{}", parent, canonical_key(child_key)))
                        .or_insert(field);
                }
            }
        }

        Some(Self { fields })
    }

    /// Exact canonical-key access.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Resolve a field by any naming variant: `<key>` then `<key>_name`.
    pub fn lookup(&self, name: &str) -> Option<&FieldValue> {
        let key = canonical_key(name);
        self.fields
            .get(&key)
            .or_else(|| self.fields.get(&format!("{}_name", key)))
    }

    /// First non-blank value among the field's aliases.
    pub fn value(&self, field: EntryField) -> Option<&FieldValue> {
        field
            .aliases()
            .iter()
            .filter_map(|alias| self.fields.get(*alias))
            .find(|value| !value.is_blank())
    }

    /// First non-blank text among the field's aliases.
    pub fn text(&self, field: EntryField) -> Option<&str> {
        field
            .aliases()
            .iter()
            .filter_map(|alias| self.fields.get(*alias))
            .filter_map(FieldValue::as_str)
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    /// Text rendering of a well-known field, numbers included (ids, years).
    pub fn text_lossy(&self, field: EntryField) -> Option<String> {
        self.value(field).map(|value| value.to_string())
    }

    pub fn id(&self) -> Option<String> {
        self.text_lossy(EntryField::Id)
    }

    pub fn category_name(&self) -> Option<&str> {
        self.text(EntryField::Category)
    }

    pub fn series(&self) -> Option<&str> {
        self.text(EntryField::Series)
    }

    pub fn note_type(&self) -> Option<&str> {
        self.text(EntryField::NoteType)
    }

    pub fn authority(&self) -> Option<&str> {
        self.text(EntryField::Authority)
    }

    pub fn catalog_number(&self) -> Option<String> {
        self.text_lossy(EntryField::CatalogNumber)
    }

    /// Creation time from RFC 3339 text, a bare date, or epoch milliseconds.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self.value(EntryField::CreatedAt)? {
            FieldValue::Number(ms) => Utc.timestamp_millis_opt(*ms as i64).single(),
            FieldValue::Text(s) => parse_timestamp(s),
            _ => None,
        }
    }

    /// Every string the entry carries, list elements included.
    pub fn text_values(&self) -> impl Iterator<Item = &str> {
        self.fields.values().flat_map(|value| {
            let (single, list): (Option<&str>, &[String]) = match value {
                FieldValue::Text(s) => (Some(s.as_str()), &[]),
                FieldValue::List(items) => (None, items.as_slice()),
                _ => (None, &[]),
            };
            single.into_iter().chain(list.iter().map(String::as_str))
        })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// One input row of the engine: a catalog entry, or a record wrapping one.
///
/// The raw record is kept untouched for consumers; the resolved entry is
/// computed once at construction. Cloning is cheap.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterableItem {
    raw: Arc<Value>,
    entry: Option<Arc<CatalogEntry>>,
}

impl FilterableItem {
    pub fn new(raw: Value) -> Self {
        let entry = resolve_entry(&raw).map(Arc::new);
        Self {
            raw: Arc::new(raw),
            entry,
        }
    }

    /// The record as received.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The resolved catalog entry, if the record carries one.
    pub fn entry(&self) -> Option<&CatalogEntry> {
        self.entry.as_deref()
    }

    /// Record id, falling back to the entry id.
    pub fn id(&self) -> Option<String> {
        match self.raw.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => self.entry().and_then(CatalogEntry::id),
        }
    }
}

impl From<Value> for FilterableItem {
    fn from(raw: Value) -> Self {
        Self::new(raw)
    }
}

impl Serialize for FilterableItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FilterableItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::new)
    }
}

/// Unwrap a wrapper record, or treat the record as the entry itself.
/// A wrapper whose entry is missing or null resolves to nothing.
fn resolve_entry(raw: &Value) -> Option<CatalogEntry> {
    let object = raw.as_object()?;
    let mut wrapped = false;

    for (key, value) in object {
        if WRAPPER_KEYS.contains(&canonical_key(key).as_str()) {
            wrapped = true;
            if value.is_object() {
                return CatalogEntry::from_json(value);
            }
        }
    }

    if wrapped {
        None
    } else {
        CatalogEntry::from_json(raw)
    }
}
