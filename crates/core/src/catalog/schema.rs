//! Schema mapping for upstream catalog records.
//!
//! Data sources disagree on field naming (`faceValue`, `face_value`,
//! `FaceValue`, `sultanName`, nested `category: {name}`...). Every key is
//! canonicalized to snake_case once, when a record enters the engine, so
//! that lookups afterwards only probe `<key>` and `<key>_name`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A scalar (or flat list) value carried by a catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Convert a JSON value. Nulls and objects have no field value.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null | Value::Object(_) => None,
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Array(items) => Some(Self::List(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        Value::Bool(b) => Some(b.to_string()),
                        _ => None,
                    })
                    .collect(),
            )),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric reading of the value; numeric text counts.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// True when the value carries nothing worth showing.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.iter().all(|s| s.trim().is_empty()),
            Self::Number(n) => !n.is_finite(),
            Self::Bool(_) => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

/// Convert a field name in any common casing to snake_case.
///
/// `extPick` -> `ext_pick`, `SultanName` -> `sultan_name`,
/// `face-value` -> `face_value`, `HTMLTitle` -> `html_title`.
pub fn canonical_key(raw: &str) -> String {
    let chars: Vec<char> = raw.trim().chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }

        if c.is_uppercase() {
            let prev = if i > 0 { Some(chars[i - 1]) } else { None };
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Fields the engine reads by meaning rather than by configured name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryField {
    Id,
    Category,
    CategoryId,
    Series,
    NoteType,
    Authority,
    FaceValue,
    CatalogNumber,
    CreatedAt,
}

impl EntryField {
    /// Canonical keys probed for this field, best first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Id => &["id"],
            Self::Category => &["category", "category_name"],
            Self::CategoryId => &["category_id"],
            Self::Series => &["series", "series_name"],
            Self::NoteType => &["type", "type_name", "note_type"],
            Self::Authority => &["sultan", "sultan_name", "authority", "authority_name"],
            Self::FaceValue => &["face_value", "denomination"],
            Self::CatalogNumber => &[
                "extended_pick_number",
                "ext_pick",
                "pick_number",
                "catalog_number",
            ],
            Self::CreatedAt => &["created_at", "inserted_at", "date_added"],
        }
    }
}
