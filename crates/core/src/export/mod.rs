//! Spreadsheet export of catalog records.
//!
//! Records are ordered by catalog number, then rendered into the columns
//! that carry data. Mandatory columns are always kept.

mod csv;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::{canonical_key, CatalogEntry, FieldValue};
use crate::metrics;
use crate::ordering::PickNumber;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Record {index} is not an object: {found}")]
    InvalidRecord { index: usize, found: String },
}

/// A candidate output column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportColumn {
    /// Record field, any casing.
    pub key: String,
    pub header: String,
    /// Kept even when no row has a value.
    #[serde(default)]
    pub mandatory: bool,
}

impl ExportColumn {
    pub fn mandatory(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            mandatory: true,
        }
    }

    pub fn optional(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            mandatory: false,
        }
    }
}

/// The banknote column set, in output order.
pub fn default_export_columns() -> Vec<ExportColumn> {
    vec![
        ExportColumn::mandatory("extended_pick_number", "Extended Pick Number"),
        ExportColumn::optional("pick_number", "Pick Number"),
        ExportColumn::optional("turk_catalog_number", "Turk Catalog Number"),
        ExportColumn::mandatory("country", "Country"),
        ExportColumn::optional("category", "Category"),
        ExportColumn::optional("type", "Type"),
        ExportColumn::mandatory("face_value", "Face Value"),
        ExportColumn::optional("sultan", "Sultan"),
        ExportColumn::optional("gregorian_year", "Gregorian Year"),
        ExportColumn::optional("islamic_year", "Islamic Year"),
        ExportColumn::optional("signatures_front", "Signatures Front"),
        ExportColumn::optional("signatures_back", "Signatures Back"),
        ExportColumn::optional("seal_names", "Seal Names"),
        ExportColumn::optional("colors", "Colors"),
        ExportColumn::optional("printer", "Printer"),
        ExportColumn::optional("dimensions", "Dimensions"),
        ExportColumn::optional("rarity", "Rarity"),
        ExportColumn::optional("description", "Description"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Fields probed, in order, for each record's catalog number.
    pub number_fields: Vec<String>,
    pub columns: Vec<ExportColumn>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            number_fields: vec![
                "extended_pick_number".to_string(),
                "pick_number".to_string(),
            ],
            columns: default_export_columns(),
        }
    }
}

/// Rendered export: selected columns and one string cell per column per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportTable {
    pub columns: Vec<ExportColumn>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// RFC 4180 CSV with a header line and CRLF line endings.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        csv::write_record(&mut out, self.headers());
        for row in &self.rows {
            csv::write_record(&mut out, row.iter().map(String::as_str));
        }
        out
    }
}

/// Order records by catalog number and render the columns that carry data.
pub fn export_catalog(
    records: &[Value],
    options: &ExportOptions,
) -> Result<ExportTable, ExportError> {
    let entries = match parse_records(records) {
        Ok(entries) => entries,
        Err(e) => {
            metrics::EXPORTS_TOTAL.with_label_values(&["invalid"]).inc();
            return Err(e);
        }
    };

    let number_keys: Vec<String> = options
        .number_fields
        .iter()
        .map(|f| canonical_key(f))
        .collect();
    let mut keyed: Vec<(PickNumber, CatalogEntry)> = entries
        .into_iter()
        .map(|entry| (PickNumber::parse(&catalog_number(&entry, &number_keys)), entry))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));

    let cells: Vec<Vec<String>> = keyed
        .iter()
        .map(|(_, entry)| {
            options
                .columns
                .iter()
                .map(|column| entry.lookup(&column.key).map(cell).unwrap_or_default())
                .collect()
        })
        .collect();

    let keep: Vec<bool> = options
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| column.mandatory || cells.iter().any(|row| !row[i].is_empty()))
        .collect();

    let columns: Vec<ExportColumn> = options
        .columns
        .iter()
        .zip(&keep)
        .filter(|(_, keep)| **keep)
        .map(|(column, _)| column.clone())
        .collect();
    let rows: Vec<Vec<String>> = cells
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&keep)
                .filter(|(_, keep)| **keep)
                .map(|(cell, _)| cell)
                .collect()
        })
        .collect();

    debug!(
        dropped_columns = options.columns.len() - columns.len(),
        "Selected export columns"
    );
    info!(rows = rows.len(), columns = columns.len(), "Catalog exported");
    metrics::EXPORTS_TOTAL.with_label_values(&["success"]).inc();
    metrics::EXPORT_ROWS
        .with_label_values(&[])
        .observe(rows.len() as f64);

    Ok(ExportTable { columns, rows })
}

fn parse_records(records: &[Value]) -> Result<Vec<CatalogEntry>, ExportError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            CatalogEntry::from_json(record).ok_or_else(|| ExportError::InvalidRecord {
                index,
                found: json_kind(record).to_string(),
            })
        })
        .collect()
}

fn catalog_number(entry: &CatalogEntry, number_keys: &[String]) -> String {
    number_keys
        .iter()
        .filter_map(|key| entry.get(key))
        .find(|value| !value.is_blank())
        .map(ToString::to_string)
        .unwrap_or_default()
}

fn cell(value: &FieldValue) -> String {
    match value {
        FieldValue::Bool(true) => "Yes".to_string(),
        FieldValue::Bool(false) => "No".to_string(),
        FieldValue::List(items) => items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other if other.is_blank() => String::new(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
