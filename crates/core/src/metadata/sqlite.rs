//! SQLite-backed metadata store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{params, Connection};

use super::{CatalogMetadataProvider, MetadataError};
use crate::catalog::{CategoryDefinition, SortOption, TypeDefinition};

/// Country taxonomy tables.
pub struct SqliteMetadataStore {
    conn: Mutex<Connection>,
}

impl SqliteMetadataStore {
    /// Open (or create) the database file and its tables.
    pub fn new(path: &Path) -> Result<Self, MetadataError> {
        let conn = Connection::open(path).map_err(|e| MetadataError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, MetadataError> {
        let conn =
            Connection::open_in_memory().map_err(|e| MetadataError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), MetadataError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                country_id TEXT NOT NULL,
                id TEXT NOT NULL,
                name TEXT NOT NULL,
                display_order INTEGER NOT NULL DEFAULT 0,
                item_count INTEGER,
                PRIMARY KEY (country_id, id)
            );

            CREATE TABLE IF NOT EXISTS note_types (
                country_id TEXT NOT NULL,
                id TEXT NOT NULL,
                name TEXT NOT NULL,
                display_order INTEGER NOT NULL DEFAULT 0,
                item_count INTEGER,
                PRIMARY KEY (country_id, id)
            );

            CREATE TABLE IF NOT EXISTS sort_options (
                country_id TEXT NOT NULL,
                id TEXT NOT NULL,
                name TEXT NOT NULL,
                field_name TEXT NOT NULL,
                is_required INTEGER NOT NULL DEFAULT 0,
                is_default INTEGER NOT NULL DEFAULT 0,
                display_order INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (country_id, id)
            );
            "#,
        )
        .map_err(|e| MetadataError::Database(e.to_string()))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, MetadataError> {
        self.conn
            .lock()
            .map_err(|_| MetadataError::Database("connection lock poisoned".to_string()))
    }

    pub fn upsert_category(
        &self,
        country_id: &str,
        category: &CategoryDefinition,
    ) -> Result<(), MetadataError> {
        self.lock()?
            .execute(
                "INSERT OR REPLACE INTO categories (country_id, id, name, display_order, item_count)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    country_id,
                    category.id,
                    category.name,
                    category.display_order,
                    category.count.map(|c| c as i64)
                ],
            )
            .map_err(|e| MetadataError::Database(e.to_string()))?;
        Ok(())
    }

    pub fn upsert_type(
        &self,
        country_id: &str,
        note_type: &TypeDefinition,
    ) -> Result<(), MetadataError> {
        self.lock()?
            .execute(
                "INSERT OR REPLACE INTO note_types (country_id, id, name, display_order, item_count)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    country_id,
                    note_type.id,
                    note_type.name,
                    note_type.display_order,
                    note_type.count.map(|c| c as i64)
                ],
            )
            .map_err(|e| MetadataError::Database(e.to_string()))?;
        Ok(())
    }

    pub fn upsert_sort_option(
        &self,
        country_id: &str,
        option: &SortOption,
    ) -> Result<(), MetadataError> {
        self.lock()?
            .execute(
                "INSERT OR REPLACE INTO sort_options
                    (country_id, id, name, field_name, is_required, is_default, display_order)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    country_id,
                    option.id,
                    option.name,
                    option.field_name,
                    option.is_required,
                    option.is_default,
                    option.display_order
                ],
            )
            .map_err(|e| MetadataError::Database(e.to_string()))?;
        Ok(())
    }

    fn load_categories(&self, country_id: &str) -> Result<Vec<CategoryDefinition>, MetadataError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, name, display_order, item_count FROM categories
                 WHERE country_id = ? ORDER BY display_order, name",
            )
            .map_err(|e| MetadataError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![country_id], |row| {
                let count: Option<i64> = row.get(3)?;
                Ok(CategoryDefinition {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    display_order: row.get(2)?,
                    count: count.map(|c| c.max(0) as u64),
                })
            })
            .map_err(|e| MetadataError::Database(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| MetadataError::Database(e.to_string()))
    }

    fn load_types(&self, country_id: &str) -> Result<Vec<TypeDefinition>, MetadataError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, name, display_order, item_count FROM note_types
                 WHERE country_id = ? ORDER BY display_order, name",
            )
            .map_err(|e| MetadataError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![country_id], |row| {
                let count: Option<i64> = row.get(3)?;
                Ok(TypeDefinition {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    display_order: row.get(2)?,
                    count: count.map(|c| c.max(0) as u64),
                })
            })
            .map_err(|e| MetadataError::Database(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| MetadataError::Database(e.to_string()))
    }

    fn load_sort_options(&self, country_id: &str) -> Result<Vec<SortOption>, MetadataError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, name, field_name, is_required, is_default, display_order
                 FROM sort_options WHERE country_id = ? ORDER BY display_order, name",
            )
            .map_err(|e| MetadataError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![country_id], |row| {
                Ok(SortOption {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    field_name: row.get(2)?,
                    is_required: row.get(3)?,
                    is_default: row.get(4)?,
                    display_order: row.get(5)?,
                })
            })
            .map_err(|e| MetadataError::Database(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| MetadataError::Database(e.to_string()))
    }
}

#[async_trait]
impl CatalogMetadataProvider for SqliteMetadataStore {
    async fn categories(&self, country_id: &str) -> Result<Vec<CategoryDefinition>, MetadataError> {
        self.load_categories(country_id)
    }

    async fn types(&self, country_id: &str) -> Result<Vec<TypeDefinition>, MetadataError> {
        self.load_types(country_id)
    }

    async fn sort_options(&self, country_id: &str) -> Result<Vec<SortOption>, MetadataError> {
        self.load_sort_options(country_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn seeded() -> SqliteMetadataStore {
        let store = SqliteMetadataStore::in_memory().unwrap();
        let metadata = fixtures::turkey_metadata();
        for c in &metadata.categories {
            store.upsert_category("tr", c).unwrap();
        }
        for t in &metadata.types {
            store.upsert_type("tr", t).unwrap();
        }
        for o in &metadata.sort_options {
            store.upsert_sort_option("tr", o).unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_country_metadata_round_trip() {
        let store = seeded();
        let loaded = store.country_metadata("tr").await.unwrap();
        let expected = fixtures::turkey_metadata();

        assert_eq!(loaded.country_id, "tr");
        assert_eq!(loaded.categories, expected.categories);
        assert_eq!(loaded.types, expected.types);
        assert_eq!(loaded.sort_options.len(), expected.sort_options.len());
        assert!(loaded
            .sort_options
            .iter()
            .any(|o| o.field_name == "extPick" && o.is_required));
    }

    #[tokio::test]
    async fn test_unknown_country_is_empty() {
        let store = seeded();
        let loaded = store.country_metadata("gr").await.unwrap();
        assert!(loaded.categories.is_empty());
        assert!(loaded.sort_options.is_empty());
    }

    #[tokio::test]
    async fn test_categories_ordered_by_display_order() {
        let store = SqliteMetadataStore::in_memory().unwrap();
        for (id, order) in [("b", 2), ("a", 1), ("c", 3)] {
            store
                .upsert_category(
                    "tr",
                    &CategoryDefinition {
                        id: id.to_string(),
                        name: id.to_uppercase(),
                        display_order: order,
                        count: Some(4),
                    },
                )
                .unwrap();
        }

        let ids: Vec<_> = store
            .categories("tr")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_upsert_replaces() {
        let store = seeded();
        let mut renamed = fixtures::turkey_metadata().categories[0].clone();
        renamed.name = "Ottoman".to_string();
        store.upsert_category("tr", &renamed).unwrap();

        let categories = store.categories("tr").await.unwrap();
        assert_eq!(categories.len(), 3);
        assert_eq!(categories[0].name, "Ottoman");
    }
}
