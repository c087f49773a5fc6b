//! SQLite-backed preference store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::{PreferenceError, PreferenceStore, UserFilterPreference};

/// Preferences stored as JSON id lists, one row per `(user_id, country_id)`.
pub struct SqlitePreferenceStore {
    conn: Mutex<Connection>,
}

impl SqlitePreferenceStore {
    /// Open (or create) the database file and its tables.
    pub fn new(path: &Path) -> Result<Self, PreferenceError> {
        let conn = Connection::open(path).map_err(|e| PreferenceError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, PreferenceError> {
        let conn =
            Connection::open_in_memory().map_err(|e| PreferenceError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), PreferenceError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS filter_preferences (
                user_id TEXT NOT NULL,
                country_id TEXT NOT NULL,
                selected_categories TEXT NOT NULL,
                selected_types TEXT NOT NULL,
                selected_sort_options TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (user_id, country_id)
            );
            "#,
        )
        .map_err(|e| PreferenceError::Database(e.to_string()))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, PreferenceError> {
        self.conn
            .lock()
            .map_err(|_| PreferenceError::Database("connection lock poisoned".to_string()))
    }

    /// Insert or replace a user's preference. The engine never writes;
    /// this is for seeding and for the host application.
    pub fn save(
        &self,
        user_id: &str,
        country_id: &str,
        preference: &UserFilterPreference,
    ) -> Result<(), PreferenceError> {
        let categories = to_json(&preference.selected_categories)?;
        let types = to_json(&preference.selected_types)?;
        let sort_options = to_json(&preference.selected_sort_options)?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO filter_preferences
                (user_id, country_id, selected_categories, selected_types, selected_sort_options, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user_id, country_id) DO UPDATE SET
                selected_categories = excluded.selected_categories,
                selected_types = excluded.selected_types,
                selected_sort_options = excluded.selected_sort_options,
                updated_at = excluded.updated_at",
            params![
                user_id,
                country_id,
                categories,
                types,
                sort_options,
                Utc::now().to_rfc3339()
            ],
        )
        .map_err(|e| PreferenceError::Database(e.to_string()))?;

        Ok(())
    }

    fn load(
        &self,
        user_id: &str,
        country_id: &str,
    ) -> Result<Option<UserFilterPreference>, PreferenceError> {
        let conn = self.lock()?;
        let row: Option<(String, String, String)> = conn
            .query_row(
                "SELECT selected_categories, selected_types, selected_sort_options
                 FROM filter_preferences WHERE user_id = ?1 AND country_id = ?2",
                params![user_id, country_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(|e| PreferenceError::Database(e.to_string()))?;

        let Some((categories, types, sort_options)) = row else {
            return Ok(None);
        };

        Ok(Some(UserFilterPreference {
            selected_categories: from_json(&categories)?,
            selected_types: from_json(&types)?,
            selected_sort_options: from_json(&sort_options)?,
        }))
    }
}

#[async_trait]
impl PreferenceStore for SqlitePreferenceStore {
    async fn get(
        &self,
        user_id: &str,
        country_id: &str,
    ) -> Result<Option<UserFilterPreference>, PreferenceError> {
        self.load(user_id, country_id)
    }
}

fn to_json(ids: &[String]) -> Result<String, PreferenceError> {
    serde_json::to_string(ids).map_err(|e| PreferenceError::Serialization(e.to_string()))
}

fn from_json(raw: &str) -> Result<Vec<String>, PreferenceError> {
    serde_json::from_str(raw).map_err(|e| PreferenceError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preference() -> UserFilterPreference {
        UserFilterPreference {
            selected_categories: vec!["c1".to_string(), "c2".to_string()],
            selected_types: vec!["t1".to_string()],
            selected_sort_options: vec!["s3".to_string()],
        }
    }

    #[tokio::test]
    async fn test_missing_preference_is_none() {
        let store = SqlitePreferenceStore::in_memory().unwrap();
        assert!(store.get("u1", "tr").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_get() {
        let store = SqlitePreferenceStore::in_memory().unwrap();
        store.save("u1", "tr", &preference()).unwrap();

        assert_eq!(store.get("u1", "tr").await.unwrap(), Some(preference()));
        assert!(store.get("u1", "gr").await.unwrap().is_none());
        assert!(store.get("u2", "tr").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_existing_row() {
        let store = SqlitePreferenceStore::in_memory().unwrap();
        store.save("u1", "tr", &preference()).unwrap();
        store
            .save("u1", "tr", &UserFilterPreference::default())
            .unwrap();

        let loaded = store.get("u1", "tr").await.unwrap().unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.db");

        SqlitePreferenceStore::new(&path)
            .unwrap()
            .save("u1", "tr", &preference())
            .unwrap();

        let reopened = SqlitePreferenceStore::new(&path).unwrap();
        assert_eq!(reopened.get("u1", "tr").await.unwrap(), Some(preference()));
    }

    #[tokio::test]
    async fn test_corrupt_row_is_serialization_error() {
        let store = SqlitePreferenceStore::in_memory().unwrap();
        store
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO filter_preferences VALUES ('u1', 'tr', 'not json', '[]', '[]', '')",
                [],
            )
            .unwrap();

        let err = store.get("u1", "tr").await.unwrap_err();
        assert!(matches!(err, PreferenceError::Serialization(_)));
    }
}
