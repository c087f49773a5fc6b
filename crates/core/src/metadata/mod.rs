//! Country metadata: categories, note types and sort options.

mod sqlite;

pub use sqlite::SqliteMetadataStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::{CategoryDefinition, CountryMetadata, SortOption, TypeDefinition};

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Metadata source unavailable: {0}")]
    Unavailable(String),
}

/// Source of a country's catalog taxonomy.
#[async_trait]
pub trait CatalogMetadataProvider: Send + Sync {
    async fn categories(&self, country_id: &str) -> Result<Vec<CategoryDefinition>, MetadataError>;

    async fn types(&self, country_id: &str) -> Result<Vec<TypeDefinition>, MetadataError>;

    async fn sort_options(&self, country_id: &str) -> Result<Vec<SortOption>, MetadataError>;

    /// All three lists, fetched concurrently. Fails if any of them fails.
    async fn country_metadata(&self, country_id: &str) -> Result<CountryMetadata, MetadataError> {
        let (categories, types, sort_options) = futures::try_join!(
            self.categories(country_id),
            self.types(country_id),
            self.sort_options(country_id),
        )?;

        Ok(CountryMetadata {
            country_id: country_id.to_string(),
            categories,
            types,
            sort_options,
        })
    }
}
