//! Mock metadata provider for testing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::catalog::{CategoryDefinition, CountryMetadata, SortOption, TypeDefinition};
use crate::metadata::{CatalogMetadataProvider, MetadataError};

/// Mock implementation of [`CatalogMetadataProvider`].
///
/// Provides controllable behavior for testing:
/// - Per-country metadata
/// - One-shot failures
/// - Per-country latency, to race loads against each other
#[derive(Debug, Default)]
pub struct MockMetadataProvider {
    /// Metadata by country id. Unknown countries return empty lists.
    metadata: Arc<RwLock<HashMap<String, CountryMetadata>>>,
    /// If set, the next call will fail with this error.
    next_error: Arc<RwLock<Option<MetadataError>>>,
    /// Simulated latency by country id.
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    /// Country ids of every `categories` call.
    requests: Arc<RwLock<Vec<String>>>,
}

impl MockMetadataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider preloaded with one country.
    pub fn with_metadata(metadata: CountryMetadata) -> Self {
        let mut map = HashMap::new();
        map.insert(metadata.country_id.clone(), metadata);
        Self {
            metadata: Arc::new(RwLock::new(map)),
            ..Self::default()
        }
    }

    pub async fn set_metadata(&self, metadata: CountryMetadata) {
        self.metadata
            .write()
            .await
            .insert(metadata.country_id.clone(), metadata);
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: MetadataError) {
        *self.next_error.write().await = Some(error);
    }

    /// Delay every call for a country.
    pub async fn set_delay(&self, country_id: &str, delay: Duration) {
        self.delays
            .write()
            .await
            .insert(country_id.to_string(), delay);
    }

    /// Countries whose categories were requested, in call order.
    pub async fn recorded_requests(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }

    async fn before_call(&self, country_id: &str) -> Result<(), MetadataError> {
        let delay = self.delays.read().await.get(country_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        Ok(())
    }

    async fn country(&self, country_id: &str) -> CountryMetadata {
        self.metadata
            .read()
            .await
            .get(country_id)
            .cloned()
            .unwrap_or_else(|| CountryMetadata::empty(country_id))
    }
}

#[async_trait]
impl CatalogMetadataProvider for MockMetadataProvider {
    async fn categories(&self, country_id: &str) -> Result<Vec<CategoryDefinition>, MetadataError> {
        self.requests.write().await.push(country_id.to_string());
        self.before_call(country_id).await?;
        Ok(self.country(country_id).await.categories)
    }

    async fn types(&self, country_id: &str) -> Result<Vec<TypeDefinition>, MetadataError> {
        self.before_call(country_id).await?;
        Ok(self.country(country_id).await.types)
    }

    async fn sort_options(&self, country_id: &str) -> Result<Vec<SortOption>, MetadataError> {
        self.before_call(country_id).await?;
        Ok(self.country(country_id).await.sort_options)
    }
}
