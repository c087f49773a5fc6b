use std::sync::Arc;

use pickbook_core::{CatalogMetadataProvider, Config, ExportOptions, PreferenceStore};

/// Shared application state
pub struct AppState {
    config: Config,
    metadata: Arc<dyn CatalogMetadataProvider>,
    preferences: Arc<dyn PreferenceStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        metadata: Arc<dyn CatalogMetadataProvider>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            config,
            metadata,
            preferences,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn metadata(&self) -> Arc<dyn CatalogMetadataProvider> {
        Arc::clone(&self.metadata)
    }

    pub fn preferences(&self) -> Arc<dyn PreferenceStore> {
        Arc::clone(&self.preferences)
    }

    /// Export options from the `[export]` section.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions::from(&self.config.export)
    }
}
