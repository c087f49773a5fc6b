pub mod catalog;
pub mod config;
pub mod engine;
pub mod export;
pub mod grouping;
pub mod matching;
pub mod metadata;
pub mod metrics;
pub mod ordering;
pub mod preferences;
pub mod testing;

pub use catalog::{
    CatalogEntry, CategoryDefinition, CountryMetadata, FieldValue, FilterableItem, SortOption,
    TypeDefinition,
};
pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use engine::{CatalogEngine, CatalogView, EngineOptions, UpdateOutcome};
pub use export::{export_catalog, ExportColumn, ExportError, ExportOptions, ExportTable};
pub use grouping::{group_items, GroupItem, SultanGroup};
pub use matching::{normalize_note_type, Matcher};
pub use metadata::{CatalogMetadataProvider, MetadataError, SqliteMetadataStore};
pub use ordering::{compare_pick_numbers, PickNumber, SortKey};
pub use preferences::{
    FilterPatch, FilterState, LoadPhase, PreferenceError, PreferenceStore, SqlitePreferenceStore,
    UserFilterPreference,
};
