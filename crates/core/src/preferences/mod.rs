//! Filter preferences: persisted user choices, defaults, and the load cycle
//! that merges them into an effective [`FilterState`].

mod defaults;
mod loader;
mod sqlite;
mod store;
mod types;

pub use defaults::{compute_defaults, resolve_filter_state, FilterDefaults};
pub use loader::{LoadCycle, LoadPhase, LoadRequest, LoadResult};
pub use sqlite::SqlitePreferenceStore;
pub use store::{PreferenceError, PreferenceStore};
pub use types::{FilterPatch, FilterState, UserFilterPreference};
