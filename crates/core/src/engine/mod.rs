//! Engine facade: preference loading, filtering, sorting and grouping
//! behind one memoized view.

mod facade;
mod types;

pub use facade::CatalogEngine;
pub use types::{CatalogView, EngineOptions, UpdateOutcome};
