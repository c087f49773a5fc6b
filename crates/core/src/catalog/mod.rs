//! Catalog data model.
//!
//! Items arrive as loosely-shaped JSON records (catalog entries, or
//! collection/wishlist/marketplace rows wrapping one). They are resolved
//! and canonicalized here, once, before any filtering or sorting happens.

mod item;
mod schema;
mod types;

pub use item::{CatalogEntry, FilterableItem, WRAPPER_KEYS};
pub use schema::{canonical_key, EntryField, FieldValue};
pub use types::*;
