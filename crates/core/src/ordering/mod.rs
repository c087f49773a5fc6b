//! Sorting: the catalog number comparator, denominations and the
//! multi-key comparator chain.

mod chain;
mod face_value;
mod pick_number;

pub use chain::{compare_entries, compare_field_values, sort_items, SortKey};
pub use face_value::compare_face_values;
pub use pick_number::{compare_pick_numbers, PickNumber, Suffix};
