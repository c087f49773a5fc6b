//! Filtering: note type normalization and the item matcher.

mod matcher;
mod note_type;

pub use matcher::Matcher;
pub use note_type::{normalize_note_type, normalize_note_type_or, note_types_match, DEFAULT_NOTE_TYPE};
