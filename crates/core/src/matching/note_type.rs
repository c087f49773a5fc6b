//! Note type normalization.
//!
//! Type labels come from years of hand-entered data ("Issued Note",
//! "issued notes", "SPECIMEN", "Annulé / Cancelled"...). They are folded
//! into a small set of canonical buckets before comparison.

/// Label assumed when an entry has no type.
pub const DEFAULT_NOTE_TYPE: &str = "Issued notes";

/// Buckets in priority order; the first rule whose needle occurs wins.
const TYPE_RULES: &[(&[&str], &str)] = &[
    (&["specimen"], "specimens"),
    (&["cancel", "annul"], "cancelled & annule"),
    (&["trial"], "trial note"),
    (&["error"], "error banknote"),
    (&["counterfeit", "forgery"], "counterfeit banknote"),
    (&["emergency"], "emergency note"),
    (&["check", "cheque", "bond"], "check & bond notes"),
    (&["issued"], "issued notes"),
];

/// Normalize a type label into its canonical bucket.
///
/// Absent or blank labels are treated as [`DEFAULT_NOTE_TYPE`]. Labels that
/// match no bucket come back lower-cased and trimmed.
pub fn normalize_note_type(label: Option<&str>) -> String {
    normalize_note_type_or(label, DEFAULT_NOTE_TYPE)
}

/// Same as [`normalize_note_type`] with a caller-chosen default label.
pub fn normalize_note_type_or(label: Option<&str>, default_label: &str) -> String {
    let label = label
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default_label);
    let lower = label.trim().to_lowercase();

    TYPE_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| lower.contains(needle)))
        .map(|(_, bucket)| bucket.to_string())
        .unwrap_or(lower)
}

/// Whether two normalized labels denote the same type.
///
/// Exact equality, or one containing the other (legacy partial labels such
/// as "trial" against "trial note").
pub fn note_types_match(normalized_a: &str, normalized_b: &str) -> bool {
    if normalized_a.is_empty() || normalized_b.is_empty() {
        return normalized_a == normalized_b;
    }
    normalized_a == normalized_b
        || normalized_a.contains(normalized_b)
        || normalized_b.contains(normalized_a)
}
