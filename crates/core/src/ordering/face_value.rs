//! Denomination ordering.

use std::cmp::Ordering;

use crate::catalog::FieldValue;

/// Compare two face values.
///
/// Kurush denominations sort before everything else, so a kurush value
/// always precedes a lira one. Within that split the digits (and decimal
/// point) are extracted and compared numerically; values with no number
/// sort first.
pub fn compare_face_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    let (a_unit, a_amount) = face_key(a);
    let (b_unit, b_amount) = face_key(b);
    a_unit.cmp(&b_unit).then_with(|| match (a_amount, b_amount) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    })
}

/// `(unit rank, amount)`; kurush ranks 0, anything else 1.
fn face_key(value: Option<&FieldValue>) -> (u8, Option<f64>) {
    match value {
        Some(FieldValue::Number(n)) if n.is_finite() => (1, Some(*n)),
        Some(FieldValue::Text(s)) => {
            let unit = if s.to_lowercase().contains("kurush") { 0 } else { 1 };
            let digits: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            (unit, digits.parse::<f64>().ok())
        }
        _ => (1, None),
    }
}
