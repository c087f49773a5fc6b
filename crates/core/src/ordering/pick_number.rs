//! Catalog ("pick") number ordering.
//!
//! A pick number is a base integer with an optional variant suffix:
//! `5`, `5a`, `5a1`, `5aa`, `5A`, `5AB`. Numbers sort by base first, then by
//! suffix class, then by rank within the class, then by raw suffix.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex_lite::Regex;

static LOWER_VARIANT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z])(\d+)?$").expect("valid regex"));
static LOWER_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z]{2,})(\d+)?$").expect("valid regex"));
static UPPER_VARIANT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]$").expect("valid regex"));
static UPPER_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z]+$").expect("valid regex"));

/// Shape of the text following the base number, in sort order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Suffix {
    /// `5`
    Empty,
    /// `5a`, `5a1`
    Lower { letter: char, variant: u64 },
    /// `5aa`, `5ab12`
    LowerRun { letters: String, variant: u64 },
    /// `5A`
    Upper { letter: char },
    /// `5AB`, `5Abs`; only the first letter ranks.
    UpperRun { first: char },
    /// Anything else.
    Other,
}

impl Suffix {
    fn classify(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Empty;
        }
        if let Some(caps) = LOWER_VARIANT.captures(raw) {
            return Self::Lower {
                letter: first_char(&caps[1]),
                variant: caps.get(2).map_or(0, |m| parse_saturating(m.as_str())),
            };
        }
        if let Some(caps) = LOWER_RUN.captures(raw) {
            return Self::LowerRun {
                letters: caps[1].to_string(),
                variant: caps.get(2).map_or(0, |m| parse_saturating(m.as_str())),
            };
        }
        if UPPER_VARIANT.is_match(raw) {
            return Self::Upper {
                letter: first_char(raw),
            };
        }
        if UPPER_RUN.is_match(raw) {
            return Self::UpperRun {
                first: first_char(raw),
            };
        }
        Self::Other
    }

    fn group(&self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Lower { .. } => 1,
            Self::LowerRun { .. } => 2,
            Self::Upper { .. } => 3,
            Self::UpperRun { .. } => 4,
            Self::Other => 5,
        }
    }
}

/// A parsed pick number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickNumber {
    base: u64,
    suffix: Suffix,
    raw_suffix: String,
}

impl PickNumber {
    /// Parse after trimming. A missing base number parses as `0`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let digits_end = raw
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(raw.len());
        let (digits, rest) = raw.split_at(digits_end);

        Self {
            base: parse_saturating(digits),
            suffix: Suffix::classify(rest),
            raw_suffix: rest.to_string(),
        }
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn suffix(&self) -> &Suffix {
        &self.suffix
    }

    pub fn raw_suffix(&self) -> &str {
        &self.raw_suffix
    }
}

impl Ord for PickNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.base
            .cmp(&other.base)
            .then_with(|| self.suffix.group().cmp(&other.suffix.group()))
            .then_with(|| self.suffix.cmp(&other.suffix))
            .then_with(|| self.raw_suffix.cmp(&other.raw_suffix))
    }
}

impl PartialOrd for PickNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two raw pick numbers.
pub fn compare_pick_numbers(a: &str, b: &str) -> Ordering {
    PickNumber::parse(a).cmp(&PickNumber::parse(b))
}

fn parse_saturating(digits: &str) -> u64 {
    digits.bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    })
}

fn first_char(s: &str) -> char {
    s.chars().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(input: &[&str]) -> Vec<String> {
        let mut values: Vec<String> = input.iter().map(|s| s.to_string()).collect();
        values.sort_by(|a, b| compare_pick_numbers(a, b));
        values
    }

    #[test]
    fn test_suffix_class_order() {
        assert_eq!(
            sorted(&["5AB", "5A", "5aa", "5a1", "5a", "5"]),
            vec!["5", "5a", "5a1", "5aa", "5A", "5AB"]
        );
    }

    #[test]
    fn test_base_dominates_suffix() {
        assert_eq!(compare_pick_numbers("5ZZ", "10"), Ordering::Less);
        assert_eq!(compare_pick_numbers("10", "9b"), Ordering::Greater);
        assert_eq!(sorted(&["100", "20", "3"]), vec!["3", "20", "100"]);
    }

    #[test]
    fn test_lower_variants() {
        assert_eq!(compare_pick_numbers("5a2", "5a10"), Ordering::Less);
        assert_eq!(compare_pick_numbers("5a99", "5b"), Ordering::Less);
    }

    #[test]
    fn test_lower_run_with_digits() {
        assert_eq!(
            PickNumber::parse("5ab12").suffix(),
            &Suffix::LowerRun {
                letters: "ab".to_string(),
                variant: 12
            }
        );
        assert_eq!(compare_pick_numbers("5ab2", "5ab12"), Ordering::Less);
        assert_eq!(compare_pick_numbers("5ab12", "5b"), Ordering::Greater);
        assert_eq!(compare_pick_numbers("5aa9", "5ab1"), Ordering::Less);
    }

    #[test]
    fn test_upper_run_ranks_by_first_letter_then_raw() {
        assert_eq!(compare_pick_numbers("5AZ", "5BA"), Ordering::Less);
        assert_eq!(compare_pick_numbers("5Ab", "5AB"), Ordering::Greater);
    }

    #[test]
    fn test_malformed_numbers_sort_first() {
        let p = PickNumber::parse("abc");
        assert_eq!(p.base(), 0);
        assert_eq!(compare_pick_numbers("abc", "1"), Ordering::Less);
        assert_eq!(compare_pick_numbers("", "1"), Ordering::Less);
    }

    #[test]
    fn test_other_suffixes_sort_last_within_base() {
        assert_eq!(PickNumber::parse("5-1").suffix(), &Suffix::Other);
        assert_eq!(compare_pick_numbers("5AB", "5-1"), Ordering::Less);
        assert_eq!(compare_pick_numbers("5-1", "5-2"), Ordering::Less);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(compare_pick_numbers(" 12a ", "12a"), Ordering::Equal);
    }

    #[test]
    fn test_huge_base_saturates() {
        let p = PickNumber::parse("99999999999999999999999a");
        assert_eq!(p.base(), u64::MAX);
        assert_eq!(p.raw_suffix(), "a");
    }

    #[test]
    fn test_order_is_total_and_antisymmetric() {
        let values = ["", "0", "1", "1a", "1a1", "1aa", "1A", "1AB", "1x-", "2", "b"];
        for a in values {
            for b in values {
                assert_eq!(
                    compare_pick_numbers(a, b),
                    compare_pick_numbers(b, a).reverse(),
                    "{} vs {}",
                    a,
                    b
                );
            }
        }
    }
}
