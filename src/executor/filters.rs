//! In-memory re-filtering of a result set.
//!
//! Only the root predicate of a query consults the index; every `and`
//! child narrows the already-materialised results by reading each
//! candidate's attribute directly. Comparison happens in the same string
//! domain the index uses, so index and in-memory evaluation agree.
//! Documents missing the field never match.

use crate::storage::{Object, Objects};

fn parse_or_zero(s: &str) -> f64 {
    s.parse().unwrap_or(0.0)
}

/// Narrows an owned result set, preserving relative order.
pub struct ResultFilter;

impl ResultFilter {
    /// Keeps objects whose rendered value equals `key`.
    pub fn equal(objects: Objects, field: &str, key: &str) -> Objects {
        Self::keep(objects, field, |value| value == key)
    }

    /// Keeps objects whose rendered value differs from `key`.
    pub fn not_equal(objects: Objects, field: &str, key: &str) -> Objects {
        Self::keep(objects, field, |value| value != key)
    }

    /// Keeps objects strictly below `key`.
    pub fn smaller(objects: Objects, field: &str, key: &str, numeric: bool) -> Objects {
        if numeric {
            let bound = parse_or_zero(key);
            Self::keep(objects, field, |value| parse_or_zero(value) < bound)
        } else {
            Self::keep(objects, field, |value| value < key)
        }
    }

    /// Keeps objects strictly above `key`.
    pub fn larger(objects: Objects, field: &str, key: &str, numeric: bool) -> Objects {
        if numeric {
            let bound = parse_or_zero(key);
            Self::keep(objects, field, |value| parse_or_zero(value) > bound)
        } else {
            Self::keep(objects, field, |value| value > key)
        }
    }

    /// Keeps objects strictly between `lo` and `hi`.
    pub fn between(objects: Objects, field: &str, lo: &str, hi: &str, numeric: bool) -> Objects {
        if numeric {
            let lo = parse_or_zero(lo);
            let hi = parse_or_zero(hi);
            Self::keep(objects, field, |value| {
                let v = parse_or_zero(value);
                v > lo && v < hi
            })
        } else {
            Self::keep(objects, field, |value| value > lo && value < hi)
        }
    }

    fn keep(objects: Objects, field: &str, mut matches: impl FnMut(&str) -> bool) -> Objects {
        objects
            .into_iter()
            .filter(|object: &Object| {
                object
                    .rendered(field)
                    .is_some_and(|value| matches(&value))
            })
            .collect()
    }
}
