//! In-memory secondary index.
//!
//! Two-level mapping from field name to stringified value to the ids of
//! the objects carrying that value. The index is rebuilt from the object
//! store at table open and mutated on every insert of an indexed field;
//! it is never persisted. Bucket iteration order is unspecified, so
//! callers that need an order must sort the materialised results.

use std::collections::HashMap;

/// Secondary index of one table.
#[derive(Debug, Default)]
pub struct Index {
    fields: HashMap<String, HashMap<String, Vec<String>>>,
}

/// Numeric comparisons mirror the insert-side stringification: keys that
/// fail to parse take the zero value rather than failing the query.
fn parse_or_zero(s: &str) -> f64 {
    s.parse().unwrap_or(0.0)
}

impl Index {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `id` under `(field, value)`.
    pub fn add(&mut self, field: &str, value: String, id: String) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .entry(value)
            .or_default()
            .push(id);
    }

    /// Ids whose value equals `key`. Empty when the bucket (or the whole
    /// field) is absent.
    pub fn equal(&self, field: &str, key: &str) -> Vec<String> {
        self.fields
            .get(field)
            .and_then(|buckets| buckets.get(key))
            .cloned()
            .unwrap_or_default()
    }

    /// Ids of every bucket whose value differs from `key`.
    pub fn not_equal(&self, field: &str, key: &str) -> Vec<String> {
        self.collect(field, |value| value != key)
    }

    /// Ids of buckets strictly below `key`.
    pub fn smaller(&self, field: &str, key: &str, numeric: bool) -> Vec<String> {
        if numeric {
            let bound = parse_or_zero(key);
            self.collect(field, |value| parse_or_zero(value) < bound)
        } else {
            self.collect(field, |value| value < key)
        }
    }

    /// Ids of buckets strictly above `key`.
    pub fn larger(&self, field: &str, key: &str, numeric: bool) -> Vec<String> {
        if numeric {
            let bound = parse_or_zero(key);
            self.collect(field, |value| parse_or_zero(value) > bound)
        } else {
            self.collect(field, |value| value > key)
        }
    }

    /// Ids of buckets strictly between `lo` and `hi` (both ends excluded).
    pub fn between(&self, field: &str, lo: &str, hi: &str, numeric: bool) -> Vec<String> {
        if numeric {
            let lo = parse_or_zero(lo);
            let hi = parse_or_zero(hi);
            self.collect(field, |value| {
                let v = parse_or_zero(value);
                v > lo && v < hi
            })
        } else {
            self.collect(field, |value| value > lo && value < hi)
        }
    }

    /// Flattened (value, id) pairs for one field, for invariant checks.
    pub fn entries(&self, field: &str) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .fields
            .get(field)
            .into_iter()
            .flat_map(|buckets| {
                buckets.iter().flat_map(|(value, ids)| {
                    ids.iter().map(move |id| (value.clone(), id.clone()))
                })
            })
            .collect();
        pairs.sort();
        pairs
    }

    fn collect(&self, field: &str, mut keep: impl FnMut(&str) -> bool) -> Vec<String> {
        let mut ids = Vec::new();

        if let Some(buckets) = self.fields.get(field) {
            for (value, bucket) in buckets {
                if keep(value) {
                    ids.extend(bucket.iter().cloned());
                }
            }
        }

        ids
    }
}
