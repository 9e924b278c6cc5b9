//! Result ordering.
//!
//! The sort key domain is the field's declared type, not the stored
//! value's shape: number fields compare as floats even when an attribute
//! rendered oddly, text compares lexicographically, booleans order by
//! truth. The Levenshtein variant keys each document by edit distance
//! from the query string; distances live in a parallel vector so the
//! documents themselves stay untouched.

use std::cmp::Ordering;

use super::errors::{ExecError, ExecResult};
use super::levenshtein;
use crate::query::{Direction, Sort};
use crate::schema::{FieldType, Schema};
use crate::storage::{Object, Objects};

/// Sorts result sets against a table schema.
pub struct ResultSorter;

impl ResultSorter {
    /// Reorders `objects` in place according to `sort`.
    pub fn sort(objects: &mut Objects, schema: &Schema, sort: &Sort) -> ExecResult<()> {
        let field_type = schema.field_type(&sort.field);

        if let Some(query) = &sort.levenshtein {
            if field_type != Some(FieldType::Text) {
                return Err(ExecError::LevenshteinOnNonText);
            }
            Self::sort_by_distance(objects, &sort.field, query, sort.direction);
            return Ok(());
        }

        match field_type {
            Some(FieldType::Text) => Self::sort_text(objects, &sort.field, sort.direction),
            Some(FieldType::Number) => Self::sort_number(objects, &sort.field, sort.direction),
            Some(FieldType::Boolean) => Self::sort_boolean(objects, &sort.field, sort.direction),
            None => return Err(ExecError::UnsortableField(sort.field.clone())),
        }

        Ok(())
    }

    fn sort_text(objects: &mut Objects, field: &str, direction: Direction) {
        let key = |o: &Object| o.rendered(field).unwrap_or_default();
        match direction {
            Direction::Asc => objects.as_mut_slice().sort_by_key(key),
            Direction::Desc => objects
                .as_mut_slice()
                .sort_by(|a, b| key(b).cmp(&key(a))),
        }
    }

    fn sort_number(objects: &mut Objects, field: &str, direction: Direction) {
        let key = |o: &Object| -> f64 {
            o.rendered(field)
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.0)
        };
        let cmp = move |a: &Object, b: &Object| -> Ordering { key(a).total_cmp(&key(b)) };
        match direction {
            Direction::Asc => objects.as_mut_slice().sort_by(cmp),
            Direction::Desc => objects.as_mut_slice().sort_by(move |a, b| cmp(b, a)),
        }
    }

    /// Asc puts `true` first, desc puts `false` first.
    fn sort_boolean(objects: &mut Objects, field: &str, direction: Direction) {
        let key = |o: &Object| o.attrs.get(field).map(|s| s.as_boolean()).unwrap_or(false);
        match direction {
            Direction::Asc => objects.as_mut_slice().sort_by_key(|o| !key(o)),
            Direction::Desc => objects.as_mut_slice().sort_by_key(key),
        }
    }

    fn sort_by_distance(objects: &mut Objects, field: &str, query: &str, direction: Direction) {
        let taken = std::mem::take(objects);

        let mut keyed: Vec<(usize, Object)> = taken
            .into_iter()
            .map(|object| {
                let value = object.rendered(field).unwrap_or_default();
                (levenshtein::distance(query, &value), object)
            })
            .collect();

        match direction {
            Direction::Asc => keyed.sort_by_key(|(distance, _)| *distance),
            Direction::Desc => keyed.sort_by_key(|(distance, _)| std::cmp::Reverse(*distance)),
        }

        *objects = keyed.into_iter().map(|(_, object)| object).collect();
    }
}
