//! The query pipeline: filter -> sort -> page, in that fixed order.
//!
//! The root predicate of a `where` tree consults the index and
//! materialises matching objects from the store. Each `and` child
//! narrows those results in memory; each `or` child starts over from the
//! index (with whatever result set its parent started from) and appends
//! its matches without deduplication. A request with no `where` scans
//! the whole objects directory.

use super::errors::{ExecError, ExecResult};
use super::filters::ResultFilter;
use super::paging;
use super::sorter::ResultSorter;
use crate::index::Index;
use crate::query::{Combinator, Operator, Predicate, Request, Where};
use crate::schema::Schema;
use crate::storage::{ObjectStore, Objects};

/// Executes parsed requests against one table's schema, index and store.
pub struct Pipeline<'a> {
    schema: &'a Schema,
    index: &'a Index,
    store: &'a ObjectStore,
}

impl<'a> Pipeline<'a> {
    /// Borrows the table state a query runs against.
    pub fn new(schema: &'a Schema, index: &'a Index, store: &'a ObjectStore) -> Self {
        Self {
            schema,
            index,
            store,
        }
    }

    /// Runs the full pipeline for one request.
    pub fn run(&self, request: &Request) -> ExecResult<Objects> {
        let mut objects = match &request.where_clause {
            Some(node) => self.run_where(node, None)?,
            None => Objects::new(self.store.load_all()?),
        };

        if let Some(sort) = &request.sort {
            ResultSorter::sort(&mut objects, self.schema, sort)?;
        }

        paging::page(objects, request.skip, request.limit)
    }

    fn run_where(&self, node: &Where, previous: Option<&Objects>) -> ExecResult<Objects> {
        let mut objects = self.eval_predicate(&node.predicate, previous)?;

        for (combinator, child) in &node.children {
            match combinator {
                Combinator::And => {
                    objects = self.run_where(child, Some(&objects))?;
                }
                Combinator::Or => {
                    let other = self.run_where(child, previous)?;
                    objects.append(other);
                }
            }
        }

        Ok(objects)
    }

    /// Root predicates go through the index; predicates applied to an
    /// existing result set re-filter it in memory.
    fn eval_predicate(
        &self,
        predicate: &Predicate,
        previous: Option<&Objects>,
    ) -> ExecResult<Objects> {
        let field = predicate.field.as_str();
        let key = predicate.value.as_str();
        let numeric = self.schema.is_numeric(field);

        match previous {
            None => {
                let ids = match predicate.operator {
                    Operator::Equal => self.index.equal(field, key),
                    Operator::NotEqual => self.index.not_equal(field, key),
                    Operator::Larger => self.index.larger(field, key, numeric),
                    Operator::Smaller => self.index.smaller(field, key, numeric),
                    Operator::Between => {
                        let (lo, hi) = split_range(key)?;
                        self.index.between(field, lo, hi, numeric)
                    }
                };
                self.materialise(&ids)
            }
            Some(previous) => {
                let objects = previous.clone();
                Ok(match predicate.operator {
                    Operator::Equal => ResultFilter::equal(objects, field, key),
                    Operator::NotEqual => ResultFilter::not_equal(objects, field, key),
                    Operator::Larger => ResultFilter::larger(objects, field, key, numeric),
                    Operator::Smaller => ResultFilter::smaller(objects, field, key, numeric),
                    Operator::Between => {
                        let (lo, hi) = split_range(key)?;
                        ResultFilter::between(objects, field, lo, hi, numeric)
                    }
                })
            }
        }
    }

    fn materialise(&self, ids: &[String]) -> ExecResult<Objects> {
        let mut objects = Vec::with_capacity(ids.len());
        for id in ids {
            objects.push(self.store.read(id)?);
        }
        Ok(Objects::new(objects))
    }
}

/// Splits a `><` value on its first `-` into the exclusive bounds.
fn split_range(value: &str) -> ExecResult<(&str, &str)> {
    value
        .split_once('-')
        .ok_or_else(|| ExecError::MalformedRange(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parse_request;
    use crate::storage::{Object, Scalar};
    use serde_json::json;
    use std::collections::BTreeMap;

    /// Builds a populated table-in-a-tempdir: schema, store and the
    /// index an insert path would have produced.
    fn fixture(dir: &std::path::Path) -> (Schema, Index, ObjectStore) {
        let schema = Schema::from_fields(&json!({
            "a": {"type": "text", "indexed": true},
            "b": {"type": "number", "indexed": true},
        }))
        .unwrap();

        let store = ObjectStore::create(dir.join("objects")).unwrap();
        let mut index = Index::new();

        let rows: [(&str, &str, f64); 3] = [("1", "x", 1.0), ("2", "y", 2.0), ("3", "x", 3.0)];
        for (id, a, b) in rows {
            let mut attrs = BTreeMap::new();
            attrs.insert("a".to_string(), Scalar::Text(a.into()));
            attrs.insert("b".to_string(), Scalar::Number(b));
            let object = Object::new(id, attrs);
            store.write(&object).unwrap();
            for field in ["a", "b"] {
                index.add(field, object.rendered(field).unwrap(), object.id.clone());
            }
        }

        (schema, index, store)
    }

    fn run(dir: &std::path::Path, envelope: serde_json::Value) -> ExecResult<Objects> {
        let (schema, index, store) = fixture(dir);
        let request = parse_request(&envelope).unwrap();
        Pipeline::new(&schema, &index, &store).run(&request)
    }

    fn sorted_ids(objects: &Objects) -> Vec<String> {
        let mut ids: Vec<String> = objects.iter().map(|o| o.id.clone()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn root_equal_goes_through_the_index() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(
            dir.path(),
            json!({"where": {"field": "a", "operator": "=", "value": "x"}}),
        )
        .unwrap();
        assert_eq!(sorted_ids(&result), ["1", "3"]);
    }

    #[test]
    fn and_child_narrows_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(
            dir.path(),
            json!({"where": {
                "field": "a", "operator": "=", "value": "x",
                "and": {"field": "b", "operator": ">", "value": "1"},
            }}),
        )
        .unwrap();
        assert_eq!(sorted_ids(&result), ["3"]);
    }

    #[test]
    fn or_child_appends_without_dedup() {
        let dir = tempfile::tempdir().unwrap();
        // Both branches match object 1: it appears twice.
        let result = run(
            dir.path(),
            json!({"where": {
                "field": "a", "operator": "=", "value": "x",
                "or": {"field": "b", "operator": "<", "value": "2"},
            }}),
        )
        .unwrap();
        assert_eq!(sorted_ids(&result), ["1", "1", "3"]);
    }

    #[test]
    fn no_where_scans_the_whole_table() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(dir.path(), json!({})).unwrap();
        assert_eq!(sorted_ids(&result), ["1", "2", "3"]);
    }

    #[test]
    fn filter_sort_page_compose_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(
            dir.path(),
            json!({
                "where": {"field": "b", "operator": ">", "value": "0"},
                "sort": {"field": "b", "direction": "desc"},
                "limit": 2,
            }),
        )
        .unwrap();
        let ids: Vec<_> = result.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["3", "2"]);
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(
            dir.path(),
            json!({"where": {"field": "a", "operator": "=", "value": "nope"}}),
        )
        .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn malformed_between_value_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(
            dir.path(),
            json!({"where": {"field": "b", "operator": "><", "value": "37"}}),
        );
        assert!(matches!(result, Err(ExecError::MalformedRange(_))));
    }

    #[test]
    fn between_excludes_both_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(
            dir.path(),
            json!({"where": {"field": "b", "operator": "><", "value": "1-3"}}),
        )
        .unwrap();
        assert_eq!(sorted_ids(&result), ["2"]);
    }

    #[test]
    fn pipeline_is_deterministic_for_identical_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let envelope = json!({
            "where": {"field": "a", "operator": "=", "value": "x"},
            "sort": {"field": "b", "direction": "asc"},
        });
        let first = run(dir.path(), envelope.clone()).unwrap();

        let dir2 = tempfile::tempdir().unwrap();
        let second = run(dir2.path(), envelope).unwrap();
        assert_eq!(
            first.iter().map(|o| &o.id).collect::<Vec<_>>(),
            second.iter().map(|o| &o.id).collect::<Vec<_>>()
        );
    }
}
