//! End-to-end query scenarios through the facade: create databases and
//! tables, insert documents, and run the filter/sort/page pipeline the
//! way a transport would.

use serde_json::{json, Value};
use tempfile::TempDir;

use nimbusdb::api::Api;
use nimbusdb::catalog::Registry;

fn fresh_api() -> (TempDir, Api) {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::open(dir.path()).unwrap();
    (dir, Api::new(registry))
}

/// d1.t with {a: Text indexed, b: Number indexed} and the three
/// documents used across scenarios.
fn seeded_api() -> (TempDir, Api) {
    let (dir, api) = fresh_api();

    api.create_database("d1").unwrap();
    api.create_table_in_database(
        "d1",
        "t",
        &json!({
            "a": {"type": "text", "indexed": true},
            "b": {"type": "number", "indexed": true},
        }),
    )
    .unwrap();

    for (a, b) in [("x", 1), ("y", 2), ("x", 3)] {
        api.insert_to_database_table("d1", "t", &json!({"a": a, "b": b}))
            .unwrap();
    }

    (dir, api)
}

fn results(api: &Api, request: Value) -> Vec<Value> {
    api.get_from_database_table("d1", "t", &request).unwrap()["results"]
        .as_array()
        .unwrap()
        .clone()
}

#[test]
fn equality_filter_finds_both_matches() {
    let (_dir, api) = seeded_api();

    let rows = results(&api, json!({"where": {"field": "a", "operator": "=", "value": "x"}}));

    assert_eq!(rows.len(), 2);
    let mut b_values: Vec<f64> = rows.iter().map(|r| r["b"].as_f64().unwrap()).collect();
    b_values.sort_by(f64::total_cmp);
    assert_eq!(b_values, [1.0, 3.0]);
}

#[test]
fn range_filter_with_ascending_sort() {
    let (_dir, api) = seeded_api();

    let rows = results(
        &api,
        json!({
            "where": {"field": "b", "operator": ">", "value": "1"},
            "sort": {"field": "b", "direction": "asc"},
        }),
    );

    let b_values: Vec<f64> = rows.iter().map(|r| r["b"].as_f64().unwrap()).collect();
    assert_eq!(b_values, [2.0, 3.0]);
}

#[test]
fn or_filter_sorted_and_limited() {
    let (_dir, api) = seeded_api();

    let rows = results(
        &api,
        json!({
            "where": {
                "field": "a", "operator": "=", "value": "x",
                "or": {"field": "a", "operator": "=", "value": "y"},
            },
            "sort": {"field": "a", "direction": "asc"},
            "limit": 2,
        }),
    );

    assert_eq!(rows.len(), 2);
    let a_values: Vec<&str> = rows.iter().map(|r| r["a"].as_str().unwrap()).collect();
    let mut sorted = a_values.clone();
    sorted.sort();
    assert_eq!(a_values, sorted);
}

#[test]
fn or_keeps_duplicates_when_both_sides_match() {
    let (_dir, api) = seeded_api();

    // a = "x" matches two documents; b < 2 matches the first again.
    let rows = results(
        &api,
        json!({"where": {
            "field": "a", "operator": "=", "value": "x",
            "or": {"field": "b", "operator": "<", "value": "2"},
        }}),
    );

    assert_eq!(rows.len(), 3);
}

#[test]
fn and_narrows_the_first_result_set() {
    let (_dir, api) = seeded_api();

    let rows = results(
        &api,
        json!({"where": {
            "field": "a", "operator": "=", "value": "x",
            "and": {"field": "b", "operator": ">", "value": "1"},
        }}),
    );

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["b"].as_f64(), Some(3.0));
}

#[test]
fn between_excludes_both_endpoints() {
    let (_dir, api) = seeded_api();

    let rows = results(
        &api,
        json!({"where": {"field": "b", "operator": "><", "value": "1-3"}}),
    );

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["b"].as_f64(), Some(2.0));
}

#[test]
fn levenshtein_sort_orders_by_edit_distance() {
    let (_dir, api) = fresh_api();

    api.create_database("d1").unwrap();
    api.create_table_in_database("d1", "t", &json!({"a": {"type": "text", "indexed": true}}))
        .unwrap();

    for word in ["hello", "help", "world"] {
        api.insert_to_database_table("d1", "t", &json!({"a": word}))
            .unwrap();
    }

    // Distances from "hello": hello 0, help 2, world 4.
    let rows = results(
        &api,
        json!({"sort": {"field": "a", "direction": "asc", "levenshtein": "hello"}}),
    );

    let words: Vec<&str> = rows.iter().map(|r| r["a"].as_str().unwrap()).collect();
    assert_eq!(words, ["hello", "help", "world"]);
}

#[test]
fn levenshtein_on_a_number_field_is_an_error() {
    let (_dir, api) = seeded_api();

    let err = api
        .get_from_database_table(
            "d1",
            "t",
            &json!({"sort": {"field": "b", "direction": "asc", "levenshtein": "q"}}),
        )
        .unwrap_err();

    assert!(err.to_string().contains("levenshtein"));
}

#[test]
fn empty_result_set_is_not_an_error() {
    let (_dir, api) = seeded_api();

    let rows = results(
        &api,
        json!({"where": {"field": "a", "operator": "=", "value": "absent"}}),
    );
    assert!(rows.is_empty());
}

#[test]
fn fields_outside_the_schema_are_accepted_but_not_queryable() {
    let (_dir, api) = seeded_api();

    api.insert_to_database_table("d1", "t", &json!({"a": "z", "stray": "value"}))
        .unwrap();

    // The stray attribute rides along on results found via schema fields.
    let rows = results(&api, json!({"where": {"field": "a", "operator": "=", "value": "z"}}));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["stray"].as_str(), Some("value"));

    // It is not indexed, so filtering on it finds nothing.
    let rows = results(
        &api,
        json!({"where": {"field": "stray", "operator": "=", "value": "value"}}),
    );
    assert!(rows.is_empty());
}

#[test]
fn paging_slices_with_endpoint_semantics() {
    let (_dir, api) = seeded_api();

    let all = results(&api, json!({"sort": {"field": "b", "direction": "asc"}}));
    assert_eq!(all.len(), 3);

    // skip and limit are the slice endpoints [1, 2).
    let rows = results(
        &api,
        json!({"sort": {"field": "b", "direction": "asc"}, "skip": 1, "limit": 2}),
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["b"].as_f64(), Some(2.0));

    // An out-of-range slice is an error, not a clamp.
    let err = api
        .get_from_database_table("d1", "t", &json!({"limit": 99}))
        .unwrap_err();
    assert!(err.to_string().contains("out of range"));
}

#[test]
fn identical_queries_return_identical_results() {
    let (_dir, api) = seeded_api();

    let request = json!({
        "where": {"field": "a", "operator": "=", "value": "x"},
        "sort": {"field": "b", "direction": "asc"},
    });

    assert_eq!(results(&api, request.clone()), results(&api, request));
}

#[test]
fn unknown_operator_is_rejected() {
    let (_dir, api) = seeded_api();

    let err = api
        .get_from_database_table(
            "d1",
            "t",
            &json!({"where": {"field": "a", "operator": "~", "value": "x"}}),
        )
        .unwrap_err();

    assert!(err.to_string().contains("operator not supported"));
}

#[test]
fn querying_a_missing_table_is_not_found() {
    let (_dir, api) = seeded_api();

    let err = api
        .get_from_database_table("d1", "ghost", &json!({}))
        .unwrap_err();
    assert!(err.to_string().contains("not found"));
}
