//! REST routes.
//!
//! Request bodies are free-form JSON; the handlers pull out the keys
//! they need and hand the rest to the facade untouched. Any facade
//! error becomes a 500 with the error message in the body.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::api::Api;
use crate::catalog::CatalogResult;

/// Builds the REST router.
pub fn routes(api: Arc<Api>) -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/databases", get(get_databases))
        .route("/database", post(create_database))
        .route("/database/:name", get(get_database))
        .route("/database/:name/tables", get(get_database_tables))
        .route("/database/:name/table", post(create_table_in_database))
        .route(
            "/database/:name/table/:tableName/get",
            post(get_from_database_table),
        )
        .route(
            "/database/:name/table/:tableName/insert",
            post(insert_to_database_table),
        )
        .with_state(api)
}

fn respond(result: CatalogResult<Value>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(err) => error_response(err.to_string()),
    }
}

fn error_response(message: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": message.into() })),
    )
        .into_response()
}

async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello world" }))
}

async fn get_databases(State(api): State<Arc<Api>>) -> Response {
    respond(api.get_databases())
}

async fn create_database(State(api): State<Arc<Api>>, Json(body): Json<Value>) -> Response {
    match body.get("name").and_then(Value::as_str) {
        Some(name) => respond(api.create_database(name)),
        None => error_response("request body must contain 'name'"),
    }
}

async fn get_database(State(api): State<Arc<Api>>, Path(name): Path<String>) -> Response {
    respond(api.get_database(&name))
}

async fn get_database_tables(State(api): State<Arc<Api>>, Path(name): Path<String>) -> Response {
    respond(api.get_database_tables(&name))
}

async fn create_table_in_database(
    State(api): State<Arc<Api>>,
    Path(name): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let Some(table_name) = body.get("name").and_then(Value::as_str) else {
        return error_response("request body must contain 'name'");
    };
    let Some(fields) = body.get("fields") else {
        return error_response("request body must contain 'fields'");
    };

    respond(api.create_table_in_database(&name, table_name, fields))
}

async fn get_from_database_table(
    State(api): State<Arc<Api>>,
    Path((name, table_name)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    respond(api.get_from_database_table(&name, &table_name, &body))
}

async fn insert_to_database_table(
    State(api): State<Arc<Api>>,
    Path((name, table_name)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    respond(api.insert_to_database_table(&name, &table_name, &body))
}
