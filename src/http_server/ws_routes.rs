//! WebSocket transport.
//!
//! A long-lived bidirectional channel carrying the same operations as
//! the REST routes, method-dispatched. Every client frame must carry a
//! `requestId`; the reply echoes it verbatim and adds a numeric
//! `status` (200 or 500) so the client can correlate concurrent
//! requests. A failed socket write closes the connection.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};

use crate::api::Api;

/// Builds the `/ws` router.
pub fn routes(api: Arc<Api>) -> Router {
    Router::new().route("/ws", get(upgrade)).with_state(api)
}

async fn upgrade(State(api): State<Arc<Api>>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| serve_connection(socket, api))
}

async fn serve_connection(mut socket: WebSocket, api: Arc<Api>) {
    while let Some(message) = socket.recv().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) | Err(_) => return,
            // Pings are answered by axum; anything else is ignored.
            Ok(_) => continue,
        };

        if handle_frame(&mut socket, &api, &text).await {
            return;
        }
    }
}

/// Handles one frame. Returns `true` when the connection must close.
async fn handle_frame(socket: &mut WebSocket, api: &Api, text: &str) -> bool {
    let frame: Value = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(_) => return send_error(socket, "", "failed to parse JSON").await,
    };

    let request_id = match frame.get("requestId").and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => {
            return send_error(socket, "", "every request must have a requestId").await;
        }
    };

    match dispatch(api, &frame) {
        Ok(body) => send(socket, &request_id, 200, body).await,
        Err(message) => send_error(socket, &request_id, &message).await,
    }
}

/// Runs the method named in the frame against the facade.
fn dispatch(api: &Api, frame: &Value) -> Result<Value, String> {
    let method = frame
        .get("method")
        .and_then(Value::as_str)
        .ok_or_else(|| "no method specified".to_string())?;

    let text_param = |key: &str| -> Result<&str, String> {
        frame
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| format!("request must have a '{}'", key))
    };
    let json_param = |key: &str| -> Result<&Value, String> {
        frame
            .get(key)
            .ok_or_else(|| format!("request must have a '{}'", key))
    };

    let result = match method {
        "getDatabases" => api.get_databases(),
        "createDatabase" => api.create_database(text_param("name")?),
        "getDatabase" => api.get_database(text_param("name")?),
        "getDatabaseTables" => api.get_database_tables(text_param("name")?),
        "createTableInDatabase" => api.create_table_in_database(
            text_param("name")?,
            text_param("tableName")?,
            json_param("fields")?,
        ),
        "getFromDatabaseTable" => api.get_from_database_table(
            text_param("name")?,
            text_param("tableName")?,
            json_param("request")?,
        ),
        "insertToDatabaseTable" => api.insert_to_database_table(
            text_param("name")?,
            text_param("tableName")?,
            json_param("object")?,
        ),
        _ => return Err("method not found".to_string()),
    };

    result.map_err(|err| err.to_string())
}

/// Sends one reply frame. Returns `true` when the write failed and the
/// connection must close.
async fn send(socket: &mut WebSocket, request_id: &str, status: u16, mut body: Value) -> bool {
    if let Value::Object(map) = &mut body {
        map.insert("requestId".to_string(), json!(request_id));
        map.insert("status".to_string(), json!(status));
    }

    socket.send(Message::Text(body.to_string())).await.is_err()
}

async fn send_error(socket: &mut WebSocket, request_id: &str, message: &str) -> bool {
    send(socket, request_id, 500, json!({ "message": message })).await
}
