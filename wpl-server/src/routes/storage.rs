//! The key-value endpoint the planner's sync bridge talks to.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::info;
use wpl_core::constants::STORAGE_ENDPOINT;
use wpl_core::WplResult;
use wpl_core::kv::{FileStore, KeyValueStore};
use wpl_core::sync::protocol::{Ack, KeyValue, StorageQuery, SyncRequest};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(STORAGE_ENDPOINT, get(read).post(write))
}

/// GET ?all=1 - every namespaced key, GET ?key=k - one key
async fn read(
    State(state): State<AppState>,
    Query(query): Query<StorageQuery>,
) -> Result<Response, AppError> {
    let store = state.store.read().await;

    if query.wants_all() {
        let entries: BTreeMap<String, String> = store.snapshot(&state.namespace);
        return Ok(Json(entries).into_response());
    }

    let Some(key) = query.key else {
        return Err(AppError::bad_request("Expected ?all=1 or ?key=<key>"));
    };

    match store.get(&key) {
        Some(value) if state.namespace.contains(&key) => Ok(Json(KeyValue { key, value }).into_response()),
        _ => Err(AppError::not_found(format!("No value for key '{}'", key))),
    }
}

/// POST {key, value} | {action: "delete", key} | {entries: {...}}
async fn write(
    State(state): State<AppState>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<Ack>, AppError> {
    if let Some(outside) = request
        .keys()
        .into_iter()
        .find(|key| !state.namespace.contains(key))
    {
        return Err(AppError::bad_request(format!(
            "Key '{}' is outside the '{}' namespace",
            outside,
            state.namespace.prefix()
        )));
    }

    // FileStore persists with blocking std::fs calls.
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || apply(&mut store.blocking_write(), request)).await??;

    Ok(Json(Ack { ok: true }))
}

fn apply(store: &mut FileStore, request: SyncRequest) -> WplResult<()> {
    match request {
        SyncRequest::Upsert { key, value } => {
            store.set(&key, &value)?;
            info!(key = %key, "stored key");
        }
        SyncRequest::Delete { key, .. } => {
            store.remove(&key)?;
            info!(key = %key, "deleted key");
        }
        SyncRequest::Bulk { entries } => {
            for (key, value) in &entries {
                store.set(key, value)?;
            }
            info!(count = entries.len(), "stored keys in bulk");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app(dir: &tempfile::TempDir) -> Router {
        let state = AppState::open(&dir.path().join("storage.json"), "wpl_").unwrap();
        crate::app(state)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(STORAGE_ENDPOINT)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_uri(query: &str) -> Request<Body> {
        Request::builder()
            .uri(format!("{}?{}", STORAGE_ENDPOINT, query))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_upsert_then_fetch_all() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir);

        let (status, body) = send(&app, post(json!({ "key": "wpl_calendar_events", "value": "{}" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));

        let (status, body) = send(&app, get_uri("all=1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "wpl_calendar_events": "{}" }));
    }

    #[tokio::test]
    async fn test_bulk_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir);

        send(&app, post(json!({ "entries": { "wpl_a": "1", "wpl_b": "2" } }))).await;
        let (status, _) = send(&app, post(json!({ "action": "delete", "key": "wpl_a" }))).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, get_uri("all=1")).await;
        assert_eq!(body, json!({ "wpl_b": "2" }));

        let (status, body) = send(&app, get_uri("key=wpl_b")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "key": "wpl_b", "value": "2" }));

        let (status, _) = send(&app, get_uri("key=wpl_a")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rejects_keys_outside_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir);

        let (status, body) = send(&app, post(json!({ "entries": { "wpl_a": "1", "theme": "dark" } }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("theme"));

        let (_, body) = send(&app, get_uri("all=1")).await;
        assert_eq!(body, json!({}));
    }

    #[tokio::test]
    async fn test_get_without_query_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir);

        let (status, _) = send(&app, get_uri("")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_data_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        send(&app(&dir), post(json!({ "key": "wpl_profile", "value": "{\"name\":\"Sam\"}" }))).await;

        let (_, body) = send(&app(&dir), get_uri("all=1")).await;
        assert_eq!(body, json!({ "wpl_profile": "{\"name\":\"Sam\"}" }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_writes_all_persist() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir);

        let writes: Vec<_> = (0..8)
            .map(|i| {
                let app = app.clone();
                tokio::spawn(async move {
                    send(&app, post(json!({ "key": format!("wpl_k{}", i), "value": i.to_string() }))).await
                })
            })
            .collect();
        for write in writes {
            let (status, _) = write.await.unwrap();
            assert_eq!(status, StatusCode::OK);
        }

        let (_, body) = send(&app, get_uri("all=1")).await;
        assert_eq!(body.as_object().unwrap().len(), 8);
    }
}
