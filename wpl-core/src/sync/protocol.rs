//! Defines the JSON protocol spoken between the planner and its
//! key-value backend over a single HTTP endpoint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Body of a `POST` to the storage endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SyncRequest {
    /// `{"action": "delete", "key": k}`
    Delete { action: SyncAction, key: String },
    /// `{"entries": {k: v, ...}}`
    Bulk { entries: BTreeMap<String, String> },
    /// `{"key": k, "value": v}`
    Upsert { key: String, value: String },
}

impl SyncRequest {
    pub fn delete(key: impl Into<String>) -> Self {
        SyncRequest::Delete {
            action: SyncAction::Delete,
            key: key.into(),
        }
    }

    pub fn upsert(key: impl Into<String>, value: impl Into<String>) -> Self {
        SyncRequest::Upsert {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Keys this request touches.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            SyncRequest::Delete { key, .. } | SyncRequest::Upsert { key, .. } => vec![key.as_str()],
            SyncRequest::Bulk { entries } => entries.keys().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Delete,
}

/// Query string of a `GET` to the storage endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl StorageQuery {
    pub fn wants_all(&self) -> bool {
        matches!(self.all.as_deref(), Some("1") | Some("true"))
    }
}

/// Reply to a single-key `GET`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
