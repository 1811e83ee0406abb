use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;
use wpl_core::kv::{FileStore, Namespace};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<FileStore>>,
    pub namespace: Namespace,
}

impl AppState {
    pub fn open(path: &Path, namespace: &str) -> Result<Self> {
        let store = FileStore::open(path)?;

        Ok(AppState {
            store: Arc::new(RwLock::new(store)),
            namespace: Namespace::new(namespace),
        })
    }
}
