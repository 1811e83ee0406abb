//! Local store plus bridge notification, composed.

use crate::error::WplResult;
use crate::kv::KeyValueStore;
use crate::sync::{HydrateOutcome, SyncBridge};

/// Writes go to the wrapped store first, then the bridge is told about them.
/// A failed local write is never forwarded.
pub struct SyncedStore<S> {
    inner: S,
    bridge: Option<SyncBridge>,
}

impl<S: KeyValueStore> SyncedStore<S> {
    pub fn new(inner: S, bridge: SyncBridge) -> Self {
        SyncedStore {
            inner,
            bridge: Some(bridge),
        }
    }

    pub fn local_only(inner: S) -> Self {
        SyncedStore {
            inner,
            bridge: None,
        }
    }

    pub fn bridge(&self) -> Option<&SyncBridge> {
        self.bridge.as_ref()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Runs hydration against the wrapped store. `None` when there is no bridge.
    pub async fn hydrate(&mut self) -> Option<HydrateOutcome> {
        match &self.bridge {
            Some(bridge) => Some(bridge.hydrate(&mut self.inner).await),
            None => None,
        }
    }

    pub async fn flush(&self) {
        if let Some(bridge) = &self.bridge {
            bridge.flush().await;
        }
    }
}

impl<S: KeyValueStore> KeyValueStore for SyncedStore<S> {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> WplResult<()> {
        self.inner.set(key, value)?;
        if let Some(bridge) = &self.bridge {
            bridge.on_write(key, value);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> WplResult<()> {
        self.inner.remove(key)?;
        if let Some(bridge) = &self.bridge {
            bridge.on_delete(key);
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }
}
