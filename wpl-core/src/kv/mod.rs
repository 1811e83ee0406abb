//! Local key-value persistence.

mod file;
mod memory;
mod synced;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use synced::SyncedStore;

use std::collections::BTreeMap;

use crate::constants::DEFAULT_NAMESPACE;
use crate::error::WplResult;

/// String-valued local storage, one writer at a time.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> WplResult<()>;
    fn remove(&mut self, key: &str) -> WplResult<()>;
    fn keys(&self) -> Vec<String>;

    /// Every entry whose key is inside `namespace`.
    fn snapshot(&self, namespace: &Namespace) -> BTreeMap<String, String> {
        self.keys()
            .into_iter()
            .filter(|key| namespace.contains(key))
            .filter_map(|key| self.get(&key).map(|value| (key, value)))
            .collect()
    }
}

/// Key prefix that marks a key as synced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Namespace(prefix.into())
    }

    pub fn prefix(&self) -> &str {
        &self.0
    }

    pub fn contains(&self, key: &str) -> bool {
        key.starts_with(&self.0)
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Namespace::new(DEFAULT_NAMESPACE)
    }
}
