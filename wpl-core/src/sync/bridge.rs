//! Keeps the namespaced part of a local store in step with the server.
//!
//! On startup [`SyncBridge::hydrate`] reconciles the local store with the
//! server. After that every namespaced write is forwarded in the background.
//! Delivery is best effort: the first failure switches the bridge off for the
//! rest of the session and the local store carries on alone.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::error::WplResult;
use crate::kv::{KeyValueStore, Namespace};
use crate::sync::remote::Remote;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    /// Not hydrated yet; writes stay local.
    Idle,
    /// Hydration is writing into the local store; those writes are not echoed.
    Hydrating,
    Ready,
    /// A remote call failed. Nothing more is sent this session.
    Disabled,
}

impl BridgeState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => BridgeState::Idle,
            1 => BridgeState::Hydrating,
            2 => BridgeState::Ready,
            _ => BridgeState::Disabled,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            BridgeState::Idle => 0,
            BridgeState::Hydrating => 1,
            BridgeState::Ready => 2,
            BridgeState::Disabled => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrateOutcome {
    /// The server had data; the local namespace now mirrors it.
    Pulled { written: usize, removed: usize },
    /// The server was empty; the local namespace was uploaded.
    Pushed { count: usize },
    Disabled,
}

enum SyncOp {
    Upsert { key: String, value: String },
    Delete { key: String },
    Flush(oneshot::Sender<()>),
}

#[derive(Clone)]
struct SharedState(Arc<AtomicU8>);

impl SharedState {
    fn get(&self) -> BridgeState {
        BridgeState::from_u8(self.0.load(Ordering::SeqCst))
    }

    fn set(&self, state: BridgeState) {
        self.0.store(state.as_u8(), Ordering::SeqCst);
    }
}

pub struct SyncBridge {
    namespace: Namespace,
    remote: Arc<dyn Remote>,
    state: SharedState,
    queue: mpsc::UnboundedSender<SyncOp>,
}

impl SyncBridge {
    /// Spawns the delivery task, so this must run inside a tokio runtime.
    pub fn start(remote: Arc<dyn Remote>, namespace: Namespace) -> Self {
        let (queue, ops) = mpsc::unbounded_channel();
        let state = SharedState(Arc::new(AtomicU8::new(BridgeState::Idle.as_u8())));

        tokio::spawn(deliver(Arc::clone(&remote), state.clone(), ops));

        SyncBridge {
            namespace,
            remote,
            state,
            queue,
        }
    }

    pub fn state(&self) -> BridgeState {
        self.state.get()
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Reconciles `local` with the server. Never fails: errors disable the
    /// bridge and the caller continues with whatever is stored locally.
    pub async fn hydrate<S: KeyValueStore>(&self, local: &mut S) -> HydrateOutcome {
        if self.state() == BridgeState::Disabled {
            return HydrateOutcome::Disabled;
        }

        self.state.set(BridgeState::Hydrating);

        match self.try_hydrate(local).await {
            Ok(outcome) => {
                info!(?outcome, "hydrated local store");
                self.state.set(BridgeState::Ready);
                outcome
            }
            Err(e) => {
                warn!(error = %e, "hydration failed, sync disabled for this session");
                self.state.set(BridgeState::Disabled);
                HydrateOutcome::Disabled
            }
        }
    }

    async fn try_hydrate<S: KeyValueStore>(&self, local: &mut S) -> WplResult<HydrateOutcome> {
        let remote: BTreeMap<String, String> = self
            .remote
            .fetch_all()
            .await?
            .into_iter()
            .filter(|(key, _)| self.namespace.contains(key))
            .collect();

        if !remote.is_empty() {
            let mut removed = 0;
            for key in local.keys() {
                if self.namespace.contains(&key) && !remote.contains_key(&key) {
                    local.remove(&key)?;
                    removed += 1;
                }
            }

            for (key, value) in &remote {
                local.set(key, value)?;
            }

            return Ok(HydrateOutcome::Pulled {
                written: remote.len(),
                removed,
            });
        }

        let snapshot = local.snapshot(&self.namespace);
        if !snapshot.is_empty() {
            self.remote.upsert_many(&snapshot).await?;
        }

        Ok(HydrateOutcome::Pushed {
            count: snapshot.len(),
        })
    }

    pub fn on_write(&self, key: &str, value: &str) {
        if self.accepts(key) {
            self.enqueue(SyncOp::Upsert {
                key: key.to_string(),
                value: value.to_string(),
            });
        }
    }

    pub fn on_delete(&self, key: &str) {
        if self.accepts(key) {
            self.enqueue(SyncOp::Delete {
                key: key.to_string(),
            });
        }
    }

    /// Waits until everything queued so far has been attempted.
    pub async fn flush(&self) {
        let (done, finished) = oneshot::channel();
        if self.queue.send(SyncOp::Flush(done)).is_ok() {
            let _ = finished.await;
        }
    }

    fn accepts(&self, key: &str) -> bool {
        self.namespace.contains(key) && self.state() == BridgeState::Ready
    }

    fn enqueue(&self, op: SyncOp) {
        if self.queue.send(op).is_err() {
            warn!("sync worker is gone, sync disabled for this session");
            self.state.set(BridgeState::Disabled);
        }
    }
}

async fn deliver(
    remote: Arc<dyn Remote>,
    state: SharedState,
    mut ops: mpsc::UnboundedReceiver<SyncOp>,
) {
    while let Some(op) = ops.recv().await {
        let result = match op {
            SyncOp::Flush(done) => {
                let _ = done.send(());
                continue;
            }
            _ if state.get() == BridgeState::Disabled => continue,
            SyncOp::Upsert { key, value } => {
                debug!(key = %key, "pushing key");
                remote.upsert(&key, &value).await
            }
            SyncOp::Delete { key } => {
                debug!(key = %key, "deleting remote key");
                remote.delete(&key).await
            }
        };

        if let Err(e) = result {
            warn!(error = %e, "sync failed, disabled for this session");
            state.set(BridgeState::Disabled);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WplError;
    use crate::kv::MemoryStore;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicBool;

    #[derive(Default)]
    struct FakeRemote {
        entries: Mutex<BTreeMap<String, String>>,
        calls: Mutex<Vec<String>>,
        failing: AtomicBool,
    }

    impl FakeRemote {
        fn with(entries: &[(&str, &str)]) -> Arc<Self> {
            let remote = FakeRemote::default();
            *remote.entries.lock().unwrap() = entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            Arc::new(remote)
        }

        fn record(&self, call: String) -> WplResult<()> {
            self.calls.lock().unwrap().push(call);
            if self.failing.load(Ordering::SeqCst) {
                return Err(WplError::Remote("connection refused".into()));
            }
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn value(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).cloned()
        }
    }

    #[async_trait]
    impl Remote for FakeRemote {
        async fn fetch_all(&self) -> WplResult<BTreeMap<String, String>> {
            self.record("fetch_all".into())?;
            Ok(self.entries.lock().unwrap().clone())
        }

        async fn upsert(&self, key: &str, value: &str) -> WplResult<()> {
            self.record(format!("upsert {key}"))?;
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn delete(&self, key: &str) -> WplResult<()> {
            self.record(format!("delete {key}"))?;
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }

        async fn upsert_many(&self, entries: &BTreeMap<String, String>) -> WplResult<()> {
            self.record(format!("upsert_many {}", entries.len()))?;
            self.entries.lock().unwrap().extend(entries.clone());
            Ok(())
        }
    }

    fn bridge(remote: &Arc<FakeRemote>) -> SyncBridge {
        SyncBridge::start(remote.clone(), Namespace::default())
    }

    #[tokio::test]
    async fn test_hydrate_pulls_when_remote_has_data() {
        let remote = FakeRemote::with(&[("wpl_calendar_events", "{\"remote\":1}"), ("other", "x")]);
        let mut local: MemoryStore = [
            ("wpl_calendar_events", "{}"),
            ("wpl_stale", "old"),
            ("ui_theme", "dark"),
        ]
        .into_iter()
        .collect();

        let bridge = bridge(&remote);
        let outcome = bridge.hydrate(&mut local).await;

        assert_eq!(outcome, HydrateOutcome::Pulled { written: 1, removed: 1 });
        assert_eq!(bridge.state(), BridgeState::Ready);
        assert_eq!(local.get("wpl_calendar_events").as_deref(), Some("{\"remote\":1}"));
        assert_eq!(local.get("wpl_stale"), None);
        assert_eq!(local.get("ui_theme").as_deref(), Some("dark"));
        assert_eq!(local.get("other"), None);
    }

    #[tokio::test]
    async fn test_hydrate_pushes_local_snapshot_when_remote_empty() {
        let remote = FakeRemote::with(&[("unrelated", "x")]);
        let mut local: MemoryStore = [("wpl_profile", "{}"), ("ui_theme", "dark")]
            .into_iter()
            .collect();

        let bridge = bridge(&remote);
        let outcome = bridge.hydrate(&mut local).await;

        assert_eq!(outcome, HydrateOutcome::Pushed { count: 1 });
        assert_eq!(remote.calls(), vec!["fetch_all", "upsert_many 1"]);
        assert_eq!(remote.value("wpl_profile").as_deref(), Some("{}"));
        assert_eq!(remote.value("ui_theme"), None);
    }

    #[tokio::test]
    async fn test_hydrate_failure_disables_bridge() {
        let remote = FakeRemote::with(&[]);
        remote.failing.store(true, Ordering::SeqCst);
        let mut local: MemoryStore = [("wpl_profile", "{}")].into_iter().collect();

        let bridge = bridge(&remote);
        let outcome = bridge.hydrate(&mut local).await;

        assert_eq!(outcome, HydrateOutcome::Disabled);
        assert_eq!(bridge.state(), BridgeState::Disabled);
        assert_eq!(local.get("wpl_profile").as_deref(), Some("{}"));

        remote.failing.store(false, Ordering::SeqCst);
        bridge.on_write("wpl_profile", "{\"name\":\"Sam\"}");
        bridge.flush().await;
        assert_eq!(remote.calls(), vec!["fetch_all"]);
    }

    #[tokio::test]
    async fn test_writes_before_hydration_stay_local() {
        let remote = FakeRemote::with(&[]);
        let bridge = bridge(&remote);

        bridge.on_write("wpl_profile", "{}");
        bridge.flush().await;

        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_writes_after_hydration_are_forwarded_in_order() {
        let remote = FakeRemote::with(&[]);
        let mut local = MemoryStore::new();
        let bridge = bridge(&remote);
        bridge.hydrate(&mut local).await;

        bridge.on_write("wpl_calendar_events", "{}");
        bridge.on_write("ui_open_panel", "calendar");
        bridge.on_delete("wpl_profile");
        bridge.flush().await;

        assert_eq!(
            remote.calls(),
            vec!["fetch_all", "upsert wpl_calendar_events", "delete wpl_profile"]
        );
    }

    #[tokio::test]
    async fn test_failed_write_disables_further_sync() {
        let remote = FakeRemote::with(&[]);
        let mut local = MemoryStore::new();
        let bridge = bridge(&remote);
        bridge.hydrate(&mut local).await;

        remote.failing.store(true, Ordering::SeqCst);
        bridge.on_write("wpl_a", "1");
        bridge.flush().await;
        assert_eq!(bridge.state(), BridgeState::Disabled);

        remote.failing.store(false, Ordering::SeqCst);
        bridge.on_write("wpl_b", "2");
        bridge.flush().await;

        assert_eq!(remote.calls(), vec!["fetch_all", "upsert wpl_a"]);
        assert_eq!(remote.value("wpl_b"), None);
    }
}
