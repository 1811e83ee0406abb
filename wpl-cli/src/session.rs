//! Opening the local store, syncing it and loading the calendar.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};
use wpl_core::calendar::{CalendarManager, CalendarStore, MigrationReport};
use wpl_core::config::WplConfig;
use wpl_core::kv::{FileStore, SyncedStore};
use wpl_core::sync::{BridgeState, HttpRemote, HydrateOutcome, SyncBridge};
use wpl_core::{DateKey, Viewer, WplError};

pub type Store = CalendarStore<SyncedStore<FileStore>>;

pub struct Session {
    pub config: WplConfig,
    pub store: Store,
    pub hydrated: Option<HydrateOutcome>,
    pub migration: MigrationReport,
}

impl Session {
    /// Hydrates before the calendar is read so reads see the server's data.
    pub async fn open(config: WplConfig) -> Result<Self> {
        let data_path = config.data_path();
        let local = FileStore::open(&data_path)
            .with_context(|| format!("Failed to open {}", data_path.display()))?;

        debug!(path = %data_path.display(), "opened local store");

        let mut synced = match &config.remote_url {
            Some(url) => {
                debug!(url = %url, "sync enabled");
                let remote = HttpRemote::new(url.clone())?;
                SyncedStore::new(local, SyncBridge::start(Arc::new(remote), config.namespace()))
            }
            None => SyncedStore::local_only(local),
        };

        let hydrated = synced.hydrate().await;

        let (store, migration) =
            CalendarStore::open(synced, DateKey::today(), config.week_starts_on)?;
        if migration.changed {
            info!(?migration, "upgraded stored calendar");
        }

        Ok(Session {
            config,
            store,
            hydrated,
            migration,
        })
    }

    pub fn viewer(&self) -> Viewer {
        self.config.viewer()
    }

    pub fn bridge_state(&self) -> Option<BridgeState> {
        self.store.kv().bridge().map(|bridge| bridge.state())
    }

    /// Calendar edits are for coaches only.
    pub fn manager(&mut self) -> Result<CalendarManager<'_, SyncedStore<FileStore>>> {
        if !self.viewer().is_coach() {
            return Err(WplError::NotCoach.into());
        }
        Ok(CalendarManager::new(&mut self.store))
    }

    /// Gives queued sync operations a chance to reach the server.
    pub async fn close(self) {
        self.store.kv().flush().await;
    }
}
