//! Mirroring the local store to the sync server.

mod bridge;
pub mod protocol;
mod remote;

pub use bridge::{BridgeState, HydrateOutcome, SyncBridge};
pub use remote::{HttpRemote, Remote};
