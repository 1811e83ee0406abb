//! Core types for the wrestling planner.
//!
//! This crate provides everything the `wpl` CLI and `wpl-server` share:
//! - `calendar` for the date-keyed team calendar, legacy migration and audience rules
//! - `kv` for the local key-value stores the calendar persists through
//! - `sync` for mirroring the local store to the remote backend

pub mod calendar;
pub mod config;
pub mod constants;
pub mod date_key;
pub mod error;
pub mod kv;
pub mod sync;
pub mod viewer;

pub use date_key::{DateKey, WeekStart};
pub use error::{WplError, WplResult};
pub use viewer::{Role, Viewer, ViewerSource};
