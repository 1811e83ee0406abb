pub mod config;
pub mod day;
pub mod event;
pub mod plan;
pub mod sync;
pub mod week;
