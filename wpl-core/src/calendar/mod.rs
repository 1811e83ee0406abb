//! Date-keyed team calendar.

pub mod audience;
pub mod entry;
pub mod legacy;
pub mod manager;
pub mod migration;
pub mod store;
pub mod view;

pub use audience::{AudienceLabel, audience_label, is_visible};
pub use entry::{Audience, CalendarEntry, merge_entries};
pub use manager::{CalendarManager, ClearOutcome};
pub use migration::{MigrationReport, migrate};
pub use store::CalendarStore;
pub use view::CalendarView;
