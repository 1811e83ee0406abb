/// Key the whole team calendar is stored under.
pub const CALENDAR_EVENTS_KEY: &str = "wpl_calendar_events";

/// Only local keys starting with this prefix are mirrored to the server.
pub const DEFAULT_NAMESPACE: &str = "wpl_";

/// Path of the key-value endpoint on the sync server.
pub const STORAGE_ENDPOINT: &str = "/api/storage";

pub const DEFAULT_SERVER_PORT: u16 = 4180;
