//! Typed access to the team calendar stored under one key.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::calendar::audience::is_visible;
use crate::calendar::entry::CalendarEntry;
use crate::calendar::legacy::{RawCalendar, RawKey};
use crate::calendar::migration::{CalendarMap, MigrationReport, calendar_value, entry_value, migrate};
use crate::constants::CALENDAR_EVENTS_KEY;
use crate::date_key::{DateKey, WeekStart};
use crate::error::WplResult;
use crate::kv::KeyValueStore;
use crate::viewer::Viewer;

pub struct CalendarStore<S> {
    kv: S,
}

impl<S: KeyValueStore> CalendarStore<S> {
    /// Wraps `kv` without touching what is stored.
    pub fn new(kv: S) -> Self {
        CalendarStore { kv }
    }

    /// Opens the calendar and upgrades older layouts in place.
    ///
    /// Weekday-indexed entries are placed in the week containing `today`.
    pub fn open(kv: S, today: DateKey, week_start: WeekStart) -> WplResult<(Self, MigrationReport)> {
        let mut store = CalendarStore { kv };

        let (calendar, report) = migrate(&store.raw(), today.week_start(week_start));
        if report.changed {
            info!(
                dates = calendar.len(),
                weekday_entries = report.weekday_entries,
                dropped_keys = report.dropped_keys,
                emptied_dates = report.emptied_dates,
                "migrated stored calendar"
            );
            store.write(&calendar_value(&calendar))?;
        }

        Ok((store, report))
    }

    fn raw(&self) -> RawCalendar {
        RawCalendar::parse(self.kv.get(CALENDAR_EVENTS_KEY).as_deref())
    }

    fn write(&mut self, calendar: &Value) -> WplResult<()> {
        let text = serde_json::to_string(calendar)?;
        self.kv.set(CALENDAR_EVENTS_KEY, &text)
    }

    /// The entry for `date`, normalized from whatever shape is stored.
    /// Missing or unreadable data yields an empty entry.
    pub fn get_entry(&self, date: &DateKey) -> CalendarEntry {
        self.raw().entry(date)
    }

    /// Stores `entry` under `date`, or deletes the date when it has no items.
    pub fn set_entry(&mut self, date: &DateKey, entry: CalendarEntry) -> WplResult<()> {
        let entry = entry.normalized();
        let mut calendar = match self.raw() {
            RawCalendar::Keyed(map) => map,
            _ => Map::new(),
        };

        let key = date.to_string();
        if entry.is_empty() {
            debug!(date = %key, "removing calendar date");
            calendar.remove(&key);
        } else {
            debug!(date = %key, items = entry.items.len(), "saving calendar date");
            calendar.insert(key, entry_value(&entry));
        }

        self.write(&Value::Object(calendar))
    }

    /// Every stored date with items, in date order.
    pub fn entries(&self) -> CalendarMap {
        self.raw()
            .entries()
            .into_iter()
            .filter_map(|(key, entry)| match key {
                RawKey::Date(date) => Some((date, entry.into_entry())),
                _ => None,
            })
            .filter(|(_, entry)| !entry.is_empty())
            .collect()
    }

    /// Stored dates from `from` to `to`, both inclusive.
    pub fn entries_between(&self, from: &DateKey, to: &DateKey) -> CalendarMap {
        self.entries()
            .into_iter()
            .filter(|(date, _)| date >= from && date <= to)
            .collect()
    }

    /// Items of `date` if `viewer` may see them, otherwise nothing.
    pub fn visible_items(&self, date: &DateKey, viewer: &Viewer) -> Vec<String> {
        let entry = self.get_entry(date);
        if is_visible(&entry, viewer) {
            entry.items
        } else {
            Vec::new()
        }
    }

    pub fn contains(&self, date: &DateKey) -> bool {
        match self.raw() {
            RawCalendar::Keyed(map) => map.contains_key(&date.to_string()),
            _ => false,
        }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    pub fn into_inner(self) -> S {
        self.kv
    }
}
