//! One-time upgrade of stored calendars to the date-keyed shape.

use std::collections::BTreeMap;

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::calendar::entry::{CalendarEntry, merge_entries};
use crate::calendar::legacy::{RawCalendar, RawKey};
use crate::date_key::DateKey;

pub type CalendarMap = BTreeMap<DateKey, CalendarEntry>;

/// What a migration pass did. `changed` means the result must be written back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub changed: bool,
    pub weekday_entries: usize,
    pub dropped_keys: usize,
    pub emptied_dates: usize,
}

/// Rewrites `raw` into a date-keyed calendar.
///
/// Weekday-indexed entries land on `week_start + index`. Entries that end up
/// on the same date are merged, date-keyed entries first. Keys that are neither dates
/// nor weekday indices are dropped, as are dates left without items.
pub fn migrate(raw: &RawCalendar, week_start: DateKey) -> (CalendarMap, MigrationReport) {
    let mut calendar = CalendarMap::new();
    let mut report = MigrationReport::default();

    // Date-keyed entries first so weekday items append after them.
    let mut entries = raw.entries();
    entries.sort_by_key(|(key, _)| matches!(key, RawKey::Weekday(_)));

    for (key, entry) in entries {
        let date = match key {
            RawKey::Date(date) => date,
            RawKey::Weekday(index) => {
                report.weekday_entries += 1;
                week_start.add_days(i64::from(index))
            }
            RawKey::Unknown(key) => {
                debug!(key = %key, "dropping unrecognized calendar key");
                report.dropped_keys += 1;
                continue;
            }
        };

        let entry = entry.into_entry();
        let merged = match calendar.remove(&date) {
            Some(existing) => merge_entries(existing, entry),
            None => entry,
        };
        calendar.insert(date, merged);
    }

    let before = calendar.len();
    calendar.retain(|_, entry| !entry.is_empty());
    report.emptied_dates = before - calendar.len();

    report.changed = match raw.to_value() {
        Some(stored) => {
            report.weekday_entries > 0
                || report.dropped_keys > 0
                || report.emptied_dates > 0
                || stored != calendar_value(&calendar)
        }
        // Unreadable data is left alone; the next save replaces it.
        None => false,
    };

    (calendar, report)
}

pub fn entry_value(entry: &CalendarEntry) -> Value {
    json!({
        "items": entry.items,
        "audience": {
            "all": entry.audience.all,
            "athletes": entry.audience.athletes,
        },
    })
}

pub fn calendar_value(calendar: &CalendarMap) -> Value {
    let map: Map<String, Value> = calendar
        .iter()
        .map(|(date, entry)| (date.to_string(), entry_value(entry)))
        .collect();
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::entry::Audience;

    fn date(s: &str) -> DateKey {
        DateKey::parse(s).unwrap()
    }

    fn raw(value: Value) -> RawCalendar {
        RawCalendar::classify(value)
    }

    #[test]
    fn test_weekday_entry_lands_relative_to_week_start() {
        let week_start = date("2024-04-28");

        let (calendar, report) = migrate(&raw(json!({ "2": ["Drill A"] })), week_start);

        let entry = &calendar[&date("2024-04-30")];
        assert_eq!(entry.items, vec!["Drill A"]);
        assert!(entry.audience.all);
        assert_eq!(report.weekday_entries, 1);
        assert!(report.changed);
    }

    #[test]
    fn test_migration_is_idempotent() {
        let week_start = date("2024-04-28");
        let legacy = raw(json!({
            "0": ["Sunday lift"],
            "2024-05-01": { "items": ["Practice"], "audience": { "all": false, "athletes": ["Sam"] } },
            "2024-05-02": ["Bare list"],
            "notes": "stray",
        }));

        let (first, report) = migrate(&legacy, week_start);
        assert!(report.changed);

        let (second, report) = migrate(&raw(calendar_value(&first)), week_start);
        assert_eq!(second, first);
        assert!(!report.changed);
        assert_eq!(report, MigrationReport::default());
    }

    #[test]
    fn test_weekday_entry_merges_onto_existing_date() {
        let week_start = date("2024-04-28");
        let legacy = raw(json!({
            "2024-04-29": { "items": ["Film"], "audience": { "all": false, "athletes": ["Sam"] } },
            "1": ["Drill"],
        }));

        let (calendar, _) = migrate(&legacy, week_start);

        let entry = &calendar[&date("2024-04-29")];
        assert_eq!(entry.items, vec!["Film", "Drill"]);
        assert!(entry.audience.all);
        assert_eq!(entry.audience.athletes, vec!["Sam"]);
    }

    #[test]
    fn test_empty_dates_and_unknown_keys_are_dropped() {
        let legacy = raw(json!({
            "2024-05-01": { "items": [], "audience": { "all": true } },
            "2024-5-2": ["Loose date"],
            "2024-05-03": ["Keep"],
        }));

        let (calendar, report) = migrate(&legacy, date("2024-04-28"));

        assert_eq!(calendar.len(), 1);
        assert!(calendar.contains_key(&date("2024-05-03")));
        assert_eq!(report.emptied_dates, 1);
        assert_eq!(report.dropped_keys, 1);
        assert!(report.changed);
    }

    #[test]
    fn test_current_calendar_reports_no_change() {
        let mut calendar = CalendarMap::new();
        calendar.insert(
            date("2024-05-01"),
            CalendarEntry::new(vec!["Practice".into()], Audience::athletes(["Sam"])),
        );

        let (_, report) = migrate(&raw(calendar_value(&calendar)), date("2024-04-28"));

        assert!(!report.changed);
    }

    #[test]
    fn test_weekday_list_calendar() {
        let legacy = raw(json!([["Sun"], [], ["Tue"]]));

        let (calendar, report) = migrate(&legacy, date("2024-04-28"));

        assert_eq!(calendar[&date("2024-04-28")].items, vec!["Sun"]);
        assert_eq!(calendar[&date("2024-04-30")].items, vec!["Tue"]);
        assert_eq!(report.weekday_entries, 3);
        assert_eq!(report.emptied_dates, 1);
    }

    #[test]
    fn test_malformed_calendar_is_left_alone() {
        let (calendar, report) = migrate(&RawCalendar::Malformed, date("2024-04-28"));
        assert!(calendar.is_empty());
        assert!(!report.changed);
    }
}
