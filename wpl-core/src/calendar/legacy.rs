//! Classification of stored calendar data into the shapes older releases wrote.
//!
//! Raw JSON is sorted into a closed set of variants first; normalizing into
//! [`CalendarEntry`] only ever happens on a classified value.

use serde_json::{Map, Value};

use crate::calendar::entry::{Audience, CalendarEntry};
use crate::date_key::DateKey;

/// How a key of the stored calendar object should be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawKey {
    Date(DateKey),
    /// `0`..=`6`, relative to the week the migration runs in.
    Weekday(u8),
    Unknown(String),
}

impl RawKey {
    pub fn classify(key: &str) -> Self {
        if let Ok(date) = DateKey::parse(key) {
            return RawKey::Date(date);
        }

        match key.as_bytes() {
            [digit @ b'0'..=b'6'] => RawKey::Weekday(digit - b'0'),
            _ => RawKey::Unknown(key.to_string()),
        }
    }
}

/// The value stored for one day.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEntry {
    /// Bare list of plan lines. Predates targeting, so it meant everyone.
    Lines(Vec<String>),
    /// `{ items, audience }`.
    Current(CalendarEntry),
    Malformed,
}

impl RawEntry {
    pub fn classify(value: &Value) -> Self {
        match value {
            Value::Array(lines) => RawEntry::Lines(strings(lines)),
            Value::Object(fields) => RawEntry::Current(CalendarEntry {
                items: fields
                    .get("items")
                    .and_then(Value::as_array)
                    .map(|items| strings(items))
                    .unwrap_or_default(),
                audience: fields.get("audience").map(audience).unwrap_or_default(),
            }),
            _ => RawEntry::Malformed,
        }
    }

    pub fn into_entry(self) -> CalendarEntry {
        match self {
            RawEntry::Lines(items) => CalendarEntry::new(items, Audience::everyone()),
            RawEntry::Current(entry) => entry.normalized(),
            RawEntry::Malformed => CalendarEntry::default(),
        }
    }
}

/// The whole stored calendar.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCalendar {
    Keyed(Map<String, Value>),
    /// Array whose positions are weekday indices.
    WeekdayList(Vec<Value>),
    Malformed,
}

impl RawCalendar {
    /// A missing value is an empty calendar; unparseable text is malformed.
    pub fn parse(text: Option<&str>) -> Self {
        match text {
            None => RawCalendar::Keyed(Map::new()),
            Some(text) => match serde_json::from_str::<Value>(text) {
                Ok(value) => RawCalendar::classify(value),
                Err(_) => RawCalendar::Malformed,
            },
        }
    }

    pub fn classify(value: Value) -> Self {
        match value {
            Value::Object(map) => RawCalendar::Keyed(map),
            Value::Array(list) => RawCalendar::WeekdayList(list),
            Value::Null => RawCalendar::Keyed(Map::new()),
            _ => RawCalendar::Malformed,
        }
    }

    pub fn entries(&self) -> Vec<(RawKey, RawEntry)> {
        match self {
            RawCalendar::Keyed(map) => map
                .iter()
                .map(|(key, value)| (RawKey::classify(key), RawEntry::classify(value)))
                .collect(),
            RawCalendar::WeekdayList(list) => list
                .iter()
                .enumerate()
                .map(|(index, value)| {
                    let key = match u8::try_from(index) {
                        Ok(day) if day <= 6 => RawKey::Weekday(day),
                        _ => RawKey::Unknown(index.to_string()),
                    };
                    (key, RawEntry::classify(value))
                })
                .collect(),
            RawCalendar::Malformed => Vec::new(),
        }
    }

    /// Entry stored under an exact date key, whatever its shape.
    pub fn entry(&self, date: &DateKey) -> CalendarEntry {
        match self {
            RawCalendar::Keyed(map) => map
                .get(&date.to_string())
                .map(|value| RawEntry::classify(value).into_entry())
                .unwrap_or_default(),
            _ => CalendarEntry::default(),
        }
    }

    pub fn to_value(&self) -> Option<Value> {
        match self {
            RawCalendar::Keyed(map) => Some(Value::Object(map.clone())),
            RawCalendar::WeekdayList(list) => Some(Value::Array(list.clone())),
            RawCalendar::Malformed => None,
        }
    }
}

fn strings(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(Value::as_str)
        .map(String::from)
        .collect()
}

fn audience(value: &Value) -> Audience {
    Audience {
        all: value.get("all").and_then(Value::as_bool).unwrap_or(false),
        athletes: value
            .get("athletes")
            .and_then(Value::as_array)
            .map(|names| strings(names))
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_keys() {
        assert_eq!(
            RawKey::classify("2024-05-01"),
            RawKey::Date(DateKey::parse("2024-05-01").unwrap())
        );
        assert_eq!(RawKey::classify("0"), RawKey::Weekday(0));
        assert_eq!(RawKey::classify("6"), RawKey::Weekday(6));
        assert_eq!(RawKey::classify("7"), RawKey::Unknown("7".into()));
        assert_eq!(RawKey::classify("12"), RawKey::Unknown("12".into()));
        assert_eq!(RawKey::classify("monday"), RawKey::Unknown("monday".into()));
    }

    #[test]
    fn test_bare_list_means_everyone() {
        let entry = RawEntry::classify(&json!(["Drill A", 3, "Drill B"])).into_entry();
        assert_eq!(entry.items, vec!["Drill A", "Drill B"]);
        assert_eq!(entry.audience, Audience::everyone());
    }

    #[test]
    fn test_current_shape_tolerates_bad_fields() {
        let raw = json!({
            "items": ["Lift", null, "Run"],
            "audience": { "all": "yes", "athletes": ["Sam", 4] }
        });

        let entry = RawEntry::classify(&raw).into_entry();

        assert_eq!(entry.items, vec!["Lift", "Run"]);
        assert!(!entry.audience.all);
        assert_eq!(entry.audience.athletes, vec!["Sam"]);
    }

    #[test]
    fn test_current_shape_without_audience_is_unset() {
        let entry = RawEntry::classify(&json!({ "items": ["Lift"] })).into_entry();
        assert!(entry.audience.is_unset());
    }

    #[test]
    fn test_scalars_are_malformed() {
        assert_eq!(RawEntry::classify(&json!("Drill")), RawEntry::Malformed);
        assert_eq!(RawEntry::classify(&json!(42)), RawEntry::Malformed);
        assert!(RawEntry::Malformed.into_entry().is_empty());
    }

    #[test]
    fn test_parse_calendar_text() {
        assert_eq!(RawCalendar::parse(None), RawCalendar::Keyed(Map::new()));
        assert_eq!(RawCalendar::parse(Some("{not json")), RawCalendar::Malformed);
        assert_eq!(RawCalendar::parse(Some("\"text\"")), RawCalendar::Malformed);
        assert!(matches!(
            RawCalendar::parse(Some("[[\"Drill\"]]")),
            RawCalendar::WeekdayList(_)
        ));
    }

    #[test]
    fn test_weekday_list_positions_become_weekdays() {
        let raw = RawCalendar::classify(json!([[], ["Mon drill"], [], [], [], [], [], ["extra"]]));
        let keys: Vec<RawKey> = raw.entries().into_iter().map(|(key, _)| key).collect();

        assert_eq!(keys[1], RawKey::Weekday(1));
        assert_eq!(keys[6], RawKey::Weekday(6));
        assert_eq!(keys[7], RawKey::Unknown("7".into()));
    }
}
