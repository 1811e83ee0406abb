//! Calendar-local date keys.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{WplError, WplResult};

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// A calendar day in local time, written as zero-padded `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        DateKey(date)
    }

    pub fn today() -> Self {
        DateKey(Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn add_days(&self, days: i64) -> Self {
        DateKey(self.0 + Duration::days(days))
    }

    /// First day of the week containing this date.
    pub fn week_start(&self, start: WeekStart) -> Self {
        let offset = match start {
            WeekStart::Sunday => self.0.weekday().num_days_from_sunday(),
            WeekStart::Monday => self.0.weekday().num_days_from_monday(),
        };
        self.add_days(-i64::from(offset))
    }

    /// Strict parse: `2024-5-1` and `2024-05-01T00:00` are both rejected.
    pub fn parse(s: &str) -> WplResult<Self> {
        let bytes = s.as_bytes();
        let shaped = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

        if !shaped {
            return Err(WplError::InvalidDateKey(s.to_string()));
        }

        NaiveDate::parse_from_str(s, DATE_KEY_FORMAT)
            .map(DateKey)
            .map_err(|_| WplError::InvalidDateKey(s.to_string()))
    }
}

impl FromStr for DateKey {
    type Err = WplError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateKey::parse(s)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateKey::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Which day weekday index 0 refers to in legacy calendars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}
