//! Calendar entries and their audience targeting.

use serde::{Deserialize, Serialize};

/// Name comparison key: trimmed and case-folded.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Who a date's plan is meant for.
///
/// `all = false` with no athletes is "unset"; read paths treat it as visible
/// to everyone, matching what older calendars stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audience {
    #[serde(default)]
    pub all: bool,
    #[serde(default)]
    pub athletes: Vec<String>,
}

impl Audience {
    pub fn everyone() -> Self {
        Audience {
            all: true,
            athletes: Vec::new(),
        }
    }

    pub fn athletes<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Audience {
            all: false,
            athletes: names.into_iter().map(Into::into).collect(),
        }
        .normalized()
    }

    pub fn is_unset(&self) -> bool {
        !self.all && self.athletes.is_empty()
    }

    pub fn includes(&self, name: &str) -> bool {
        let wanted = normalize_name(name);
        !wanted.is_empty() && self.athletes.iter().any(|a| normalize_name(a) == wanted)
    }

    /// Trims names, drops blanks and keeps the first spelling of each name.
    pub fn normalized(self) -> Self {
        let mut seen: Vec<String> = Vec::new();
        let mut athletes = Vec::new();

        for name in self.athletes {
            let trimmed = name.trim();
            let key = normalize_name(trimmed);
            if key.is_empty() || seen.contains(&key) {
                continue;
            }
            seen.push(key);
            athletes.push(trimmed.to_string());
        }

        Audience {
            all: self.all,
            athletes,
        }
    }

    pub fn union(self, other: Audience) -> Self {
        let mut athletes = self.athletes;
        athletes.extend(other.athletes);
        Audience {
            all: self.all || other.all,
            athletes,
        }
        .normalized()
    }
}

/// One day's plan: display lines plus who may see them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub audience: Audience,
}

impl CalendarEntry {
    pub fn new(items: Vec<String>, audience: Audience) -> Self {
        CalendarEntry { items, audience }.normalized()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn normalized(self) -> Self {
        let items = self
            .items
            .into_iter()
            .filter(|item| !item.trim().is_empty())
            .collect();

        CalendarEntry {
            items,
            audience: self.audience.normalized(),
        }
    }
}

/// Concatenates items (`a` first) and unions the audiences.
pub fn merge_entries(a: CalendarEntry, b: CalendarEntry) -> CalendarEntry {
    let mut items = a.items;
    items.extend(b.items);

    CalendarEntry {
        items,
        audience: a.audience.union(b.audience),
    }
    .normalized()
}
