//! Coach-facing edits to single dates.
//!
//! Per date the calendar is either unset (no key stored) or populated.
//! Adding moves it to populated, removing the last item or clearing moves it
//! back to unset.

use tracing::info;

use crate::calendar::entry::{Audience, CalendarEntry};
use crate::calendar::store::CalendarStore;
use crate::date_key::DateKey;
use crate::error::{WplError, WplResult};
use crate::kv::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared,
    Declined,
    AlreadyEmpty,
}

/// `"title - time - note"`, leaving out whatever is blank.
pub fn format_event(title: &str, time: Option<&str>, note: Option<&str>) -> String {
    [Some(title), time, note]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" - ")
}

pub struct CalendarManager<'a, S> {
    store: &'a mut CalendarStore<S>,
}

impl<'a, S: KeyValueStore> CalendarManager<'a, S> {
    pub fn new(store: &'a mut CalendarStore<S>) -> Self {
        CalendarManager { store }
    }

    /// Appends an event line to `date`. A date nobody was targeted on
    /// becomes a whole-team date.
    pub fn add_event(
        &mut self,
        date: &DateKey,
        title: &str,
        time: Option<&str>,
        note: Option<&str>,
    ) -> WplResult<CalendarEntry> {
        if title.trim().is_empty() {
            return Err(WplError::EmptyTitle);
        }

        let mut entry = self.store.get_entry(date);
        entry.items.push(format_event(title, time, note));
        if entry.audience.is_unset() {
            entry.audience = Audience::everyone();
        }

        self.store.set_entry(date, entry.clone())?;
        Ok(entry)
    }

    /// Removes the item at `index`. Returns it, or `None` when out of range.
    pub fn remove_event(&mut self, date: &DateKey, index: usize) -> WplResult<Option<String>> {
        let mut entry = self.store.get_entry(date);
        if index >= entry.items.len() {
            return Ok(None);
        }

        let removed = entry.items.remove(index);
        self.store.set_entry(date, entry)?;
        Ok(Some(removed))
    }

    /// Drops everything on `date` once `confirm` agrees. There is no undo.
    pub fn clear_date<F>(&mut self, date: &DateKey, confirm: F) -> WplResult<ClearOutcome>
    where
        F: FnOnce(&DateKey, &CalendarEntry) -> bool,
    {
        let entry = self.store.get_entry(date);
        if entry.is_empty() && !self.store.contains(date) {
            return Ok(ClearOutcome::AlreadyEmpty);
        }

        if !confirm(date, &entry) {
            return Ok(ClearOutcome::Declined);
        }

        self.store.set_entry(date, CalendarEntry::default())?;
        info!(date = %date, items = entry.items.len(), "cleared calendar date");
        Ok(ClearOutcome::Cleared)
    }

    /// Replaces the whole plan for `date`, as the day editor does.
    pub fn set_day_plan(
        &mut self,
        date: &DateKey,
        items: Vec<String>,
        audience: Audience,
    ) -> WplResult<CalendarEntry> {
        let entry = CalendarEntry::new(items, audience);
        self.store.set_entry(date, entry.clone())?;
        Ok(entry)
    }
}
