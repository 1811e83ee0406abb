//! What the rendering layer asks of the calendar.

use crate::calendar::audience::{AudienceLabel, audience_label, is_visible};
use crate::calendar::store::CalendarStore;
use crate::date_key::DateKey;
use crate::kv::KeyValueStore;
use crate::viewer::ViewerSource;

/// The calendar as seen by whoever `viewers` reports, without exposing storage.
pub struct CalendarView<'a, S, V> {
    store: &'a CalendarStore<S>,
    viewers: &'a V,
}

impl<'a, S: KeyValueStore, V: ViewerSource> CalendarView<'a, S, V> {
    pub fn new(store: &'a CalendarStore<S>, viewers: &'a V) -> Self {
        CalendarView { store, viewers }
    }

    pub fn visible_items_for_date(&self, date: &DateKey) -> Vec<String> {
        self.store.visible_items(date, &self.viewers.viewer())
    }

    pub fn audience_label_for_date(&self, date: &DateKey) -> AudienceLabel {
        audience_label(&self.store.get_entry(date), &self.viewers.viewer())
    }

    /// Dates from `from` to `to` (inclusive) holding items the viewer may see.
    pub fn visible_days_between(
        &self,
        from: &DateKey,
        to: &DateKey,
    ) -> Vec<(DateKey, Vec<String>, AudienceLabel)> {
        let viewer = self.viewers.viewer();
        self.store
            .entries_between(from, to)
            .into_iter()
            .filter(|(_, entry)| is_visible(entry, &viewer))
            .map(|(date, entry)| {
                let label = audience_label(&entry, &viewer);
                (date, entry.items, label)
            })
            .collect()
    }
}
