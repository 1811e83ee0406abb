use anyhow::Result;
use wpl_core::DateKey;
use wpl_core::calendar::CalendarView;

use crate::render::render_day;
use crate::session::Session;

pub fn run(session: &Session, date: DateKey) -> Result<()> {
    let viewer = session.viewer();
    let view = CalendarView::new(&session.store, &viewer);

    let items = view.visible_items_for_date(&date);
    let label = view.audience_label_for_date(&date);

    for line in render_day(&date, &items, &label) {
        println!("{}", line);
    }

    Ok(())
}
