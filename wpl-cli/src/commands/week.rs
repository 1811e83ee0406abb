use anyhow::Result;
use owo_colors::OwoColorize;
use tracing::debug;
use wpl_core::DateKey;
use wpl_core::calendar::CalendarView;

use crate::render::render_day;
use crate::session::Session;

const DAYS_IN_WEEK: i64 = 7;

pub fn run(session: &Session, date: DateKey) -> Result<()> {
    let viewer = session.viewer();
    let view = CalendarView::new(&session.store, &viewer);
    let start = date.week_start(session.config.week_starts_on);
    let end = start.add_days(DAYS_IN_WEEK - 1);

    println!("{}", format!("Week of {} for {}", start, viewer.name).dimmed());

    let days = view.visible_days_between(&start, &end);
    debug!(from = %start, to = %end, days = days.len(), "loaded week");

    if days.is_empty() {
        println!("{}", format!("Nothing planned {} to {}", start, end).dimmed());
        return Ok(());
    }

    for (day, items, label) in days {
        println!();
        for line in render_day(&day, &items, &label) {
            println!("{}", line);
        }
    }

    Ok(())
}
