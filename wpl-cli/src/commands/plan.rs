use anyhow::Result;
use wpl_core::DateKey;
use wpl_core::calendar::{Audience, audience_label};

use crate::render::{Render, render_day};
use crate::session::Session;

/// Replaces the day's plan. No athletes and no `--all` leaves targeting unset,
/// which everyone can see.
pub fn set(
    session: &mut Session,
    date: DateKey,
    items: Vec<String>,
    athletes: Vec<String>,
    all: bool,
) -> Result<()> {
    let audience = if all {
        Audience::everyone()
    } else {
        Audience::athletes(athletes)
    };

    let viewer = session.viewer();
    let entry = session.manager()?.set_day_plan(&date, items, audience)?;

    if entry.is_empty() {
        println!("Removed plan for {}", date.render());
        return Ok(());
    }

    for line in render_day(&date, &entry.items, &audience_label(&entry, &viewer)) {
        println!("{}", line);
    }
    Ok(())
}
