use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use wpl_core::DateKey;
use wpl_core::calendar::ClearOutcome;

use crate::render::{Render, pluralize};
use crate::session::Session;

pub fn add(
    session: &mut Session,
    date: DateKey,
    title: &str,
    time: Option<&str>,
    note: Option<&str>,
) -> Result<()> {
    let entry = session.manager()?.add_event(&date, title, time, note)?;

    if let Some(added) = entry.items.last() {
        println!("{} {} on {}", "+".green(), added.green(), date.render());
    }
    Ok(())
}

/// `number` is 1-based, as printed by `wpl day`.
pub fn remove(session: &mut Session, date: DateKey, number: usize) -> Result<()> {
    let removed = match event_index(number) {
        Some(index) => session.manager()?.remove_event(&date, index)?,
        None => None,
    };

    match removed {
        Some(item) => println!("{} {}", "-".red(), item.red()),
        None => println!("{}", format!("No event #{} on {}", number, date).dimmed()),
    }
    Ok(())
}

/// Position in the entry's items for a displayed event number. `0` matches nothing.
fn event_index(number: usize) -> Option<usize> {
    number.checked_sub(1)
}

pub fn clear(session: &mut Session, date: DateKey, force: bool) -> Result<()> {
    let mut prompt_error = None;

    let outcome = session.manager()?.clear_date(&date, |date, entry| {
        if force {
            return true;
        }

        let count = entry.items.len();
        Confirm::new()
            .with_prompt(format!(
                "Clear {} {} on {}? This cannot be undone",
                count,
                pluralize("event", count),
                date
            ))
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                prompt_error = Some(e);
                false
            })
    })?;

    if let Some(e) = prompt_error {
        return Err(e.into());
    }

    match outcome {
        ClearOutcome::Cleared => println!("Cleared {}", date.render()),
        ClearOutcome::Declined => println!("{}", "Nothing changed".dimmed()),
        ClearOutcome::AlreadyEmpty => println!("{}", format!("Nothing planned on {}", date).dimmed()),
    }
    Ok(())
}
