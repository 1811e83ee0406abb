use anyhow::Result;
use owo_colors::OwoColorize;

use crate::render::{Render, pluralize};
use crate::session::Session;

/// Hydration already ran when the session opened; this reports on it.
pub fn hydrate(session: &Session) -> Result<()> {
    match &session.hydrated {
        Some(outcome) => println!("{}", outcome.render()),
        None => println!(
            "{}",
            "No remote_url configured, calendar is local only".dimmed()
        ),
    }

    let report = &session.migration;
    if report.changed {
        println!(
            "Upgraded stored calendar: {} moved from weekday slots, {} unknown {} dropped",
            report.weekday_entries,
            report.dropped_keys,
            pluralize("key", report.dropped_keys),
        );
    }

    Ok(())
}

pub fn status(session: &Session) -> Result<()> {
    let Some(url) = &session.config.remote_url else {
        println!("{}", "No remote_url configured".dimmed());
        return Ok(());
    };

    println!("{} {}", "server:".dimmed(), url);
    println!("{} {}", "namespace:".dimmed(), session.config.namespace().prefix());
    if let Some(state) = session.bridge_state() {
        println!("{} {}", "state:".dimmed(), state.render());
    }
    Ok(())
}
