//! Terminal rendering for calendar days.

use owo_colors::OwoColorize;
use wpl_core::DateKey;
use wpl_core::calendar::AudienceLabel;
use wpl_core::sync::{BridgeState, HydrateOutcome};

pub trait Render {
    fn render(&self) -> String;
}

impl Render for DateKey {
    fn render(&self) -> String {
        let weekday = self.date().format("%a");
        let today = if *self == DateKey::today() { " (today)" } else { "" };
        format!("{} {}{}", weekday.to_string().bold(), self.bold(), today.dimmed())
    }
}

impl Render for AudienceLabel {
    fn render(&self) -> String {
        match self {
            AudienceLabel::EntireTeam => self.to_string().green().to_string(),
            AudienceLabel::Athletes(_) => self.to_string().cyan().to_string(),
            AudienceLabel::You => self.to_string().yellow().to_string(),
            AudienceLabel::NotAssigned => self.to_string().dimmed().to_string(),
        }
    }
}

impl Render for HydrateOutcome {
    fn render(&self) -> String {
        match self {
            HydrateOutcome::Pulled { written, removed } => format!(
                "Pulled {} {} from server ({} removed locally)",
                written,
                pluralize("key", *written),
                removed
            ),
            HydrateOutcome::Pushed { count } => {
                format!("Server was empty, pushed {} {}", count, pluralize("key", *count))
            }
            HydrateOutcome::Disabled => "Server unreachable, working locally".red().to_string(),
        }
    }
}

impl Render for BridgeState {
    fn render(&self) -> String {
        match self {
            BridgeState::Idle => "not hydrated".dimmed().to_string(),
            BridgeState::Hydrating => "hydrating".yellow().to_string(),
            BridgeState::Ready => "in sync".green().to_string(),
            BridgeState::Disabled => "disabled for this session".red().to_string(),
        }
    }
}

/// Lines for one day: header, audience, then numbered items.
pub fn render_day(date: &DateKey, items: &[String], label: &AudienceLabel) -> Vec<String> {
    let mut lines = vec![date.render()];

    if items.is_empty() {
        lines.push(format!("   {}", "Nothing planned".dimmed()));
        return lines;
    }

    lines.push(format!("   {} {}", "for".dimmed(), label.render()));
    for (i, item) in items.iter().enumerate() {
        lines.push(format!("   {} {}", format!("{}.", i + 1).dimmed(), item));
    }
    lines
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
