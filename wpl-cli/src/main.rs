mod commands;
mod render;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wpl_core::DateKey;
use wpl_core::config::WplConfig;

use crate::session::Session;

#[derive(Parser)]
#[command(name = "wpl")]
#[command(about = "Plan and share the team calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Calendar(CalendarCommand),
    /// Config file location
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Commands that read or write the calendar, run inside an open session.
#[derive(Subcommand)]
enum CalendarCommand {
    /// Show one day's plan
    Day {
        /// Date (YYYY-MM-DD, "today" or "tomorrow"), defaults to today
        #[arg(value_parser = parse_date)]
        date: Option<DateKey>,
    },
    /// Show the week containing a date
    Week {
        #[arg(short, long, value_parser = parse_date)]
        date: Option<DateKey>,
    },
    /// Add, remove or clear events (coaches only)
    Event {
        #[command(subcommand)]
        action: EventAction,
    },
    /// Day plans (coaches only)
    Plan {
        #[command(subcommand)]
        action: PlanAction,
    },
    /// Sync with the server
    Sync {
        #[command(subcommand)]
        action: SyncAction,
    },
}

#[derive(Subcommand)]
enum EventAction {
    Add {
        #[arg(value_parser = parse_date)]
        date: DateKey,

        title: String,

        /// e.g. "3pm"
        #[arg(short, long)]
        time: Option<String>,

        #[arg(short, long)]
        note: Option<String>,
    },
    Remove {
        #[arg(value_parser = parse_date)]
        date: DateKey,

        /// Number shown next to the event by `wpl day`
        number: usize,
    },
    Clear {
        #[arg(value_parser = parse_date)]
        date: DateKey,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum PlanAction {
    /// Replace a day's plan and who it is for
    Set {
        #[arg(value_parser = parse_date)]
        date: DateKey,

        /// Plan line, repeat for several
        #[arg(short, long = "item")]
        items: Vec<String>,

        /// Athlete the plan is for, repeat for several
        #[arg(short, long = "athlete", conflicts_with = "all")]
        athletes: Vec<String>,

        /// Plan is for the entire team
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand)]
enum SyncAction {
    /// Reconcile the local store with the server and report what moved
    Hydrate,
    /// Show the server, namespace and bridge state
    Status,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print where the config file lives, creating it if needed
    Path,
}

fn parse_date(s: &str) -> Result<DateKey, String> {
    match s {
        "today" => Ok(DateKey::today()),
        "tomorrow" => Ok(DateKey::today().add_days(1)),
        "yesterday" => Ok(DateKey::today().add_days(-1)),
        _ => DateKey::parse(s).map_err(|e| e.to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Path => commands::config::path(),
        },
        Commands::Calendar(command) => {
            let config = WplConfig::load()?;
            let mut session = Session::open(config).await?;
            let result = run(&mut session, command);
            session.close().await;
            result
        }
    }
}

fn run(session: &mut Session, command: CalendarCommand) -> Result<()> {
    match command {
        CalendarCommand::Day { date } => {
            commands::day::run(session, date.unwrap_or_else(DateKey::today))
        }
        CalendarCommand::Week { date } => {
            commands::week::run(session, date.unwrap_or_else(DateKey::today))
        }
        CalendarCommand::Event { action } => match action {
            EventAction::Add {
                date,
                title,
                time,
                note,
            } => commands::event::add(session, date, &title, time.as_deref(), note.as_deref()),
            EventAction::Remove { date, number } => commands::event::remove(session, date, number),
            EventAction::Clear { date, force } => commands::event::clear(session, date, force),
        },
        CalendarCommand::Plan {
            action:
                PlanAction::Set {
                    date,
                    items,
                    athletes,
                    all,
                },
        } => commands::plan::set(session, date, items, athletes, all),
        CalendarCommand::Sync { action } => match action {
            SyncAction::Hydrate => commands::sync::hydrate(session),
            SyncAction::Status => commands::sync::status(session),
        },
    }
}
