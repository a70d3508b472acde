//! bxg-tools - Main Entry Point
//!
//! Parses the command line, opens the data directory and dispatches to the
//! handlers in the `bxg_tools` library.

use anyhow::Result;
use bxg_tools::{AppConfig, Planner};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// bxg-tools - todos with recurrence, agenda, holidays, countdown and notes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Data directory holding the JSON state files
    data_dir: PathBuf,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a todo
    Add {
        title: String,
        /// Due date/time (YYYY-MM-DD, 'YYYY-MM-DD HH:MM' or RFC 3339); default: in one hour
        #[arg(long)]
        due: Option<String>,
        /// none, hourly, daily, weekly, monthly
        #[arg(long)]
        repeat: Option<String>,
        /// low, medium, high
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        note: Option<String>,
        /// Comma separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Edit a todo
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        repeat: Option<String>,
        /// todo, doing, done, archived
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        tags: Option<String>,
    },
    /// Delete todos
    Remove {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Advance todos to their next status
    Cycle {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// List todos
    List {
        /// Comma separated statuses
        #[arg(long)]
        status: Option<String>,
        /// today, 24h, week, month, done, expired, all
        #[arg(long)]
        window: Option<String>,
        /// Case-insensitive text over title, note and tags
        #[arg(long)]
        search: Option<String>,
        /// Due on or after
        #[arg(long)]
        from: Option<String>,
        /// Due on or before
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        include_archived: bool,
        #[arg(long)]
        exclude_notes: bool,
    },
    /// Expand todos into occurrences between two instants
    Materialize { start: String, end: String },
    /// Upcoming occurrences and events
    Agenda {
        /// Look-ahead in hours
        #[arg(long)]
        hours: Option<i64>,
    },
    /// Add a manual calendar event
    EventAdd {
        title: String,
        start: String,
        #[arg(long)]
        end: Option<String>,
    },
    /// Occurrence counts per day with holiday markers
    Days { start: String, end: String },
    /// Holiday entries for a year
    Holidays { year: String },
    /// Refresh a year's holidays from the configured payload files
    SyncHolidays { year: String },
    /// Countdown timer
    Countdown {
        #[command(subcommand)]
        action: CountdownAction,
    },
    /// Markdown documents
    Docs {
        #[command(subcommand)]
        action: DocsAction,
    },
    /// Show or change settings
    Settings {
        /// zh, en
        #[arg(long)]
        language: Option<String>,
        /// IANA timezone, e.g. Asia/Shanghai
        #[arg(long)]
        timezone: Option<String>,
        /// dark, light, system
        #[arg(long)]
        theme: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum CountdownAction {
    Start { target: String },
    Pause,
    Resume,
    Reset,
    Mute,
    Status,
}

#[derive(Subcommand, Debug)]
enum DocsAction {
    List,
    New,
    Show { id: String },
    Save {
        id: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    Remove { id: String },
}

async fn run(planner: &Planner, command: Command) -> Result<String> {
    match command {
        Command::Add {
            title,
            due,
            repeat,
            priority,
            note,
            tags,
        } => planner.handle_add(title, due, repeat, priority, note, tags).await,
        Command::Update {
            id,
            title,
            due,
            repeat,
            status,
            priority,
            note,
            tags,
        } => {
            planner
                .handle_update(id, title, due, repeat, status, priority, note, tags)
                .await
        }
        Command::Remove { ids } => planner.handle_remove(ids).await,
        Command::Cycle { ids } => planner.handle_cycle(ids).await,
        Command::List {
            status,
            window,
            search,
            from,
            to,
            include_archived,
            exclude_notes,
        } => {
            planner
                .handle_list(status, window, search, from, to, include_archived, exclude_notes)
                .await
        }
        Command::Materialize { start, end } => planner.handle_materialize(start, end).await,
        Command::Agenda { hours } => planner.handle_agenda(hours).await,
        Command::EventAdd { title, start, end } => {
            planner.handle_event_add(title, start, end).await
        }
        Command::Days { start, end } => planner.handle_days(start, end).await,
        Command::Holidays { year } => planner.handle_holidays(year).await,
        Command::SyncHolidays { year } => planner.handle_sync_holidays(year).await,
        Command::Countdown { action } => match action {
            CountdownAction::Start { target } => planner.handle_countdown_start(target).await,
            CountdownAction::Pause => planner.handle_countdown_pause().await,
            CountdownAction::Resume => planner.handle_countdown_resume().await,
            CountdownAction::Reset => planner.handle_countdown_reset().await,
            CountdownAction::Mute => planner.handle_countdown_mute().await,
            CountdownAction::Status => planner.handle_countdown_status().await,
        },
        Command::Docs { action } => match action {
            DocsAction::List => planner.handle_docs_list().await,
            DocsAction::New => planner.handle_docs_new().await,
            DocsAction::Show { id } => planner.handle_docs_show(id).await,
            DocsAction::Save { id, title, content } => {
                planner.handle_docs_save(id, title, content).await
            }
            DocsAction::Remove { id } => planner.handle_docs_remove(id).await,
        },
        Command::Settings {
            language,
            timezone,
            theme,
        } => planner.handle_settings(language, timezone, theme).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    // Logs go to stderr so command output stays clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bxg_tools=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match args.config {
        Some(ref path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    let planner = Planner::with_config(&args.data_dir, &config)?;
    let output = run(&planner, args.command).await?;
    println!("{}", output);
    Ok(())
}
