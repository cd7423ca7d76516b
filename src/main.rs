mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::event::EventFields;

#[derive(Parser)]
#[command(name = "worldboard")]
#[command(about = "Work with the worldboard calendar, map overlays, country data and projects")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the calendar week (or month) around today
    Calendar {
        /// Month view instead of week view
        #[arg(short, long)]
        month: bool,

        /// Move forward (positive) or back (negative) this many weeks or months
        #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
        shift: i32,
    },
    /// Manage calendar events
    Event {
        #[command(subcommand)]
        command: EventCommands,
    },
    /// Load a dataset overlay (ports, nuclear, oil_fields, ...)
    Overlay {
        dataset: String,

        /// Print every point
        #[arg(short, long)]
        verbose: bool,
    },
    /// Show the info panel of a country
    Country {
        /// ISO 3166-1 alpha-3 code (e.g. "FRA")
        iso3: String,

        /// Also show the leadership chart
        #[arg(short, long)]
        leadership: bool,

        /// Write the leadership chart as SVG to this file
        #[arg(long)]
        svg: Option<PathBuf>,
    },
    /// Manage projects
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Run a command palette entry (e.g. "/ports", "/flat")
    Command { input: String },
    /// List palette commands starting with the given text
    Suggest { input: String },
    /// Show config paths and settings, or change them
    Config {
        #[command(flatten)]
        changes: ConfigChanges,
    },
}

/// Values written back to config.toml when given.
#[derive(Args)]
pub struct ConfigChanges {
    /// Directory holding the JSON datasets
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Base URL for the JSON datasets; an empty value switches back to data_dir
    #[arg(long)]
    pub data_url: Option<String>,

    /// Directory for projects, events and settings
    #[arg(long)]
    pub store_dir: Option<PathBuf>,

    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Args)]
struct EventArgs {
    /// Date (YYYY-MM-DD)
    #[arg(short, long)]
    date: Option<String>,

    /// Hour between 7 and 22; empty for unscheduled
    #[arg(long)]
    hour: Option<String>,

    #[arg(short, long)]
    link: Option<String>,

    /// Description
    #[arg(long)]
    desc: Option<String>,

    /// Calendar id (defaults to the first visible calendar)
    #[arg(short, long)]
    calendar: Option<String>,
}

impl EventArgs {
    fn into_fields(self, title: Option<String>) -> EventFields {
        EventFields {
            title,
            date: self.date,
            hour: self.hour,
            link: self.link,
            desc: self.desc,
            calendar: self.calendar,
        }
    }
}

#[derive(Subcommand)]
enum EventCommands {
    /// List stored events
    List {
        /// Only events on this date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Create an event (prompts for a title if none is given)
    Add {
        title: Option<String>,

        #[command(flatten)]
        args: EventArgs,
    },
    /// Change fields of an event
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[command(flatten)]
        args: EventArgs,
    },
    /// Delete an event
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ProjectCommands {
    List,
    /// Create a project (prompts for a name if none is given)
    New { name: Option<String> },
    Rename { id: String, name: String },
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Calendar { month, shift } => commands::calendar::run(month, shift),
        Commands::Event { command } => match command {
            EventCommands::List { date } => commands::event::list(date),
            EventCommands::Add { title, args } => commands::event::add(args.into_fields(title)),
            EventCommands::Edit { id, title, args } => commands::event::edit(id, args.into_fields(title)),
            EventCommands::Delete { id, yes } => commands::event::delete(id, yes),
        },
        Commands::Overlay { dataset, verbose } => commands::overlay::run(&dataset, verbose).await,
        Commands::Country { iso3, leadership, svg } => commands::country::run(&iso3, leadership, svg).await,
        Commands::Project { command } => match command {
            ProjectCommands::List => commands::project::list(),
            ProjectCommands::New { name } => commands::project::create(name),
            ProjectCommands::Rename { id, name } => commands::project::rename(&id, &name),
            ProjectCommands::Delete { id } => commands::project::delete(&id),
        },
        Commands::Command { input } => commands::palette::run(&input).await,
        Commands::Suggest { input } => commands::palette::suggest(&input),
        Commands::Config { changes } => commands::config::run(changes),
    }
}
