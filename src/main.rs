mod commands;
mod render;
mod utils;
mod view;

use anyhow::Result;
use bookcal_core::config::BookingConfig;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::hours::HoursCommand;

#[derive(Parser)]
#[command(name = "bookcal")]
#[command(about = "Manage your bookings: week calendar, open slots, working hours")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the week grid, with concurrent appointments side by side
    Week {
        /// Week to show, relative to the current week (e.g. -1 for last week)
        #[arg(short, long, default_value_t = 0)]
        offset: i64,
    },
    /// List open booking slots for a day
    Slots {
        /// Day to check (YYYY-MM-DD)
        date: String,
    },
    /// Book a new appointment
    New {
        /// Appointment title
        title: Option<String>,

        /// Day to book (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        /// Client reference to attach
        #[arg(long)]
        client: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Change an existing appointment
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        /// New start in business-local time (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        start: Option<String>,

        /// New end in business-local time (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Cancel an appointment
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Configure working hours
    Hours {
        #[command(subcommand)]
        command: HoursCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = BookingConfig::load()?;

    match cli.command {
        Commands::Week { offset } => commands::week::run(&config, offset).await,
        Commands::Slots { date } => commands::slots::run(&config, &date).await,
        Commands::New {
            title,
            date,
            client,
            notes,
        } => commands::new::run(&config, title, date, client, notes).await,
        Commands::Edit {
            id,
            title,
            start,
            end,
            notes,
        } => commands::edit::run(&config, &id, title, start, end, notes).await,
        Commands::Delete { id, yes } => commands::delete::run(&config, &id, yes).await,
        Commands::Hours { command } => commands::hours::run(command),
    }
}
