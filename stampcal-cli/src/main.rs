mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use crate::commands::Context;

#[derive(Parser)]
#[command(name = "stampcal")]
#[command(about = "Keep stamp calendars: define emoji stamps and place them on days")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Signup { email: Option<String> },
    /// Sign in with email and password
    Login { email: Option<String> },
    /// End the current session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List your calendars
    Calendars,
    /// Create a calendar
    NewCalendar {
        title: Option<String>,

        /// Color theme (#RRGGBB); prompts with the preset palette if omitted
        #[arg(short, long)]
        theme: Option<String>,
    },
    /// List your stamps
    Stamps,
    /// Create a stamp
    NewStamp {
        name: String,

        /// Emoji shown on stamped days
        #[arg(short, long)]
        emoji: Option<String>,
    },
    /// Show a calendar month with its stamps
    Show {
        /// Calendar id or title
        calendar: String,

        /// Month to show (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Place a stamp on a day
    Stamp {
        /// Calendar id or title
        calendar: String,

        /// Stamp id or name
        stamp: String,

        /// Day to stamp (YYYY-MM-DD or e.g. "yesterday"), defaults to today
        #[arg(long)]
        on: Option<String>,
    },
    /// Show one event and its stamp
    Event { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let ctx = Context::load()?;

    match cli.command {
        Commands::Signup { email } => commands::auth::signup(&ctx, email).await,
        Commands::Login { email } => commands::auth::login(&ctx, email).await,
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Whoami => commands::auth::whoami(&ctx).await,
        Commands::Calendars => commands::calendars::list(&ctx).await,
        Commands::NewCalendar { title, theme } => {
            commands::calendars::new(&ctx, title, theme).await
        }
        Commands::Stamps => commands::stamps::list(&ctx).await,
        Commands::NewStamp { name, emoji } => commands::stamps::new(&ctx, &name, emoji).await,
        Commands::Show { calendar, month } => {
            commands::show::run(&ctx, &calendar, month.as_deref()).await
        }
        Commands::Stamp { calendar, stamp, on } => {
            commands::stamp::run(&ctx, &calendar, &stamp, on.as_deref()).await
        }
        Commands::Event { id } => commands::event::run(&ctx, &id).await,
    }
}

/// Log to stderr; `STAMPCAL_LOG` takes `RUST_LOG`-style directives.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("STAMPCAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    if let Err(e) = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        eprintln!("tracing init failed: {e}");
    }
}
