use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use timecard::config::{resolve_store, Settings};
use timecard::render;
use timecard::report::{active_session_info, earnings_timeline, recent_sessions};
use timecard::shell::Shell;
use timecard::tracker::{ClockOutOutcome, CompanySelector, Tracker};

#[derive(Parser)]
#[command(name = "timecard")]
#[command(about = "Clock in and out of freelance work sessions")]
struct Cli {
    /// Data file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive menu (default)
    Shell,
    /// Start a work session
    Start {
        /// Company number as shown by `companies` (1-based)
        #[arg(short, long, conflicts_with = "new", required_unless_present = "new")]
        company: Option<usize>,

        /// Create a company with this name and start the session there
        #[arg(short, long, value_name = "NAME")]
        new: Option<String>,

        /// Pay rate per hour
        #[arg(short, long, allow_negative_numbers = true)]
        rate: f64,
    },
    /// Clock out of the active session
    Stop {
        /// What was done during the session
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Show the active session
    Status,
    /// List sessions, oldest first
    Recent {
        /// How many sessions to show
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        count: Option<i64>,
    },
    /// List companies
    Companies,
    /// Add a company without starting a session
    AddCompany {
        name: String,
    },
    /// Earnings per completed session with a running total
    Earnings,
}

/// Initialize tracing with output to stderr so stdout stays the user surface
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "timecard=warn".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let settings = Settings::load();
    let store = resolve_store(cli.data_file)?;
    tracing::debug!("Using data file {}", store.path().display());
    let mut tracker = Tracker::open(store, || settings.fresh_profile());

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            Shell::new(&mut tracker, stdin.lock(), stdout.lock()).run()?;
        }
        Commands::Start { company, new, rate } => {
            let selector = match (company, new) {
                (_, Some(name)) => CompanySelector::New(name),
                (Some(0), None) => anyhow::bail!("Company numbers start at 1"),
                (Some(n), None) => CompanySelector::Existing(n - 1),
                (None, None) => anyhow::bail!("Either --company or --new is required"),
            };
            let outcome = tracker
                .start_session(selector, rate)
                .context("Failed to start session")?;
            if let Some(closed) = outcome.auto_closed {
                println!("Previous session for {} was closed.", closed.company_name);
            }
            println!(
                "Session {} started for {} at {}",
                outcome.session.session_id,
                outcome.session.company_name,
                outcome.session.start_timestamp
            );
        }
        Commands::Stop { description } => {
            match tracker
                .clock_out(&description)
                .context("Failed to clock out")?
            {
                ClockOutOutcome::Closed(closed) => println!(
                    "Session {} for {} ended at {}",
                    closed.session.session_id,
                    closed.session.company_name,
                    closed.end_timestamp
                ),
                ClockOutOutcome::NoActiveSession => println!("No active sessions."),
            }
        }
        Commands::Status => {
            let active = active_session_info(tracker.profile());
            print!("{}", render::render_status(active.as_ref()));
        }
        Commands::Recent { count } => {
            let count = count.unwrap_or(settings.default_recent_count);
            let recent = recent_sessions(tracker.profile(), count);
            print!("{}", render::render_sessions(&recent));
        }
        Commands::Companies => {
            let companies = tracker.profile().list_companies();
            print!("{}", render::render_companies(&companies));
        }
        Commands::AddCompany { name } => {
            let index = tracker
                .add_company(&name)
                .context("Failed to add company")?;
            println!("Added company {}. {}", index + 1, name.trim());
        }
        Commands::Earnings => {
            let timeline = earnings_timeline(tracker.profile());
            print!("{}", render::render_earnings(tracker.profile(), &timeline));
        }
    }

    Ok(())
}
