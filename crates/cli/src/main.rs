//! Clinica CLI - mock data and operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Print mock schedules as JSON
//! clinica-cli schedules generate -n 5 --status pending --priority high
//!
//! # Check the REST backend is reachable
//! clinica-cli backend check
//!
//! # Shipping, tax and total for a cart subtotal
//! clinica-cli cart quote --subtotal 89.90
//! ```
//!
//! # Commands
//!
//! - `schedules generate` - Generate mock schedules
//! - `backend check` - `GET {API_URL}/health`
//! - `cart quote` - Price a cart subtotal
//!
//! Results go to stdout; logs go to stderr (`RUST_LOG` controls the level).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use clinica_core::schedule::{Priority, ScheduleCategory, ScheduleStatus};

mod commands;

use commands::CommandError;
use commands::schedules::GenerateOptions;

#[derive(Parser)]
#[command(name = "clinica-cli")]
#[command(author, version, about = "Clinica CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mock schedule data
    Schedules {
        #[command(subcommand)]
        action: ScheduleAction,
    },
    /// REST backend tools
    Backend {
        #[command(subcommand)]
        action: BackendAction,
    },
    /// Cart pricing tools
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum ScheduleAction {
    /// Print generated schedules as JSON
    Generate {
        /// Number of schedules
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,

        /// Fix the status (`pending`, `in_progress`, `completed`, `cancelled`, `postponed`)
        #[arg(long)]
        status: Option<ScheduleStatus>,

        /// Fix the priority (`low`, `medium`, `high`, `urgent`)
        #[arg(long)]
        priority: Option<Priority>,

        /// Fix the category
        #[arg(long)]
        category: Option<ScheduleCategory>,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Subcommand)]
enum BackendAction {
    /// GET {API_URL}/health
    Check,
}

#[derive(Subcommand)]
enum CartAction {
    /// Shipping, tax and total for a subtotal
    Quote {
        /// Cart subtotal, e.g. 89.90
        #[arg(long)]
        subtotal: Decimal,
    },
}

#[tokio::main]
async fn main() {
    // Logs on stderr so stdout stays machine readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clinica_cli=info,clinica_backend=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            #[allow(clippy::print_stdout)]
            {
                println!("{output}");
            }
        }
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<String, CommandError> {
    match cli.command {
        Commands::Schedules { action } => match action {
            ScheduleAction::Generate {
                count,
                status,
                priority,
                category,
                seed,
            } => commands::schedules::generate(
                &GenerateOptions {
                    count,
                    status,
                    priority,
                    category,
                    seed,
                },
                chrono::Utc::now(),
            ),
        },
        Commands::Backend { action } => match action {
            BackendAction::Check => commands::backend::check().await,
        },
        Commands::Cart { action } => match action {
            CartAction::Quote { subtotal } => commands::cart::render(subtotal),
        },
    }
}
