//! slotdb CLI
//!
//! Command-line tools for slotdb contractor data files.
//!
//! # Commands
//!
//! - `init` - Create an empty data file
//! - `inspect` - Display header geometry and slot counts
//! - `dump` - List record slots
//! - `find` - Search records with `field:OP:pattern` criteria
//! - `book` / `free` - Book a contractor for a customer, or release it

mod commands;

use clap::{Parser, Subcommand};
use commands::CliError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// slotdb command-line data file tools.
#[derive(Parser)]
#[command(name = "slotdb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the data file
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty contractor data file
    Init,

    /// Display header geometry and slot counts
    Inspect {
        /// Show the field table
        #[arg(long)]
        fields: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List record slots
    Dump {
        /// Include tombstoned slots
        #[arg(short, long)]
        all: bool,

        /// Maximum number of slots to list
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Search records
    Find {
        /// Criteria as field:OP:pattern, e.g. name:ST:Mo or size:>=:5
        criteria: Vec<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Book a contractor for a customer
    Book {
        /// Record id of the contractor
        id: u32,

        /// 8-digit customer number
        owner: u32,
    },

    /// Make a booked contractor available again
    Free {
        /// Record id of the contractor
        id: u32,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Init => {
            let path = cli.path.ok_or(CliError::PathRequired("init"))?;
            commands::init::run(&path)?;
        }
        Commands::Inspect { fields, format } => {
            let path = cli.path.ok_or(CliError::PathRequired("inspect"))?;
            commands::inspect::run(&path, fields, &format)?;
        }
        Commands::Dump { all, limit, format } => {
            let path = cli.path.ok_or(CliError::PathRequired("dump"))?;
            commands::dump::run(&path, all, limit, &format)?;
        }
        Commands::Find { criteria, format } => {
            let path = cli.path.ok_or(CliError::PathRequired("find"))?;
            commands::find::run(&path, &criteria, &format)?;
        }
        Commands::Book { id, owner } => {
            let path = cli.path.ok_or(CliError::PathRequired("book"))?;
            commands::booking::book(&path, id, owner)?;
        }
        Commands::Free { id } => {
            let path = cli.path.ok_or(CliError::PathRequired("free"))?;
            commands::booking::free(&path, id)?;
        }
        Commands::Version => {
            println!("slotdb CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("slotdb Core v{}", slotdb_core::VERSION);
        }
    }

    Ok(())
}
