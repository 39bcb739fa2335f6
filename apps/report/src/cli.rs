use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Nexus Invoicing report
#[derive(Debug, Parser)]
#[command(name = "nexus-report", version)]
pub struct Cli {
    /// Config file (default: nexus.toml in the platform config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Also show the saved invoice draft
    #[arg(long)]
    pub draft: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Start a mock checkout against an invoice after the report
    Pay {
        invoice_id: String,
        /// Amount in cents
        cents: i64,
    },
}
