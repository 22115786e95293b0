//! CLI - Command-line argument parsing
//!
//! Defines the CLI structure using clap.
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use triage_shared::StatusFilter;

/// Incident triage console
#[derive(Parser, Debug)]
#[command(name = "triagectl")]
#[command(about = "Incident triage console - browse tickets and predict root causes", long_about = None)]
#[command(version = env!("TRIAGE_VERSION"))]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Backend base URL (overrides backend.base_url)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Config file (overrides $TRIAGE_CONFIG and the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand (if not provided, starts the interactive TUI)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive dashboard
    Tui,

    /// List tickets
    Tickets {
        /// Case-insensitive match on title, description or category
        #[arg(long)]
        search: Option<String>,

        /// all, open, in_progress, resolved or closed
        #[arg(long)]
        status: Option<StatusFilter>,

        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Show ticket statistics
    Stats {
        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Predict the root cause of an incident
    Analyze {
        /// Ticket title
        #[arg(long)]
        title: String,

        /// Incident description
        #[arg(long, required_unless_present = "file")]
        description: Option<String>,

        /// Log file to preprocess when no description is given
        #[arg(long)]
        file: Option<PathBuf>,

        /// Send this corrected root cause after the prediction
        #[arg(long)]
        feedback: Option<String>,
    },

    /// Send a corrected root cause for a prediction
    Feedback {
        /// Description the prediction was made for
        #[arg(long)]
        description: String,

        /// Predicted root cause
        #[arg(long)]
        predicted: String,

        /// Correct root cause
        #[arg(long)]
        label: String,
    },

    /// Check that the backend answers
    Ping,

    /// Print the effective configuration
    Config,
}
