//! triagectl - incident triage console
//!
//! Without a subcommand starts the interactive dashboard.

use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;
use tracing::debug;
use triagectl::cli::{Cli, Commands};
use triagectl::config::TriageConfig;
use triagectl::errors::{exit_code_for, EXIT_SUCCESS};
use triagectl::prefs::Preferences;
use triagectl::{commands, logging, tui};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            exit_code_for(&e)
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Tui);
    let log_file = if matches!(command, Commands::Tui) {
        logging::init_tui()
    } else {
        logging::init_cli();
        None
    };

    let (config, source) = TriageConfig::load(cli.config.as_deref())?;
    let config = config.with_backend_url(cli.backend_url);
    debug!(%source, backend = %config.backend.base_url, "Configuration loaded");
    if let Some(path) = &log_file {
        debug!(path = %path.display(), "Writing logs to file");
    }

    match command {
        Commands::Tui => {
            let result = tui::run(&config, Preferences::user_default()).await;
            if let Some(path) = &log_file {
                eprintln!("{}", logging::log_location_hint(path).dimmed());
            }
            result
        }
        Commands::Tickets {
            search,
            status,
            json,
        } => commands::tickets(&config, search, status, json),
        Commands::Stats { json } => commands::stats(json),
        Commands::Analyze {
            title,
            description,
            file,
            feedback,
        } => commands::analyze(&config, title, description, file, feedback).await,
        Commands::Feedback {
            description,
            predicted,
            label,
        } => commands::feedback(&config, description, predicted, label).await,
        Commands::Ping => commands::ping(&config).await,
        Commands::Config => commands::show_config(&config, &source),
    }
}
