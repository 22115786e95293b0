//! Command handlers for triagectl.

use crate::analyze::{
    feedback_failure_notice, run_analysis, AnalyzeWorkflow, ANALYZE_FAILED_NOTICE,
    FEEDBACK_THANKS_NOTICE,
};
use crate::attachment::AttachedFile;
use crate::backend::{HttpBackend, TriageBackend};
use crate::config::{ConfigSource, TriageConfig};
use crate::dashboard::{render_table, TicketRow};
use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::time::Duration;
use triage_shared::helpers::{format_date_time, priority_tone, status_tone, Tone};
use triage_shared::{
    filter_tickets, generate_ticket_stats, FeedbackRecord, Priority, StatusFilter, TicketStatus,
    TicketStore,
};

const KEY_WIDTH: usize = 18;
const WRAP_WIDTH: usize = 76;

fn print_kv(key: &str, value: &str) {
    println!("{:width$} {}", key.dimmed(), value, width = KEY_WIDTH);
}

fn paint(text: &str, tone: Tone) -> String {
    match tone {
        Tone::Red => text.red().to_string(),
        Tone::Orange => text.bright_red().to_string(),
        Tone::Yellow => text.yellow().to_string(),
        Tone::Green => text.green().to_string(),
        Tone::Gray => text.dimmed().to_string(),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn backend_for(config: &TriageConfig) -> Result<HttpBackend> {
    HttpBackend::from_config(&config.backend).context("Failed to create backend client")
}

/// Handle tickets command
pub fn tickets(
    config: &TriageConfig,
    search: Option<String>,
    status: Option<StatusFilter>,
    json: bool,
) -> Result<()> {
    let store = TicketStore::seeded().context("Failed to load fixture tickets")?;
    let status = status.unwrap_or(config.dashboard.default_status_filter);
    let visible = filter_tickets(store.tickets(), search.as_deref().unwrap_or(""), status);

    if json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    let rows: Vec<TicketRow> = visible.iter().copied().map(TicketRow::from).collect();
    print!("{}", render_table(&rows));
    println!(
        "{}",
        format!("{} of {} tickets ({})", rows.len(), store.len(), status.label()).dimmed()
    );
    Ok(())
}

/// Handle stats command
pub fn stats(json: bool) -> Result<()> {
    let store = TicketStore::seeded().context("Failed to load fixture tickets")?;
    let stats = generate_ticket_stats(store.tickets());

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!();
    println!("{}", "Ticket statistics".bold().cyan());
    print_kv("total", &stats.total.to_string());
    for status in TicketStatus::ALL {
        let count = stats.status_count(status).to_string();
        print_kv(status.label(), &paint(&count, status_tone(status)));
    }
    println!();

    println!("{}", "By priority".bold());
    for priority in Priority::ALL {
        let count = stats.by_priority.get(priority).to_string();
        print_kv(priority.as_str(), &paint(&count, priority_tone(priority)));
    }
    println!();

    println!("{}", "By category".bold());
    for (category, count) in &stats.by_category {
        print_kv(category, &count.to_string());
    }
    println!();

    print_kv(
        "avg resolution",
        &format!("{} days", stats.avg_resolution_time),
    );
    Ok(())
}

/// Handle analyze command
pub async fn analyze(
    config: &TriageConfig,
    title: String,
    description: Option<String>,
    file: Option<PathBuf>,
    feedback: Option<String>,
) -> Result<()> {
    let backend = backend_for(config)?;

    let mut workflow = AnalyzeWorkflow::new(config.analyze.max_upload_mb);
    workflow.set_title(title);
    if let Some(text) = description {
        workflow.set_description(text);
    }
    if let Some(path) = file {
        let attached = AttachedFile::inspect(&path)
            .with_context(|| format!("Cannot attach {}", path.display()))?;
        workflow.attach_file(attached)?;
    }

    let Some(request) = workflow.begin_submit() else {
        bail!("Nothing to analyze: a title and a description or file are required");
    };

    let progress = spinner("Analyzing ticket...");
    let outcome = run_analysis(&backend, request).await;
    progress.finish_and_clear();

    let analysis = workflow
        .finish_submit(outcome)
        .context(ANALYZE_FAILED_NOTICE)?;

    println!();
    println!("{}", "Analysis Results".bold().cyan());
    print_kv("title", &analysis.title);
    print_kv("analyzed", &format_date_time(Some(analysis.analyzed_at)));
    print_kv("root cause", &analysis.result.root_cause.bold().to_string());
    println!("{}", "summary".dimmed());
    println!(
        "{}",
        textwrap::indent(&textwrap::fill(&analysis.result.summary, WRAP_WIDTH), "  ")
    );
    if !analysis.result.similar_cases.is_empty() {
        print_kv(
            "similar cases",
            &analysis.result.similar_cases.len().to_string(),
        );
    }
    println!();

    if let Some(label) = feedback {
        workflow.set_true_label(label);
        let Some(record) = workflow.begin_feedback() else {
            bail!("Feedback label must not be empty");
        };
        send_feedback(&backend, &record).await?;
    }
    Ok(())
}

/// Handle feedback command
pub async fn feedback(
    config: &TriageConfig,
    description: String,
    predicted: String,
    label: String,
) -> Result<()> {
    let label = label.trim();
    if label.is_empty() {
        bail!("Feedback label must not be empty");
    }

    let backend = backend_for(config)?;
    let record = FeedbackRecord {
        description,
        predicted,
        true_label: label.to_string(),
    };
    send_feedback(&backend, &record).await
}

async fn send_feedback(backend: &dyn TriageBackend, record: &FeedbackRecord) -> Result<()> {
    match backend.submit_feedback(record).await {
        Ok(()) => {
            println!("{} {}", "✓".green(), FEEDBACK_THANKS_NOTICE);
            Ok(())
        }
        Err(e) => {
            let notice = feedback_failure_notice(&e);
            Err(anyhow::Error::new(e).context(notice))
        }
    }
}

/// Handle ping command
pub async fn ping(config: &TriageConfig) -> Result<()> {
    let backend = backend_for(config)?;
    backend
        .ping()
        .await
        .with_context(|| format!("Backend at {} did not answer", backend.base_url()))?;
    println!("{} backend at {} is reachable", "✓".green(), backend.base_url());
    Ok(())
}

/// Handle config command
pub fn show_config(config: &TriageConfig, source: &ConfigSource) -> Result<()> {
    println!("{}", format!("# source: {}", source).dimmed());
    print!("{}", config.to_toml()?);
    Ok(())
}
