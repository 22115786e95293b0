//! Dashboard view model
//!
//! Holds the search box, the applied (debounced) search term and the
//! status filter, and turns the live ticket list into table rows and
//! quick-stat counts. Drawing lives in `tui`.

use crate::debounce::Debouncer;
use std::time::{Duration, Instant};
use triage_shared::helpers::{format_date, priority_tone, status_tone, Tone};
use triage_shared::{filter_tickets, StatusFilter, Ticket, TicketStatus};

/// Shown in place of the table when nothing matches
pub const NO_RESULTS_NOTICE: &str = "No tickets found matching your criteria.";

/// The four counters above the ticket table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuickStats {
    pub total: usize,
    pub resolved: usize,
    pub open: usize,
    pub in_progress: usize,
}

impl QuickStats {
    /// Count straight from the ticket list
    ///
    /// Independent of `generate_ticket_stats`; tests check they agree.
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        let count = |status: TicketStatus| tickets.iter().filter(|t| t.status() == status).count();
        Self {
            total: tickets.len(),
            resolved: count(TicketStatus::Resolved),
            open: count(TicketStatus::Open),
            in_progress: count(TicketStatus::InProgress),
        }
    }
}

/// Search and filter state for the dashboard
#[derive(Debug, Clone)]
pub struct DashboardView {
    /// Text currently in the search box
    search_input: String,
    /// Term the table is filtered by
    search_term: String,
    status_filter: StatusFilter,
    debouncer: Debouncer<String>,
}

impl DashboardView {
    pub fn new(search_term: String, status_filter: StatusFilter, debounce: Duration) -> Self {
        Self {
            search_input: search_term.clone(),
            search_term,
            status_filter,
            debouncer: Debouncer::new(debounce),
        }
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    /// Update the search box; the term applies after the quiet period
    pub fn set_search_input(&mut self, text: String, now: Instant) {
        self.search_input = text.clone();
        self.debouncer.push(text, now);
    }

    /// Apply a pending search term whose quiet period has passed.
    /// Returns true when the applied term changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(term) => self.apply(term),
            None => false,
        }
    }

    /// Apply any pending search term immediately
    pub fn flush_search(&mut self) -> bool {
        match self.debouncer.flush() {
            Some(term) => self.apply(term),
            None => false,
        }
    }

    fn apply(&mut self, term: String) -> bool {
        if term == self.search_term {
            return false;
        }
        self.search_term = term;
        true
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
    }

    pub fn cycle_status_filter(&mut self) -> StatusFilter {
        self.status_filter = self.status_filter.next();
        self.status_filter
    }

    /// Tickets passing the applied search term and status filter
    pub fn visible<'a>(&self, tickets: &'a [Ticket]) -> Vec<&'a Ticket> {
        filter_tickets(tickets, &self.search_term, self.status_filter)
    }
}

/// One formatted table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRow {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub status_tone: Tone,
    pub priority: String,
    pub priority_tone: Tone,
    pub category: String,
    pub created: String,
    pub resolved: String,
}

impl From<&Ticket> for TicketRow {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id(),
            title: ticket.title().to_string(),
            description: ticket.description().to_string(),
            status: ticket.status().label().to_string(),
            status_tone: status_tone(ticket.status()),
            priority: ticket.priority().to_string(),
            priority_tone: priority_tone(ticket.priority()),
            category: ticket.category().to_string(),
            created: format_date(Some(ticket.created_at())),
            resolved: format_date(ticket.resolved_at()),
        }
    }
}

pub const TABLE_HEADERS: [&str; 7] = [
    "Title",
    "Description",
    "Status",
    "Priority",
    "Category",
    "Created",
    "Resolved",
];

const MAX_CELL_WIDTH: usize = 40;

impl TicketRow {
    pub fn cells(&self) -> [&str; 7] {
        [
            &self.title,
            &self.description,
            &self.status,
            &self.priority,
            &self.category,
            &self.created,
            &self.resolved,
        ]
    }
}

/// Shorten `text` to `width` characters, marking the cut with `…`
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Plain-text table for non-interactive output
pub fn render_table(rows: &[TicketRow]) -> String {
    if rows.is_empty() {
        return format!("{}\n", NO_RESULTS_NOTICE);
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.cells().iter().map(|c| truncate(c, MAX_CELL_WIDTH)).collect())
        .collect();

    let mut widths: Vec<usize> = TABLE_HEADERS.iter().map(|h| h.len()).collect();
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |values: &[String]| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let headers: Vec<String> = TABLE_HEADERS.iter().map(|h| h.to_string()).collect();
    let mut out = line(&headers[..]);
    out.push('\n');
    for row in &cells {
        out.push_str(&line(&row[..]));
        out.push('\n');
    }
    out
}
