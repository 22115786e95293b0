//! Aggregate statistics over a ticket collection.
//!
//! Counts per status, per priority and per category, plus the average
//! resolution time of resolved tickets.

use crate::helpers::days_between;
use crate::ticket::{Priority, Ticket, TicketStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ticket counts by priority (all four always present)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl PriorityCounts {
    fn record(&mut self, priority: Priority) {
        match priority {
            Priority::Low => self.low += 1,
            Priority::Medium => self.medium += 1,
            Priority::High => self.high += 1,
            Priority::Critical => self.critical += 1,
        }
    }

    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::Low => self.low,
            Priority::Medium => self.medium,
            Priority::High => self.high,
            Priority::Critical => self.critical,
        }
    }
}

/// Statistics for a ticket collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketStats {
    /// Number of tickets
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub closed: usize,
    pub by_priority: PriorityCounts,
    /// Category name to count, keyed in name order
    pub by_category: BTreeMap<String, usize>,
    /// Rounded mean days from creation to resolution; 0 with no resolved tickets
    pub avg_resolution_time: i64,
}

impl TicketStats {
    pub fn status_count(&self, status: TicketStatus) -> usize {
        match status {
            TicketStatus::Open => self.open,
            TicketStatus::InProgress => self.in_progress,
            TicketStatus::Resolved => self.resolved,
            TicketStatus::Closed => self.closed,
        }
    }

    fn record_status(&mut self, status: TicketStatus) {
        match status {
            TicketStatus::Open => self.open += 1,
            TicketStatus::InProgress => self.in_progress += 1,
            TicketStatus::Resolved => self.resolved += 1,
            TicketStatus::Closed => self.closed += 1,
        }
    }
}

/// Compute statistics for a ticket collection
pub fn generate_ticket_stats(tickets: &[Ticket]) -> TicketStats {
    let mut stats = TicketStats {
        total: tickets.len(),
        ..Default::default()
    };

    let mut total_resolution_days = 0i64;
    let mut resolved_count = 0i64;

    for ticket in tickets {
        stats.record_status(ticket.status());
        stats.by_priority.record(ticket.priority());
        *stats
            .by_category
            .entry(ticket.category().to_string())
            .or_insert(0) += 1;

        if ticket.is_resolved() {
            if let Some(days) = days_between(Some(ticket.created_at()), ticket.resolved_at()) {
                total_resolution_days += days;
                resolved_count += 1;
            }
        }
    }

    if resolved_count > 0 {
        stats.avg_resolution_time =
            (total_resolution_days as f64 / resolved_count as f64).round() as i64;
    }

    stats
}
