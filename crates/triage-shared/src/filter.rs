//! Search and status filtering over tickets.

use crate::error::TriageError;
use crate::ticket::{Ticket, TicketStatus};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Status selector; `all` matches every status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(TicketStatus),
}

impl StatusFilter {
    /// Options offered by the dashboard selector, in display order
    pub const DASHBOARD_OPTIONS: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Only(TicketStatus::Open),
        StatusFilter::Only(TicketStatus::InProgress),
        StatusFilter::Only(TicketStatus::Resolved),
    ];

    pub fn matches(&self, status: TicketStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    /// Selector label (`All Status`, `In Progress`, ...)
    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All Status",
            StatusFilter::Only(TicketStatus::Open) => "Open",
            StatusFilter::Only(TicketStatus::InProgress) => "In Progress",
            StatusFilter::Only(TicketStatus::Resolved) => "Resolved",
            StatusFilter::Only(TicketStatus::Closed) => "Closed",
        }
    }

    /// Next dashboard option, wrapping around
    pub fn next(&self) -> StatusFilter {
        let options = &Self::DASHBOARD_OPTIONS;
        match options.iter().position(|o| o == self) {
            Some(i) => options[(i + 1) % options.len()],
            None => StatusFilter::All,
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(StatusFilter::All);
        }
        s.parse::<TicketStatus>()
            .map(StatusFilter::Only)
            .map_err(|_| TriageError::UnknownStatusFilter(s.to_string()))
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = TriageError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<StatusFilter> for String {
    fn from(filter: StatusFilter) -> Self {
        filter.to_string()
    }
}

/// Whether a ticket's title, description or category contains `term`,
/// ignoring case. An empty term matches everything.
pub fn matches_search(ticket: &Ticket, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    [ticket.title(), ticket.description(), ticket.category()]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Tickets matching both the search term and the status filter, in order
pub fn filter_tickets<'a>(
    tickets: &'a [Ticket],
    search_term: &str,
    status_filter: StatusFilter,
) -> Vec<&'a Ticket> {
    tickets
        .iter()
        .filter(|t| matches_search(t, search_term) && status_filter.matches(t.status()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::Priority;
    use chrono::NaiveDate;

    fn ticket(id: u64, title: &str, category: &str, status: TicketStatus) -> Ticket {
        let created = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let resolved = (status == TicketStatus::Resolved).then_some(created);
        Ticket::try_new(id, title, "details", status, Priority::Low, created, resolved, category)
            .unwrap()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let tickets = vec![ticket(1, "Database Timeout", "Database", TicketStatus::Open)];
        assert_eq!(filter_tickets(&tickets, "dATAbase", StatusFilter::All).len(), 1);
    }

    #[test]
    fn test_search_covers_category() {
        let tickets = vec![ticket(1, "Slow page", "Performance", TicketStatus::Open)];
        assert_eq!(filter_tickets(&tickets, "perf", StatusFilter::All).len(), 1);
    }

    #[test]
    fn test_status_filter_combines_with_search() {
        let tickets = vec![
            ticket(1, "Email broken", "Email", TicketStatus::Open),
            ticket(2, "Email slow", "Email", TicketStatus::Resolved),
        ];
        let found = filter_tickets(&tickets, "email", StatusFilter::Only(TicketStatus::Resolved));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), 2);
    }

    #[test]
    fn test_status_filter_parsing() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "in_progress".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(TicketStatus::InProgress)
        );
        assert!("everything".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_status_filter_cycles_dashboard_options() {
        let mut filter = StatusFilter::All;
        for _ in 0..StatusFilter::DASHBOARD_OPTIONS.len() {
            filter = filter.next();
        }
        assert_eq!(filter, StatusFilter::All);
        assert_eq!(StatusFilter::Only(TicketStatus::Closed).next(), StatusFilter::All);
    }

    #[test]
    fn test_status_filter_serde_roundtrip_as_string() {
        let json = serde_json::to_string(&StatusFilter::Only(TicketStatus::Open)).unwrap();
        assert_eq!(json, "\"open\"");
        let back: StatusFilter = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StatusFilter::Only(TicketStatus::Open));
    }
}
