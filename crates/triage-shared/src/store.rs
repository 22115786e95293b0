//! In-memory ticket store.
//!
//! Tickets are kept in insertion order and never updated or removed.
//! Ids are assigned monotonically from the highest id seen so far.

use crate::error::TriageError;
use crate::ticket::{Priority, Ticket};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Fixture tickets loaded at startup
const SEED_TICKETS_JSON: &str = include_str!("../fixtures/seed_tickets.json");

/// Category used when an analysis produced no root cause
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Fields of a ticket created from an analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: String,
}

impl NewTicket {
    /// Ticket fields for an analyzed incident, categorized by its root cause
    pub fn from_analysis(
        title: impl Into<String>,
        description: impl Into<String>,
        root_cause: &str,
    ) -> Self {
        let category = if root_cause.trim().is_empty() {
            UNCATEGORIZED.to_string()
        } else {
            root_cause.trim().to_string()
        };
        Self {
            title: title.into(),
            description: description.into(),
            priority: Priority::default(),
            category,
        }
    }
}

/// Ordered, append-only ticket collection
#[derive(Debug, Clone, Default)]
pub struct TicketStore {
    tickets: Vec<Ticket>,
    next_id: u64,
}

impl TicketStore {
    /// Store holding the bundled fixture tickets
    pub fn seeded() -> Result<Self, TriageError> {
        let tickets: Vec<Ticket> = serde_json::from_str(SEED_TICKETS_JSON)?;
        Self::from_tickets(tickets)
    }

    /// Store holding `tickets`, rejecting duplicate ids
    pub fn from_tickets(tickets: Vec<Ticket>) -> Result<Self, TriageError> {
        let mut seen = HashSet::new();
        for ticket in &tickets {
            if !seen.insert(ticket.id()) {
                return Err(TriageError::DuplicateId(ticket.id()));
            }
        }
        let next_id = tickets.iter().map(Ticket::id).max().unwrap_or(0) + 1;
        Ok(Self { tickets, next_id })
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Append an open ticket created on `today`
    pub fn append(&mut self, new: NewTicket, today: NaiveDate) -> Result<&Ticket, TriageError> {
        let id = self.next_id.max(1);
        let ticket = Ticket::open(
            id,
            new.title,
            new.description,
            new.priority,
            today,
            new.category,
        )?;
        self.next_id = id + 1;
        self.tickets.push(ticket);
        Ok(&self.tickets[self.tickets.len() - 1])
    }
}
