//! Ticket types for the incident dashboard.
//!
//! A Ticket is immutable once created. Status and priority are closed
//! enums; unknown strings are rejected when parsing, never defaulted.
//! The only cross-field rule is that a resolution date exists only on
//! resolved tickets, and every constructor enforces it.

use crate::error::TriageError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ticket lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    /// Wire name (`in_progress`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Human label (`in progress`)
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            other => Err(TriageError::UnknownStatus(other.to_string())),
        }
    }
}

/// Ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(TriageError::UnknownPriority(other.to_string())),
        }
    }
}

/// A tracked incident
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TicketRecord", into = "TicketRecord")]
pub struct Ticket {
    id: u64,
    title: String,
    description: String,
    status: TicketStatus,
    priority: Priority,
    created_at: NaiveDate,
    resolved_at: Option<NaiveDate>,
    category: String,
}

impl Ticket {
    /// Build a ticket, checking the resolution invariant
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        id: u64,
        title: impl Into<String>,
        description: impl Into<String>,
        status: TicketStatus,
        priority: Priority,
        created_at: NaiveDate,
        resolved_at: Option<NaiveDate>,
        category: impl Into<String>,
    ) -> Result<Self, TriageError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TriageError::EmptyTitle);
        }
        if resolved_at.is_some() && status != TicketStatus::Resolved {
            return Err(TriageError::ResolvedAtWithoutResolution {
                id,
                status: status.to_string(),
            });
        }

        Ok(Self {
            id,
            title,
            description: description.into(),
            status,
            priority,
            created_at,
            resolved_at,
            category: category.into(),
        })
    }

    /// A freshly opened ticket with no resolution date
    pub fn open(
        id: u64,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        created_at: NaiveDate,
        category: impl Into<String>,
    ) -> Result<Self, TriageError> {
        Self::try_new(
            id,
            title,
            description,
            TicketStatus::Open,
            priority,
            created_at,
            None,
            category,
        )
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> TicketStatus {
        self.status
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn created_at(&self) -> NaiveDate {
        self.created_at
    }

    pub fn resolved_at(&self) -> Option<NaiveDate> {
        self.resolved_at
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn is_resolved(&self) -> bool {
        self.status == TicketStatus::Resolved
    }
}

/// Wire form of a ticket (camelCase keys, `resolvedAt: null` when absent)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TicketRecord {
    id: u64,
    title: String,
    description: String,
    status: TicketStatus,
    priority: Priority,
    created_at: NaiveDate,
    #[serde(default)]
    resolved_at: Option<NaiveDate>,
    category: String,
}

impl TryFrom<TicketRecord> for Ticket {
    type Error = TriageError;

    fn try_from(r: TicketRecord) -> Result<Self, Self::Error> {
        Ticket::try_new(
            r.id,
            r.title,
            r.description,
            r.status,
            r.priority,
            r.created_at,
            r.resolved_at,
            r.category,
        )
    }
}

impl From<Ticket> for TicketRecord {
    fn from(t: Ticket) -> Self {
        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            status: t.status,
            priority: t.priority,
            created_at: t.created_at,
            resolved_at: t.resolved_at,
            category: t.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_open_ticket_has_no_resolution() {
        let ticket = Ticket::open(
            7,
            "DB down",
            "timeout errors",
            Priority::Medium,
            date("2025-06-20"),
            "Database",
        )
        .unwrap();

        assert_eq!(ticket.status(), TicketStatus::Open);
        assert!(ticket.resolved_at().is_none());
        assert!(!ticket.is_resolved());
    }

    #[test]
    fn test_resolved_at_requires_resolved_status() {
        let err = Ticket::try_new(
            1,
            "Login error",
            "",
            TicketStatus::Closed,
            Priority::High,
            date("2025-06-15"),
            Some(date("2025-06-16")),
            "Authentication",
        )
        .unwrap_err();

        assert!(matches!(err, TriageError::ResolvedAtWithoutResolution { id: 1, .. }));
    }

    #[test]
    fn test_empty_title_rejected() {
        let err = Ticket::open(1, "   ", "x", Priority::Low, date("2025-06-15"), "UI")
            .unwrap_err();
        assert!(matches!(err, TriageError::EmptyTitle));
    }

    #[test]
    fn test_status_parsing_rejects_unknown() {
        assert_eq!("in_progress".parse::<TicketStatus>().unwrap(), TicketStatus::InProgress);
        assert!("pending".parse::<TicketStatus>().is_err());
        assert!("In_Progress".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn test_priority_parsing_rejects_unknown() {
        assert_eq!("critical".parse::<Priority>().unwrap(), Priority::Critical);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_status_label() {
        assert_eq!(TicketStatus::InProgress.label(), "in progress");
        assert_eq!(TicketStatus::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn test_json_uses_camel_case_and_null_resolution() {
        let ticket = Ticket::open(3, "UI", "Mobile", Priority::Medium, date("2025-06-18"), "UI/UX")
            .unwrap();
        let json = serde_json::to_value(&ticket).unwrap();

        assert_eq!(json["createdAt"], "2025-06-18");
        assert!(json["resolvedAt"].is_null());
        assert_eq!(json["status"], "open");
    }

    #[test]
    fn test_json_rejects_invariant_violation() {
        let raw = r#"{
            "id": 9, "title": "x", "description": "y", "status": "open",
            "priority": "low", "createdAt": "2025-06-01", "resolvedAt": "2025-06-02",
            "category": "Email"
        }"#;
        assert!(serde_json::from_str::<Ticket>(raw).is_err());
    }

    #[test]
    fn test_json_rejects_unknown_status() {
        let raw = r#"{
            "id": 9, "title": "x", "description": "y", "status": "wontfix",
            "priority": "low", "createdAt": "2025-06-01", "resolvedAt": null,
            "category": "Email"
        }"#;
        assert!(serde_json::from_str::<Ticket>(raw).is_err());
    }
}
