//! Error types for the triage domain.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Unknown ticket status: '{0}'")]
    UnknownStatus(String),

    #[error("Unknown ticket priority: '{0}'")]
    UnknownPriority(String),

    #[error("Unknown status filter: '{0}'. Valid values: all, open, in_progress, resolved, closed")]
    UnknownStatusFilter(String),

    #[error("Ticket {id} has a resolution date but status '{status}'")]
    ResolvedAtWithoutResolution { id: u64, status: String },

    #[error("Ticket title must not be empty")]
    EmptyTitle,

    #[error("Duplicate ticket id {0}")]
    DuplicateId(u64),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
