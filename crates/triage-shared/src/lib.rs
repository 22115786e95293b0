//! Shared types and utilities for the incident triage console.
//!
//! Ticket model, fixture store, filtering, statistics, upload validation
//! and the wire types of the classification backend.

pub mod error;
pub mod filter;
pub mod helpers;
pub mod prediction;
pub mod stats;
pub mod store;
pub mod ticket;
pub mod upload;

pub use error::TriageError;
pub use filter::{filter_tickets, StatusFilter};
pub use prediction::{FeedbackRecord, PredictionResult};
pub use stats::{generate_ticket_stats, TicketStats};
pub use store::{NewTicket, TicketStore};
pub use ticket::{Priority, Ticket, TicketStatus};
pub use upload::{validate_file, FileValidation, UploadedFile};

/// Default base URL of the classification backend
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5001";
