//! helpdesk-core: Core library for the helpdesk ticket tracker
//!
//! Provides the data model, lifecycle rules, ticket service, and JSONL
//! storage for a small help-desk system. No SQL server - just files.

pub mod clock;
pub mod config;
pub mod error;
pub mod id;
pub mod lifecycle;
pub mod service;
pub mod store;
pub mod ticket;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::Error;
pub use id::generate_id;
pub use lifecycle::{RejectReason, TransitionOutcome, can_add_comment, request_transition};
pub use service::{
    SortOrder, StatusChange, TicketDetails, TicketFilter, TicketService, TicketSummary,
};
pub use store::Store;
pub use ticket::{Category, Comment, NewTicket, Priority, Status, Ticket};

/// Result type for helpdesk operations
pub type Result<T> = std::result::Result<T, Error>;
