//! Error types for helpdesk

use crate::ticket::Status;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Ticket not found: {0}")]
    NotFound(String),

    #[error("Invalid status transition: {from} => {to}")]
    InvalidTransition { from: Status, to: Status },

    #[error("Cannot close a ticket without at least one comment")]
    ClosedWithoutComment,

    #[error("Cannot add comments to a closed ticket: {0}")]
    ClosedTicket(String),

    #[error("Ticket already exists: {0}")]
    AlreadyExists(String),

    #[error("Store not initialized. Run 'helpdesk init' first.")]
    NotInitialized,

    #[error("Store already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    #[error("{0}")]
    Other(String),
}
