//! Ticket and comment data model for helpdesk
//!
//! Every text field is trimmed before validation; comment authors are
//! mandatory and length-bounded like the rest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MAX: usize = 2000;
pub const CREATED_BY_MAX: usize = 100;
pub const AUTHOR_MIN: usize = 2;
pub const AUTHOR_MAX: usize = 100;
pub const MESSAGE_MIN: usize = 2;
pub const MESSAGE_MAX: usize = 2000;

/// Ticket status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Closed,
}

impl Status {
    pub fn is_closed(&self) -> bool {
        matches!(self, Status::Closed)
    }
}

impl std::str::FromStr for Status {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Status::Open),
            "in_progress" | "in-progress" | "inprogress" => Ok(Status::InProgress),
            "closed" => Ok(Status::Closed),
            _ => Err(crate::Error::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Open => write!(f, "open"),
            Status::InProgress => write!(f, "in_progress"),
            Status::Closed => write!(f, "closed"),
        }
    }
}

/// Ticket category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    It,
    Facilities,
    #[default]
    General,
}

impl std::str::FromStr for Category {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "it" => Ok(Category::It),
            "facilities" => Ok(Category::Facilities),
            "general" => Ok(Category::General),
            _ => Err(crate::Error::InvalidCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::It => write!(f, "it"),
            Category::Facilities => write!(f, "facilities"),
            Category::General => write!(f, "general"),
        }
    }
}

/// Ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::str::FromStr for Priority {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(crate::Error::InvalidPriority(s.to_string())),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// Core ticket record
///
/// Category and priority are fixed at creation; only `status` (and with it
/// `updated_at`) changes afterwards. Comments live in their own records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique identifier (hd-xxxx)
    pub id: String,

    /// Short summary
    pub title: String,

    /// Detailed description
    pub description: String,

    /// Who opened the ticket
    pub created_by: String,

    /// Category, fixed at creation
    pub category: Category,

    /// Priority, fixed at creation
    pub priority: Priority,

    /// Current status
    pub status: Status,

    /// When the ticket was created
    pub created_at: DateTime<Utc>,

    /// When the ticket last changed status
    pub updated_at: DateTime<Utc>,
}

/// A note attached to a ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier
    pub id: String,

    /// Owning ticket
    pub ticket_id: String,

    /// Who wrote the note
    pub author: String,

    /// Note body
    pub message: String,

    /// When the comment was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub created_by: String,
    pub category: Category,
    pub priority: Priority,
}

impl NewTicket {
    /// Trim all text fields and check bounds
    pub fn normalized(self) -> crate::Result<Self> {
        Ok(Self {
            title: required("title", &self.title, TITLE_MAX)?,
            description: required("description", &self.description, DESCRIPTION_MAX)?,
            created_by: required("createdBy", &self.created_by, CREATED_BY_MAX)?,
            category: self.category,
            priority: self.priority,
        })
    }
}

/// Trim and validate a comment author
pub fn normalize_author(author: &str) -> crate::Result<String> {
    bounded("author", author, AUTHOR_MIN, AUTHOR_MAX)
}

/// Trim and validate a comment message
pub fn normalize_message(message: &str) -> crate::Result<String> {
    bounded("message", message, MESSAGE_MIN, MESSAGE_MAX)
}

fn required(field: &str, value: &str, max: usize) -> crate::Result<String> {
    bounded(field, value, 1, max)
}

fn bounded(field: &str, value: &str, min: usize, max: usize) -> crate::Result<String> {
    let value = value.trim();
    let len = value.chars().count();
    if len < min {
        let detail = if min <= 1 {
            format!("{field} is required")
        } else {
            format!("{field} must be at least {min} characters")
        };
        return Err(crate::Error::Validation(detail));
    }
    if len > max {
        return Err(crate::Error::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(value.to_string())
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] [{}] {} - {}",
            self.id, self.priority, self.category, self.status, self.title
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewTicket {
        NewTicket {
            title: "  Printer jam  ".to_string(),
            description: "Paper jam on floor 5".to_string(),
            created_by: "Alessandra".to_string(),
            category: Category::Facilities,
            priority: Priority::Medium,
        }
    }

    #[test]
    fn normalized_trims_fields() {
        let ticket = draft().normalized().unwrap();
        assert_eq!(ticket.title, "Printer jam");
    }

    #[test]
    fn empty_title_rejected() {
        let mut ticket = draft();
        ticket.title = "   ".to_string();
        let err = ticket.normalized().unwrap_err();
        assert!(matches!(err, crate::Error::Validation(_)));
    }

    #[test]
    fn overlong_title_rejected() {
        let mut ticket = draft();
        ticket.title = "x".repeat(TITLE_MAX + 1);
        assert!(ticket.normalized().is_err());
    }

    #[test]
    fn title_at_max_accepted() {
        let mut ticket = draft();
        ticket.title = "x".repeat(TITLE_MAX);
        assert!(ticket.normalized().is_ok());
    }

    #[test]
    fn author_needs_two_chars() {
        assert!(normalize_author("J").is_err());
        assert_eq!(normalize_author(" Jo ").unwrap(), "Jo");
    }

    #[test]
    fn message_bounds() {
        assert!(normalize_message("a").is_err());
        assert!(normalize_message(&"m".repeat(MESSAGE_MAX + 1)).is_err());
        assert_eq!(normalize_message("ack").unwrap(), "ack");
    }

    #[test]
    fn status_round_trip() {
        for status in [Status::Open, Status::InProgress, Status::Closed] {
            let parsed: Status = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("paused".parse::<Status>().is_err());
    }

    #[test]
    fn category_and_priority_parse() {
        assert_eq!("IT".parse::<Category>().unwrap(), Category::It);
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
    }
}
