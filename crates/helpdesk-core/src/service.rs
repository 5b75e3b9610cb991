//! Ticket service: orchestrates creation, comments, and status changes
//!
//! The only caller of the lifecycle rules. Every write is a single
//! load -> decide -> persist pass over the store; rejected decisions never
//! touch storage.

use crate::clock::{Clock, SystemClock};
use crate::lifecycle::{RejectReason, TransitionOutcome, can_add_comment, request_transition};
use crate::store::Store;
use crate::ticket::{
    Category, Comment, NewTicket, Priority, Status, Ticket, normalize_author, normalize_message,
};
use crate::{Error, Result, generate_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of a status update request
#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub message: String,
    pub status: Status,
    pub updated_at: DateTime<Utc>,
}

/// List projection: no comment bodies, just the count
#[derive(Debug, Clone, Serialize)]
pub struct TicketSummary {
    pub id: String,
    pub title: String,
    pub created_by: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub comment_count: usize,
}

/// Detail view: the ticket plus its comments in creation order
#[derive(Debug, Clone, Serialize)]
pub struct TicketDetails {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub comments: Vec<Comment>,
}

/// Sort order for ticket listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Newest first (created_at descending)
    #[default]
    Newest,
    /// Oldest first (created_at ascending)
    Oldest,
}

/// Filters for listing tickets
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    /// Case-insensitive substring match on title or description
    pub search: Option<String>,
    pub sort: SortOrder,
}

/// Domain service over the store and lifecycle rules
pub struct TicketService {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl TicketService {
    pub fn new(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Open the store for the current directory with the system clock
    pub fn open() -> Result<Self> {
        Ok(Self::new(Store::open()?, Arc::new(SystemClock)))
    }

    /// The configured settings
    pub fn config(&self) -> Result<crate::Config> {
        self.store.config()
    }

    /// Create a ticket; status is always forced to open
    pub fn create_ticket(&mut self, new: NewTicket) -> Result<Ticket> {
        let new = new.normalized()?;
        let prefix = self.store.prefix()?;
        let now = self.clock.now();

        let ticket = Ticket {
            id: generate_id(&prefix),
            title: new.title,
            description: new.description,
            created_by: new.created_by,
            category: new.category,
            priority: new.priority,
            status: Status::Open,
            created_at: now,
            updated_at: now,
        };

        self.store.insert_ticket(ticket.clone())?;
        Ok(ticket)
    }

    /// Attach a comment; leaves the ticket's status and updated_at untouched
    pub fn add_comment(&mut self, ticket_id: &str, author: &str, message: &str) -> Result<Comment> {
        let status = self
            .store
            .ticket(ticket_id)
            .ok_or_else(|| Error::NotFound(ticket_id.to_string()))?
            .status;

        if !can_add_comment(status) {
            return Err(Error::ClosedTicket(ticket_id.to_string()));
        }

        let prefix = self.store.prefix()?;
        let comment = Comment {
            id: generate_id(&prefix),
            ticket_id: ticket_id.to_string(),
            author: normalize_author(author)?,
            message: normalize_message(message)?,
            created_at: self.clock.now(),
        };

        self.store.insert_comment(comment.clone())?;
        Ok(comment)
    }

    /// Request a status change; the lifecycle rules decide
    pub fn update_status(&mut self, ticket_id: &str, requested: Status) -> Result<StatusChange> {
        let ticket = self
            .store
            .ticket(ticket_id)
            .ok_or_else(|| Error::NotFound(ticket_id.to_string()))?
            .clone();
        let comment_count = self.store.comment_count(ticket_id);

        match request_transition(ticket.status, requested, comment_count) {
            TransitionOutcome::Unchanged => Ok(StatusChange {
                message: "Status unchanged.".to_string(),
                status: ticket.status,
                updated_at: ticket.updated_at,
            }),
            TransitionOutcome::Applied(next) => {
                let mut updated = ticket;
                updated.status = next;
                updated.updated_at = self.clock.now();
                let updated_at = updated.updated_at;
                self.store.update_ticket(updated)?;
                Ok(StatusChange {
                    message: "Status updated.".to_string(),
                    status: next,
                    updated_at,
                })
            }
            TransitionOutcome::Rejected(RejectReason::InvalidTransition) => {
                Err(Error::InvalidTransition {
                    from: ticket.status,
                    to: requested,
                })
            }
            TransitionOutcome::Rejected(RejectReason::ClosedWithoutComment) => {
                Err(Error::ClosedWithoutComment)
            }
        }
    }

    /// Ticket with its comments, ascending by creation time
    pub fn get_ticket(&self, ticket_id: &str) -> Result<TicketDetails> {
        let ticket = self
            .store
            .ticket(ticket_id)
            .ok_or_else(|| Error::NotFound(ticket_id.to_string()))?
            .clone();
        let comments = self
            .store
            .comments(ticket_id)
            .into_iter()
            .cloned()
            .collect();
        Ok(TicketDetails { ticket, comments })
    }

    /// Comments for a ticket, ascending by creation time
    pub fn list_comments(&self, ticket_id: &str) -> Result<Vec<Comment>> {
        if self.store.ticket(ticket_id).is_none() {
            return Err(Error::NotFound(ticket_id.to_string()));
        }
        Ok(self
            .store
            .comments(ticket_id)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Filtered ticket summaries, newest first by default
    pub fn list_tickets(&self, filter: &TicketFilter) -> Vec<TicketSummary> {
        let search = filter.search.as_ref().map(|s| s.trim().to_lowercase());

        let mut tickets: Vec<&Ticket> = self
            .store
            .tickets()
            .into_iter()
            .filter(|t| filter.status.is_none_or(|s| t.status == s))
            .filter(|t| filter.priority.is_none_or(|p| t.priority == p))
            .filter(|t| filter.category.is_none_or(|c| t.category == c))
            .filter(|t| {
                search.as_ref().is_none_or(|needle| {
                    t.title.to_lowercase().contains(needle)
                        || t.description.to_lowercase().contains(needle)
                })
            })
            .collect();

        match filter.sort {
            SortOrder::Newest => tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::Oldest => tickets.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }

        tickets
            .into_iter()
            .map(|t| TicketSummary {
                id: t.id.clone(),
                title: t.title.clone(),
                created_by: t.created_by.clone(),
                category: t.category,
                priority: t.priority,
                status: t.status,
                created_at: t.created_at,
                updated_at: t.updated_at,
                comment_count: self.store.comment_count(&t.id),
            })
            .collect()
    }

    /// Delete a ticket and all of its comments
    pub fn delete_ticket(&mut self, ticket_id: &str) -> Result<()> {
        self.store.delete_ticket(ticket_id)
    }

    /// Insert demo data; no-op when tickets already exist
    ///
    /// Returns the number of tickets seeded.
    pub fn seed_demo_data(&mut self) -> Result<usize> {
        if self.store.ticket_count() > 0 {
            return Ok(0);
        }

        let prefix = self.store.prefix()?;
        let now = self.clock.now();

        let demo = [
            (
                "Cannot login to dashboard",
                "User receives invalid credentials error although password is correct.",
                "Joseph",
                Category::It,
                Priority::High,
                Status::Open,
            ),
            (
                "Air conditioning issue in meeting room",
                "AC not cooling properly in meeting room 3.",
                "Collins",
                Category::Facilities,
                Priority::Medium,
                Status::InProgress,
            ),
            (
                "Request: Add new user role",
                "Need a new role for contractor access with limited permissions.",
                "Noah",
                Category::General,
                Priority::Low,
                Status::Open,
            ),
            (
                "Printer not working on floor 5",
                "Printer shows paper jam error even after clearing tray.",
                "Alessandra",
                Category::Facilities,
                Priority::Medium,
                Status::Open,
            ),
            (
                "API timeout when submitting form",
                "Submission occasionally fails with timeout after 30 seconds.",
                "Dennis",
                Category::It,
                Priority::High,
                Status::Open,
            ),
        ];

        let mut ids = Vec::new();
        for (title, description, created_by, category, priority, status) in demo {
            let ticket = Ticket {
                id: generate_id(&prefix),
                title: title.to_string(),
                description: description.to_string(),
                created_by: created_by.to_string(),
                category,
                priority,
                status,
                created_at: now,
                updated_at: now,
            };
            ids.push(ticket.id.clone());
            self.store.insert_ticket(ticket)?;
        }

        let notes = [
            (1, "Technician assigned, investigating root cause."),
            (1, "Temporary fix applied; monitoring performance."),
            (4, "Can you share the steps to reproduce + timestamp?"),
        ];
        for (idx, message) in notes {
            let comment = Comment {
                id: generate_id(&prefix),
                ticket_id: ids[idx].clone(),
                author: "Support Agent".to_string(),
                message: message.to_string(),
                created_at: self.clock.now(),
            };
            self.store.insert_comment(comment)?;
        }

        Ok(ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{Duration, TimeZone};

    fn fixture() -> (tempfile::TempDir, TicketService, Arc<FixedClock>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::init_at(dir.path(), "hd").unwrap();
        let start = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();
        let clock = Arc::new(FixedClock::new(start));
        let service = TicketService::new(store, clock.clone());
        (dir, service, clock)
    }

    fn draft(title: &str) -> NewTicket {
        NewTicket {
            title: title.to_string(),
            description: "Something is broken".to_string(),
            created_by: "Joseph".to_string(),
            category: Category::It,
            priority: Priority::High,
        }
    }

    #[test]
    fn created_ticket_is_open_and_stamped() {
        let (_dir, mut service, clock) = fixture();
        let ticket = service.create_ticket(draft("Login broken")).unwrap();
        assert_eq!(ticket.status, Status::Open);
        assert_eq!(ticket.created_at, clock.now());
        assert_eq!(ticket.updated_at, ticket.created_at);
    }

    #[test]
    fn invalid_ticket_not_persisted() {
        let (_dir, mut service, _clock) = fixture();
        let err = service.create_ticket(draft("  ")).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(service.list_tickets(&TicketFilter::default()).is_empty());
    }

    #[test]
    fn close_blocked_until_commented() {
        let (_dir, mut service, _clock) = fixture();
        let ticket = service.create_ticket(draft("Login broken")).unwrap();

        let err = service.update_status(&ticket.id, Status::Closed).unwrap_err();
        assert!(matches!(err, Error::ClosedWithoutComment));
        assert_eq!(
            service.get_ticket(&ticket.id).unwrap().ticket.status,
            Status::Open
        );

        service.add_comment(&ticket.id, "Support Agent", "ack").unwrap();
        let change = service.update_status(&ticket.id, Status::Closed).unwrap();
        assert_eq!(change.status, Status::Closed);
    }

    #[test]
    fn closed_ticket_accepts_no_comments() {
        let (_dir, mut service, _clock) = fixture();
        let ticket = service.create_ticket(draft("Login broken")).unwrap();
        service.add_comment(&ticket.id, "Support Agent", "ack").unwrap();
        service.update_status(&ticket.id, Status::Closed).unwrap();

        let err = service
            .add_comment(&ticket.id, "Support Agent", "late note")
            .unwrap_err();
        assert!(matches!(err, Error::ClosedTicket(_)));
        assert_eq!(service.list_comments(&ticket.id).unwrap().len(), 1);
    }

    #[test]
    fn reopen_from_in_progress_accepted() {
        let (_dir, mut service, _clock) = fixture();
        let ticket = service.create_ticket(draft("Login broken")).unwrap();
        service.add_comment(&ticket.id, "Support Agent", "ack").unwrap();
        service.update_status(&ticket.id, Status::InProgress).unwrap();

        let change = service.update_status(&ticket.id, Status::Open).unwrap();
        assert_eq!(change.status, Status::Open);
    }

    #[test]
    fn closed_to_in_progress_rejected() {
        let (_dir, mut service, _clock) = fixture();
        let ticket = service.create_ticket(draft("Login broken")).unwrap();
        service.add_comment(&ticket.id, "Support Agent", "ack").unwrap();
        service.update_status(&ticket.id, Status::Closed).unwrap();

        let err = service
            .update_status(&ticket.id, Status::InProgress)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                from: Status::Closed,
                to: Status::InProgress
            }
        ));
    }

    #[test]
    fn unchanged_request_is_a_noop() {
        let (_dir, mut service, clock) = fixture();
        let ticket = service.create_ticket(draft("Login broken")).unwrap();
        clock.advance(Duration::minutes(10));

        let change = service.update_status(&ticket.id, Status::Open).unwrap();
        assert_eq!(change.message, "Status unchanged.");
        assert_eq!(change.status, Status::Open);
        // No write happened, so updated_at still carries the creation stamp
        assert_eq!(
            service.get_ticket(&ticket.id).unwrap().ticket.updated_at,
            ticket.created_at
        );
    }

    #[test]
    fn status_change_refreshes_updated_at_but_comments_do_not() {
        let (_dir, mut service, clock) = fixture();
        let ticket = service.create_ticket(draft("Login broken")).unwrap();

        clock.advance(Duration::minutes(5));
        service.add_comment(&ticket.id, "Support Agent", "ack").unwrap();
        assert_eq!(
            service.get_ticket(&ticket.id).unwrap().ticket.updated_at,
            ticket.created_at
        );

        clock.advance(Duration::minutes(5));
        let change = service.update_status(&ticket.id, Status::InProgress).unwrap();
        assert_eq!(change.updated_at, clock.now());
    }

    #[test]
    fn missing_ticket_is_not_found() {
        let (_dir, mut service, _clock) = fixture();
        assert!(matches!(
            service.get_ticket("hd-gone"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            service.update_status("hd-gone", Status::Closed),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            service.add_comment("hd-gone", "Jo", "hello"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn comments_come_back_in_creation_order() {
        let (_dir, mut service, clock) = fixture();
        let ticket = service.create_ticket(draft("Login broken")).unwrap();

        for message in ["first note", "second note", "third note"] {
            service.add_comment(&ticket.id, "Support Agent", message).unwrap();
            clock.advance(Duration::seconds(1));
        }

        let comments = service.list_comments(&ticket.id).unwrap();
        let messages: Vec<&str> = comments.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["first note", "second note", "third note"]);
        assert!(comments.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[test]
    fn list_filters_and_sorts() {
        let (_dir, mut service, clock) = fixture();
        let first = service.create_ticket(draft("Login broken")).unwrap();
        clock.advance(Duration::minutes(1));
        let second = service
            .create_ticket(NewTicket {
                title: "Printer offline".to_string(),
                description: "Paper jam on floor 5".to_string(),
                created_by: "Alessandra".to_string(),
                category: Category::Facilities,
                priority: Priority::Low,
            })
            .unwrap();

        // Default: newest first
        let all = service.list_tickets(&TicketFilter::default());
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);

        let oldest = service.list_tickets(&TicketFilter {
            sort: SortOrder::Oldest,
            ..Default::default()
        });
        assert_eq!(oldest[0].id, first.id);

        let it_only = service.list_tickets(&TicketFilter {
            category: Some(Category::It),
            ..Default::default()
        });
        assert_eq!(it_only.len(), 1);
        assert_eq!(it_only[0].id, first.id);

        let search = service.list_tickets(&TicketFilter {
            search: Some("PAPER jam".to_string()),
            ..Default::default()
        });
        assert_eq!(search.len(), 1);
        assert_eq!(search[0].id, second.id);
    }

    #[test]
    fn summaries_carry_comment_counts() {
        let (_dir, mut service, _clock) = fixture();
        let ticket = service.create_ticket(draft("Login broken")).unwrap();
        service.add_comment(&ticket.id, "Support Agent", "ack").unwrap();
        service.add_comment(&ticket.id, "Support Agent", "fixed").unwrap();

        let all = service.list_tickets(&TicketFilter::default());
        assert_eq!(all[0].comment_count, 2);
    }

    #[test]
    fn delete_cascades() {
        let (_dir, mut service, _clock) = fixture();
        let ticket = service.create_ticket(draft("Login broken")).unwrap();
        service.add_comment(&ticket.id, "Support Agent", "ack").unwrap();

        service.delete_ticket(&ticket.id).unwrap();
        assert!(matches!(
            service.get_ticket(&ticket.id),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            service.delete_ticket(&ticket.id),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn seed_is_idempotent() {
        let (_dir, mut service, _clock) = fixture();
        assert_eq!(service.seed_demo_data().unwrap(), 5);
        assert_eq!(service.seed_demo_data().unwrap(), 0);

        let all = service.list_tickets(&TicketFilter::default());
        assert_eq!(all.len(), 5);

        let in_progress = service.list_tickets(&TicketFilter {
            status: Some(Status::InProgress),
            ..Default::default()
        });
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].comment_count, 2);
    }
}
