//! Ticket lifecycle rules
//!
//! Pure decision logic over the status domain: which transitions are legal,
//! when a ticket may close, and when comments may be added. No clock, no
//! storage - every answer is a function of the arguments alone.
//!
//! Allowed edges (reopen-permissive rule set):
//! open -> in_progress, in_progress -> open, open -> closed,
//! in_progress -> closed, closed -> open. Closing additionally requires at
//! least one comment.

use crate::ticket::Status;

/// Why a requested transition was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The edge is not in the allowed set
    InvalidTransition,
    /// The edge leads to closed but the ticket has no comments
    ClosedWithoutComment,
}

/// Decision for a requested status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Requested status equals the current one; nothing to do
    Unchanged,
    /// Transition is legal; carries the status to commit
    Applied(Status),
    /// Transition refused
    Rejected(RejectReason),
}

/// Decide whether `current -> requested` may commit
pub fn request_transition(
    current: Status,
    requested: Status,
    comment_count: usize,
) -> TransitionOutcome {
    use Status::{Closed, InProgress, Open};

    if current == requested {
        return TransitionOutcome::Unchanged;
    }

    match (current, requested) {
        (Open, InProgress) | (InProgress, Open) | (Closed, Open) => {
            TransitionOutcome::Applied(requested)
        }
        (Open, Closed) | (InProgress, Closed) => {
            if comment_count == 0 {
                TransitionOutcome::Rejected(RejectReason::ClosedWithoutComment)
            } else {
                TransitionOutcome::Applied(requested)
            }
        }
        _ => TransitionOutcome::Rejected(RejectReason::InvalidTransition),
    }
}

/// Comment eligibility: closed tickets accept no new comments
pub fn can_add_comment(current: Status) -> bool {
    !current.is_closed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Status::{Closed, InProgress, Open};

    #[test]
    fn same_status_is_unchanged_not_rejected() {
        for status in [Open, InProgress, Closed] {
            assert_eq!(
                request_transition(status, status, 0),
                TransitionOutcome::Unchanged
            );
        }
    }

    #[test]
    fn open_to_in_progress_allowed() {
        assert_eq!(
            request_transition(Open, InProgress, 0),
            TransitionOutcome::Applied(InProgress)
        );
    }

    #[test]
    fn reopen_allowed_from_in_progress_and_closed() {
        assert_eq!(
            request_transition(InProgress, Open, 0),
            TransitionOutcome::Applied(Open)
        );
        assert_eq!(
            request_transition(Closed, Open, 0),
            TransitionOutcome::Applied(Open)
        );
    }

    #[test]
    fn closed_to_in_progress_rejected() {
        assert_eq!(
            request_transition(Closed, InProgress, 5),
            TransitionOutcome::Rejected(RejectReason::InvalidTransition)
        );
    }

    #[test]
    fn close_requires_a_comment() {
        for from in [Open, InProgress] {
            assert_eq!(
                request_transition(from, Closed, 0),
                TransitionOutcome::Rejected(RejectReason::ClosedWithoutComment)
            );
            assert_eq!(
                request_transition(from, Closed, 1),
                TransitionOutcome::Applied(Closed)
            );
        }
    }

    #[test]
    fn decision_is_deterministic() {
        let first = request_transition(Open, Closed, 3);
        for _ in 0..10 {
            assert_eq!(request_transition(Open, Closed, 3), first);
        }
    }

    #[test]
    fn comments_blocked_only_when_closed() {
        assert!(can_add_comment(Open));
        assert!(can_add_comment(InProgress));
        assert!(!can_add_comment(Closed));
    }
}
