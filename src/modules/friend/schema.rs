use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

use crate::modules::friend::error::FriendshipError;

/// Where a friendship request stands.
///
/// `Pending` is the only non-terminal state: it moves to `Accepted` or
/// `Rejected` and nothing moves out of those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(type_name = "friendship_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Rejected,
}

impl FriendshipStatus {
    /// Lower-case label used in feed headings ("accepted", "rejected").
    pub fn label(self) -> &'static str {
        match self {
            FriendshipStatus::Pending => "pending",
            FriendshipStatus::Accepted => "accepted",
            FriendshipStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, FriendshipStatus::Pending)
    }

    /// Validates `self -> to` against the state machine and returns the new state.
    pub fn transition(self, to: FriendshipStatus) -> Result<FriendshipStatus, FriendshipError> {
        match (self, to) {
            (FriendshipStatus::Pending, FriendshipStatus::Accepted)
            | (FriendshipStatus::Pending, FriendshipStatus::Rejected) => Ok(to),
            (from, to) => Err(FriendshipError::InvalidTransition { from, to }),
        }
    }
}

impl std::fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of `friendships`. A single row covers both orientations of a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct FriendshipEntity {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: FriendshipStatus,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl FriendshipEntity {
    pub fn new(sender_id: Uuid, receiver_id: Uuid, status: FriendshipStatus, now: DateTime<Utc>) -> Self {
        FriendshipEntity {
            id: Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext)),
            sender_id,
            receiver_id,
            status,
            created: now,
            updated: now,
        }
    }

    pub fn involves(&self, user_id: &Uuid) -> bool {
        self.sender_id == *user_id || self.receiver_id == *user_id
    }

    /// True when this row is the record for the unordered pair `{a, b}`.
    pub fn is_pair(&self, a: &Uuid, b: &Uuid) -> bool {
        (self.sender_id == *a && self.receiver_id == *b)
            || (self.sender_id == *b && self.receiver_id == *a)
    }

    /// The participant that is not `user_id`.
    pub fn other_party(&self, user_id: &Uuid) -> Uuid {
        if self.sender_id == *user_id { self.receiver_id } else { self.sender_id }
    }

    /// A terminal transition has been recorded on this row.
    pub fn has_response(&self) -> bool {
        self.status.is_terminal() && self.updated != self.created
    }
}

/// Status-scoped views over one account's friendships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendshipFilter {
    /// Any status, account on either side.
    All,
    /// Pending, account on either side.
    Pending,
    /// Pending, account is the sender.
    PendingSent,
    /// Pending, account is the receiver.
    PendingReceived,
    /// Accepted, account on either side.
    Current,
}

impl FriendshipFilter {
    pub fn matches(self, friendship: &FriendshipEntity, user_id: &Uuid) -> bool {
        match self {
            FriendshipFilter::All => friendship.involves(user_id),
            FriendshipFilter::Pending => {
                friendship.involves(user_id) && friendship.status == FriendshipStatus::Pending
            }
            FriendshipFilter::PendingSent => {
                friendship.sender_id == *user_id && friendship.status == FriendshipStatus::Pending
            }
            FriendshipFilter::PendingReceived => {
                friendship.receiver_id == *user_id
                    && friendship.status == FriendshipStatus::Pending
            }
            FriendshipFilter::Current => {
                friendship.involves(user_id) && friendship.status == FriendshipStatus::Accepted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::new_id;

    #[test]
    fn pending_moves_to_either_terminal_state() {
        assert_eq!(
            FriendshipStatus::Pending.transition(FriendshipStatus::Accepted).unwrap(),
            FriendshipStatus::Accepted
        );
        assert_eq!(
            FriendshipStatus::Pending.transition(FriendshipStatus::Rejected).unwrap(),
            FriendshipStatus::Rejected
        );
    }

    #[test]
    fn terminal_states_do_not_move() {
        for from in [FriendshipStatus::Accepted, FriendshipStatus::Rejected] {
            for to in [FriendshipStatus::Pending, FriendshipStatus::Accepted, FriendshipStatus::Rejected] {
                assert!(matches!(
                    from.transition(to),
                    Err(FriendshipError::InvalidTransition { from: f, to: t }) if f == from && t == to
                ));
            }
        }
        assert!(FriendshipStatus::Pending.transition(FriendshipStatus::Pending).is_err());
    }

    #[test]
    fn pair_matching_ignores_orientation() {
        let (a, b, c) = (new_id(), new_id(), new_id());
        let friendship = FriendshipEntity::new(a, b, FriendshipStatus::Pending, Utc::now());

        assert!(friendship.is_pair(&a, &b));
        assert!(friendship.is_pair(&b, &a));
        assert!(!friendship.is_pair(&a, &c));
        assert_eq!(friendship.other_party(&a), b);
        assert_eq!(friendship.other_party(&b), a);
        assert_eq!(friendship.created, friendship.updated);
        assert!(!friendship.has_response());
    }

    #[test]
    fn filters_respect_side_and_status() {
        let (a, b) = (new_id(), new_id());
        let pending = FriendshipEntity::new(a, b, FriendshipStatus::Pending, Utc::now());
        let accepted = FriendshipEntity::new(a, b, FriendshipStatus::Accepted, Utc::now());

        assert!(FriendshipFilter::PendingSent.matches(&pending, &a));
        assert!(!FriendshipFilter::PendingSent.matches(&pending, &b));
        assert!(FriendshipFilter::PendingReceived.matches(&pending, &b));
        assert!(!FriendshipFilter::Current.matches(&pending, &a));
        assert!(FriendshipFilter::Current.matches(&accepted, &b));
        assert!(FriendshipFilter::All.matches(&accepted, &a));
        assert!(!FriendshipFilter::Pending.matches(&accepted, &a));
    }
}
