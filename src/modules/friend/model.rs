use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::modules::{
    friend::schema::{FriendshipEntity, FriendshipStatus},
    user::schema::AccountSummary,
};

/// A friendship as seen from one participant.
#[derive(Debug, Clone, Serialize)]
pub struct FriendshipResponse {
    pub id: Uuid,
    pub status: FriendshipStatus,
    /// True when the viewer sent the request.
    pub outgoing: bool,
    pub other: AccountSummary,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl FriendshipResponse {
    pub fn new(friendship: &FriendshipEntity, viewer: &Uuid, other: AccountSummary) -> Self {
        FriendshipResponse {
            id: friendship.id,
            status: friendship.status,
            outgoing: friendship.sender_id == *viewer,
            other,
            created: friendship.created,
            updated: friendship.updated,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FriendRequestsResponse {
    pub received: Vec<FriendshipResponse>,
    pub sent: Vec<FriendshipResponse>,
}
