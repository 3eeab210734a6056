use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::api::error;
use crate::modules::friend::schema::{FriendshipEntity, FriendshipFilter, FriendshipStatus};

/// Persistence for friendship rows.
///
/// Implementations own the symmetric pair predicate: every lookup by pair
/// matches `(sender, receiver)` in both orientations. Lists come back in
/// creation order (`created`, then `id`).
#[async_trait::async_trait]
pub trait FriendRepository: Send + Sync {
    async fn find_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError>;

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<FriendshipEntity>, error::SystemError>;

    async fn find_friendships(
        &self,
        user_id: &Uuid,
        filter: FriendshipFilter,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError>;

    /// Inserts a new row. Fails with `SystemError::Conflict` if the pair
    /// already has one, in either orientation.
    async fn create_friendship(
        &self,
        friendship: &FriendshipEntity,
    ) -> Result<FriendshipEntity, error::SystemError>;

    /// Moves the row to `to` only if it is still in `from`, stamping `updated`.
    /// Returns `None` when the row is gone or no longer in `from`.
    async fn update_status(
        &self,
        id: &Uuid,
        from: FriendshipStatus,
        to: FriendshipStatus,
        updated: DateTime<Utc>,
    ) -> Result<Option<FriendshipEntity>, error::SystemError>;

    /// Returns whether a row was removed.
    async fn delete_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<bool, error::SystemError>;
}
