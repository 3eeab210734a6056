//! In-memory friendship store for tests.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    api::error,
    modules::friend::{
        repository::FriendRepository,
        schema::{FriendshipEntity, FriendshipFilter, FriendshipStatus},
    },
};

/// Rows kept in insertion order, which is also creation order.
#[derive(Clone, Default)]
pub struct FriendRepositoryMemory {
    rows: Arc<RwLock<Vec<FriendshipEntity>>>,
}

impl FriendRepositoryMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait::async_trait]
impl FriendRepository for FriendRepositoryMemory {
    async fn find_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|f| f.is_pair(user_id_a, user_id_b)).cloned())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|f| f.id == *id).cloned())
    }

    async fn find_friendships(
        &self,
        user_id: &Uuid,
        filter: FriendshipFilter,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|f| filter.matches(f, user_id)).cloned().collect())
    }

    async fn create_friendship(
        &self,
        friendship: &FriendshipEntity,
    ) -> Result<FriendshipEntity, error::SystemError> {
        // check and insert under one write guard, like the unique pair index
        let mut rows = self.rows.write().await;
        if rows.iter().any(|f| f.is_pair(&friendship.sender_id, &friendship.receiver_id)) {
            return Err(error::SystemError::Conflict(None));
        }
        rows.push(friendship.clone());
        Ok(friendship.clone())
    }

    async fn update_status(
        &self,
        id: &Uuid,
        from: FriendshipStatus,
        to: FriendshipStatus,
        updated: DateTime<Utc>,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let mut rows = self.rows.write().await;
        let Some(row) = rows.iter_mut().find(|f| f.id == *id && f.status == from) else {
            return Ok(None);
        };
        row.status = to;
        row.updated = updated;
        Ok(Some(row.clone()))
    }

    async fn delete_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|f| !f.is_pair(user_id_a, user_id_b));
        Ok(rows.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::new_id;

    #[tokio::test]
    async fn rejects_second_row_for_reversed_pair() {
        let repo = FriendRepositoryMemory::new();
        let (a, b) = (new_id(), new_id());

        repo.create_friendship(&FriendshipEntity::new(a, b, FriendshipStatus::Pending, Utc::now()))
            .await
            .unwrap();
        let err = repo
            .create_friendship(&FriendshipEntity::new(b, a, FriendshipStatus::Pending, Utc::now()))
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn update_status_requires_expected_state() {
        let repo = FriendRepositoryMemory::new();
        let (a, b) = (new_id(), new_id());
        let row = repo
            .create_friendship(&FriendshipEntity::new(a, b, FriendshipStatus::Pending, Utc::now()))
            .await
            .unwrap();

        let later = row.created + chrono::Duration::seconds(5);
        let accepted = repo
            .update_status(&row.id, FriendshipStatus::Pending, FriendshipStatus::Accepted, later)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(accepted.status, FriendshipStatus::Accepted);
        assert_eq!(accepted.updated, later);

        let again = repo
            .update_status(&row.id, FriendshipStatus::Pending, FriendshipStatus::Rejected, later)
            .await
            .unwrap();
        assert!(again.is_none());
    }
}
