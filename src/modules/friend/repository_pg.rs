use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    api::error,
    modules::friend::{
        repository::FriendRepository,
        schema::{FriendshipEntity, FriendshipFilter, FriendshipStatus},
    },
};

#[derive(Clone)]
pub struct FriendRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

fn filter_query(filter: FriendshipFilter) -> &'static str {
    match filter {
        FriendshipFilter::All => {
            r#"
            SELECT * FROM friendships
            WHERE sender_id = $1 OR receiver_id = $1
            ORDER BY created, id
            "#
        }
        FriendshipFilter::Pending => {
            r#"
            SELECT * FROM friendships
            WHERE (sender_id = $1 OR receiver_id = $1)
              AND status = 'PENDING'
            ORDER BY created, id
            "#
        }
        FriendshipFilter::PendingSent => {
            r#"
            SELECT * FROM friendships
            WHERE sender_id = $1 AND status = 'PENDING'
            ORDER BY created, id
            "#
        }
        FriendshipFilter::PendingReceived => {
            r#"
            SELECT * FROM friendships
            WHERE receiver_id = $1 AND status = 'PENDING'
            ORDER BY created, id
            "#
        }
        FriendshipFilter::Current => {
            r#"
            SELECT * FROM friendships
            WHERE (sender_id = $1 OR receiver_id = $1)
              AND status = 'ACCEPTED'
            ORDER BY created, id
            "#
        }
    }
}

#[async_trait::async_trait]
impl FriendRepository for FriendRepositoryPg {
    async fn find_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT *
            FROM friendships
            WHERE
                (sender_id = $1 AND receiver_id = $2)
            OR (sender_id = $2 AND receiver_id = $1)
            "#,
        )
        .bind(user_id_a)
        .bind(user_id_b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let friendship =
            sqlx::query_as::<_, FriendshipEntity>("SELECT * FROM friendships WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(friendship)
    }

    async fn find_friendships(
        &self,
        user_id: &Uuid,
        filter: FriendshipFilter,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let friendships = sqlx::query_as::<_, FriendshipEntity>(filter_query(filter))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(friendships)
    }

    async fn create_friendship(
        &self,
        friendship: &FriendshipEntity,
    ) -> Result<FriendshipEntity, error::SystemError> {
        // friendships_pair is a unique index over the unordered pair, so a
        // concurrent insert for the same pair surfaces here as a 23505 conflict.
        let created = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            INSERT INTO friendships (id, sender_id, receiver_id, status, created, updated)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(friendship.id)
        .bind(friendship.sender_id)
        .bind(friendship.receiver_id)
        .bind(friendship.status)
        .bind(friendship.created)
        .bind(friendship.updated)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update_status(
        &self,
        id: &Uuid,
        from: FriendshipStatus,
        to: FriendshipStatus,
        updated: DateTime<Utc>,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            UPDATE friendships
            SET status = $3, updated = $4
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(updated)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    async fn delete_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let rows = sqlx::query(
            r#"
            DELETE FROM friendships
            WHERE
                (sender_id = $1 AND receiver_id = $2)
            OR (sender_id = $2 AND receiver_id = $1)
            "#,
        )
        .bind(user_id_a)
        .bind(user_id_b)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }
}
