use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    constants::USER_SEARCH_LIMIT,
    modules::{
        feed::{model::FeedEvent, projector::build_feed},
        friend::{
            error::FriendshipError,
            model::{FriendRequestsResponse, FriendshipResponse},
            repository::FriendRepository,
            schema::{FriendshipEntity, FriendshipFilter, FriendshipStatus},
        },
        user::{repository::UserRepository, schema::AccountSummary},
    },
};

pub type FriendResult<T> = Result<T, FriendshipError>;

/// Friendship commands and queries. Every operation names the accounts it
/// acts for; nothing is read from the request.
#[derive(Clone)]
pub struct FriendService<R, U>
where
    R: FriendRepository,
    U: UserRepository,
{
    friend_repo: Arc<R>,
    user_repo: Arc<U>,
}

impl<R, U> FriendService<R, U>
where
    R: FriendRepository,
    U: UserRepository,
{
    pub fn with_dependencies(friend_repo: Arc<R>, user_repo: Arc<U>) -> Self {
        log::info!("FriendService initialized with dependencies");
        FriendService { friend_repo, user_repo }
    }

    /// True only for an accepted friendship, whichever side sent it.
    pub async fn has_friend(&self, user_id: Uuid, other_id: Uuid) -> FriendResult<bool> {
        let friendship = self.friend_repo.find_friendship(&user_id, &other_id).await?;
        Ok(friendship.is_some_and(|f| f.status == FriendshipStatus::Accepted))
    }

    pub async fn get_friendship(
        &self,
        user_id: Uuid,
        other_id: Uuid,
    ) -> FriendResult<FriendshipEntity> {
        self.friend_repo
            .find_friendship(&user_id, &other_id)
            .await?
            .ok_or(FriendshipError::NotFound)
    }

    /// Sends a friend request from `user_id` to `friend_id`.
    pub async fn add_friend(&self, user_id: Uuid, friend_id: Uuid) -> FriendResult<FriendshipEntity> {
        self.create_friendship(user_id, friend_id, FriendshipStatus::Pending).await
    }

    /// Creates the pair's row in a given status. `add_friend` is the pending
    /// case; other statuses are for seeding and administration.
    pub async fn create_friendship(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        status: FriendshipStatus,
    ) -> FriendResult<FriendshipEntity> {
        if sender_id == receiver_id {
            return Err(FriendshipError::SelfRelationship);
        }

        let (receiver, existing) = tokio::try_join!(
            self.user_repo.find_by_id(&receiver_id),
            self.friend_repo.find_friendship(&sender_id, &receiver_id),
        )?;

        if receiver.is_none() {
            return Err(FriendshipError::AccountNotFound);
        }
        if existing.is_some() {
            return Err(FriendshipError::DuplicateRelationship);
        }

        let friendship = FriendshipEntity::new(sender_id, receiver_id, status, Utc::now());
        match self.friend_repo.create_friendship(&friendship).await {
            Ok(created) => Ok(created),
            // lost a race with the other side's request
            Err(err) if err.is_conflict() => Err(FriendshipError::DuplicateRelationship),
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes the pair's row in any status. Removing nothing is fine.
    pub async fn remove_friend(&self, user_id: Uuid, friend_id: Uuid) -> FriendResult<()> {
        let removed = self.friend_repo.delete_friendship(&user_id, &friend_id).await?;
        if removed {
            log::info!("Friendship between {} and {} removed", user_id, friend_id);
        }
        Ok(())
    }

    pub async fn accept(&self, friendship: &FriendshipEntity) -> FriendResult<FriendshipEntity> {
        self.transition(friendship, FriendshipStatus::Accepted).await
    }

    pub async fn reject(&self, friendship: &FriendshipEntity) -> FriendResult<FriendshipEntity> {
        self.transition(friendship, FriendshipStatus::Rejected).await
    }

    /// Answers the request `other_id` sent to `user_id`.
    pub async fn respond(
        &self,
        user_id: Uuid,
        other_id: Uuid,
        to: FriendshipStatus,
    ) -> FriendResult<FriendshipEntity> {
        let friendship = self.get_friendship(user_id, other_id).await?;
        if friendship.receiver_id != user_id {
            return Err(FriendshipError::NotReceiver);
        }
        self.transition(&friendship, to).await
    }

    async fn transition(
        &self,
        friendship: &FriendshipEntity,
        to: FriendshipStatus,
    ) -> FriendResult<FriendshipEntity> {
        let from = FriendshipStatus::Pending;
        friendship.status.transition(to)?;

        // the row may have moved since the caller read it; the store only
        // applies the change if it is still pending
        if let Some(updated) =
            self.friend_repo.update_status(&friendship.id, from, to, Utc::now()).await?
        {
            return Ok(updated);
        }

        match self.friend_repo.find_by_id(&friendship.id).await? {
            Some(current) => Err(FriendshipError::InvalidTransition { from: current.status, to }),
            None => Err(FriendshipError::NotFound),
        }
    }

    /// The other party of every accepted friendship, in creation order.
    pub async fn list_friends(&self, user_id: Uuid) -> FriendResult<Vec<AccountSummary>> {
        let current = self.current(user_id).await?;
        let ids: Vec<Uuid> = current.iter().map(|f| f.other_party(&user_id)).collect();
        let mut accounts = self.resolve_accounts(&ids).await?;

        Ok(ids.iter().filter_map(|id| accounts.remove(id)).collect())
    }

    pub async fn pending(&self, user_id: Uuid) -> FriendResult<Vec<FriendshipEntity>> {
        self.find(user_id, FriendshipFilter::Pending).await
    }

    pub async fn pending_sent(&self, user_id: Uuid) -> FriendResult<Vec<FriendshipEntity>> {
        self.find(user_id, FriendshipFilter::PendingSent).await
    }

    pub async fn pending_received(&self, user_id: Uuid) -> FriendResult<Vec<FriendshipEntity>> {
        self.find(user_id, FriendshipFilter::PendingReceived).await
    }

    pub async fn current(&self, user_id: Uuid) -> FriendResult<Vec<FriendshipEntity>> {
        self.find(user_id, FriendshipFilter::Current).await
    }

    pub async fn all_friendships(&self, user_id: Uuid) -> FriendResult<Vec<FriendshipEntity>> {
        self.find(user_id, FriendshipFilter::All).await
    }

    async fn find(
        &self,
        user_id: Uuid,
        filter: FriendshipFilter,
    ) -> FriendResult<Vec<FriendshipEntity>> {
        Ok(self.friend_repo.find_friendships(&user_id, filter).await?)
    }

    /// Pending requests on both sides, with the counterpart's account.
    pub async fn friend_requests(&self, user_id: Uuid) -> FriendResult<FriendRequestsResponse> {
        let (received, sent) =
            tokio::try_join!(self.pending_received(user_id), self.pending_sent(user_id))?;

        let ids: Vec<Uuid> =
            received.iter().chain(sent.iter()).map(|f| f.other_party(&user_id)).collect();
        let accounts = self.resolve_accounts(&ids).await?;

        let view = |friendships: Vec<FriendshipEntity>| -> Vec<FriendshipResponse> {
            friendships
                .iter()
                .filter_map(|f| {
                    let other = accounts.get(&f.other_party(&user_id))?.clone();
                    Some(FriendshipResponse::new(f, &user_id, other))
                })
                .collect()
        };

        Ok(FriendRequestsResponse { received: view(received), sent: view(sent) })
    }

    /// The pair's friendship as seen by `user_id`.
    pub async fn friendship_view(
        &self,
        user_id: Uuid,
        other_id: Uuid,
    ) -> FriendResult<FriendshipResponse> {
        let friendship = self.get_friendship(user_id, other_id).await?;
        let other = self
            .user_repo
            .find_by_id(&other_id)
            .await?
            .ok_or(FriendshipError::AccountNotFound)?;

        Ok(FriendshipResponse::new(&friendship, &user_id, other.into()))
    }

    /// Activity feed for `user_id`, oldest event first.
    pub async fn feed(&self, user_id: Uuid) -> FriendResult<Vec<FeedEvent>> {
        let friendships = self.all_friendships(user_id).await?;

        let mut ids: Vec<Uuid> =
            friendships.iter().flat_map(|f| [f.sender_id, f.receiver_id]).collect();
        ids.sort_unstable();
        ids.dedup();
        let accounts = self.resolve_accounts(&ids).await?;

        Ok(build_feed(&friendships, &accounts))
    }

    /// Accounts `user_id` could still send a request to: matching `search`,
    /// not `user_id`, and sharing no friendship row with it.
    pub async fn find_candidates(
        &self,
        user_id: Uuid,
        search: &str,
    ) -> FriendResult<Vec<AccountSummary>> {
        let mut exclude: Vec<Uuid> = self
            .all_friendships(user_id)
            .await?
            .iter()
            .map(|f| f.other_party(&user_id))
            .collect();
        exclude.push(user_id);

        let users = self.user_repo.search_users(search.trim(), &exclude, USER_SEARCH_LIMIT).await?;
        Ok(users.into_iter().map(AccountSummary::from).collect())
    }

    async fn resolve_accounts(&self, ids: &[Uuid]) -> FriendResult<HashMap<Uuid, AccountSummary>> {
        let users = self.user_repo.find_by_ids(ids).await?;
        Ok(users.into_iter().map(|u| (u.id, AccountSummary::from(u))).collect())
    }
}
