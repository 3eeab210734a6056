//! Shared fixtures for service tests, backed by the in-memory repositories.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    api::error,
    configs::Cache,
    modules::{
        friend::{repository_memory::FriendRepositoryMemory, service::FriendService},
        user::{
            model::InsertUser, repository::UserRepository, repository_memory::UserRepositoryMemory,
            service::UserService,
        },
    },
    utils::TokenSettings,
};

pub type MemoryFriendService = FriendService<FriendRepositoryMemory, UserRepositoryMemory>;

pub struct Fixture {
    pub service: MemoryFriendService,
    pub friends: FriendRepositoryMemory,
    pub users: UserRepositoryMemory,
    pub john: Uuid,
    pub regina: Uuid,
    pub brandon: Uuid,
    pub tim: Uuid,
}

async fn create_user(
    users: &UserRepositoryMemory,
    first_name: &str,
    last_name: &str,
    email: &str,
) -> Uuid {
    users
        .create(&InsertUser {
            username: email.to_string(),
            email: email.to_string(),
            hash_password: "not-a-hash".to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        })
        .await
        .unwrap()
}

/// Four accounts and no friendships.
pub async fn fixture() -> Fixture {
    let friends = FriendRepositoryMemory::new();
    let users = UserRepositoryMemory::new();

    let john = create_user(&users, "John", "Carney", "john.carney@carneylabs.com").await;
    let regina = create_user(&users, "Regina", "Mcdonalid", "regina.mcdonalid93@example.com").await;
    let brandon = create_user(&users, "Brandon", "Jacobs", "brandon.jacobs96@example.com").await;
    let tim = create_user(&users, "Tim", "Johnson", "tim.johnson39@example.com").await;

    let service =
        FriendService::with_dependencies(Arc::new(friends.clone()), Arc::new(users.clone()));

    Fixture { service, friends, users, john, regina, brandon, tim }
}

/// Lets the clock move so consecutive timestamps differ.
pub async fn tick() {
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
}

pub fn new_id() -> Uuid {
    Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext))
}

pub const TEST_SECRET: &str = "test-secret";

/// Cache that never expires entries.
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryCache {
    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }
}

#[async_trait::async_trait]
impl Cache for MemoryCache {
    async fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, error::SystemError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set_raw(
        &self,
        key: &str,
        value: Vec<u8>,
        _expiration: usize,
    ) -> Result<(), error::SystemError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn take(&self, key: &str) -> Result<bool, error::SystemError> {
        Ok(self.entries.write().await.remove(key).is_some())
    }
}

pub struct AccountFixture {
    pub service: UserService,
    pub users: UserRepositoryMemory,
    pub cache: MemoryCache,
}

/// An account service with no accounts.
pub fn account_fixture() -> AccountFixture {
    let users = UserRepositoryMemory::new();
    let cache = MemoryCache::default();
    let tokens =
        TokenSettings { secret: TEST_SECRET.to_string(), access_ttl: 60, refresh_ttl: 120 };

    let service =
        UserService::with_dependencies(Arc::new(users.clone()), Arc::new(cache.clone()), tokens);

    AccountFixture { service, users, cache }
}
