use uuid::Uuid;

use crate::{
    api::error,
    modules::user::{
        model::{InsertUser, UpdateUser},
        schema::UserEntity,
    },
};

#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError>;

    /// Live accounts among `ids`, in no particular order.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserEntity>, error::SystemError>;

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, error::SystemError>;

    async fn create(&self, user: &InsertUser) -> Result<Uuid, error::SystemError>;

    async fn update(&self, id: &Uuid, user: &UpdateUser) -> Result<UserEntity, error::SystemError>;

    /// Marks a live account deleted. False if there was none.
    async fn soft_delete(&self, id: &Uuid) -> Result<bool, error::SystemError>;

    /// Case-insensitive partial match on username, email, first and last
    /// name. Accounts in `exclude` are left out.
    async fn search_users(
        &self,
        query: &str,
        exclude: &[Uuid],
        limit: i64,
    ) -> Result<Vec<UserEntity>, error::SystemError>;
}
