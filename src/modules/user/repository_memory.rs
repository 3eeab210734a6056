//! In-memory account store for tests.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    api::error,
    modules::user::{
        model::{InsertUser, UpdateUser},
        repository::UserRepository,
        schema::UserEntity,
    },
};

#[derive(Clone, Default)]
pub struct UserRepositoryMemory {
    users: Arc<RwLock<Vec<UserEntity>>>,
}

impl UserRepositoryMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

fn live(user: &UserEntity) -> bool {
    user.deleted_at.is_none()
}

#[async_trait::async_trait]
impl UserRepository for UserRepositoryMemory {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == *id && live(u)).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserEntity>, error::SystemError> {
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| live(u) && ids.contains(&u.id)).cloned().collect())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, error::SystemError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| live(u) && u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn create(&self, user: &InsertUser) -> Result<Uuid, error::SystemError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| {
            u.username.eq_ignore_ascii_case(&user.username) || u.email.eq_ignore_ascii_case(&user.email)
        }) {
            return Err(error::SystemError::Conflict(None));
        }

        let now = Utc::now();
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        users.push(UserEntity {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            hash_password: user.hash_password.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            photo_url: None,
            date_of_birth: None,
            address: String::new(),
            phone_number: String::new(),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn update(&self, id: &Uuid, user: &UpdateUser) -> Result<UserEntity, error::SystemError> {
        let mut users = self.users.write().await;
        let entity = users
            .iter_mut()
            .find(|u| u.id == *id && live(u))
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        if let Some(email) = &user.email {
            entity.email = email.clone();
        }
        if let Some(first_name) = &user.first_name {
            entity.first_name = first_name.clone();
        }
        if let Some(last_name) = &user.last_name {
            entity.last_name = last_name.clone();
        }
        if let Some(photo_url) = &user.photo_url {
            entity.photo_url = photo_url.clone();
        }
        if let Some(date_of_birth) = user.date_of_birth {
            entity.date_of_birth = date_of_birth;
        }
        if let Some(address) = &user.address {
            entity.address = address.clone();
        }
        if let Some(phone_number) = &user.phone_number {
            entity.phone_number = phone_number.clone();
        }
        entity.updated_at = Utc::now();

        Ok(entity.clone())
    }

    async fn soft_delete(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id == *id && live(u)) {
            Some(user) => {
                let now = Utc::now();
                user.deleted_at = Some(now);
                user.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn search_users(
        &self,
        query: &str,
        exclude: &[Uuid],
        limit: i64,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        let needle = query.to_lowercase();
        let users = self.users.read().await;
        let mut found: Vec<UserEntity> = users
            .iter()
            .filter(|u| live(u) && !exclude.contains(&u.id))
            .filter(|u| {
                [&u.username, &u.email, &u.first_name, &u.last_name]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            (&a.last_name, &a.first_name, &a.username).cmp(&(&b.last_name, &b.first_name, &b.username))
        });
        found.truncate(limit.max(0) as usize);
        Ok(found)
    }
}
