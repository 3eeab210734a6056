use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::configs::Cache;
use crate::constants::USER_CACHE_TTL;
use crate::modules::user::model::{
    InsertUser, SignInModel, SignUpModel, UpdateProfileModel, UpdateUser, UserResponse,
};
use crate::modules::user::repository::UserRepository;
use crate::utils::{Claims, TokenSettings, TypeClaims, hash_password, verify_password};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    cache: Arc<dyn Cache>,
    tokens: TokenSettings,
}

fn user_key(id: &Uuid) -> String {
    format!("user:{id}")
}

fn refresh_key(jti: &Uuid) -> String {
    format!("refresh_token:{jti}")
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository>,
        cache: Arc<dyn Cache>,
        tokens: TokenSettings,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, cache, tokens }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<UserResponse, error::SystemError> {
        let key = user_key(&id);
        if let Some(cached_user) = self.cache.get::<UserResponse>(&key).await? {
            info!("User {} found in cache", id);
            return Ok(cached_user);
        }

        let entity = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        let user = UserResponse::from(entity);
        self.cache.set(&key, &user, USER_CACHE_TTL).await?;
        info!("User {} cached", id);
        Ok(user)
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        profile: UpdateProfileModel,
    ) -> Result<UserResponse, error::SystemError> {
        if profile.is_empty() {
            return Err(error::SystemError::bad_request("No fields to update"));
        }

        let entity = self.repo.update(&id, &UpdateUser::from(profile)).await?;
        self.cache.delete(&user_key(&id)).await?;
        Ok(UserResponse::from(entity))
    }

    pub async fn sign_up(&self, user: SignUpModel) -> Result<Uuid, error::SystemError> {
        let hash_password = hash_password(&user.password)?;

        let new_user = InsertUser {
            username: user.username,
            email: user.email,
            hash_password,
            first_name: user.first_name,
            last_name: user.last_name,
        };

        let user_id = self.repo.create(&new_user).await?;
        info!("User {} signed up", user_id);
        Ok(user_id)
    }

    /// Returns `(access_token, refresh_token)`.
    pub async fn sign_in(&self, user: SignInModel) -> Result<(String, String), error::SystemError> {
        let user_entity = self
            .repo
            .find_by_username(&user.username)
            .await?
            .ok_or_else(|| error::SystemError::unauthorized("Invalid username or password"))?;

        if !verify_password(&user_entity.hash_password, &user.password)? {
            return Err(error::SystemError::unauthorized("Invalid username or password"));
        }

        self.issue_tokens(&user_entity.id).await
    }

    /// Trades a refresh token for a new pair. Each refresh token works once.
    pub async fn refresh(
        &self,
        refresh_token: Option<String>,
    ) -> Result<(String, String), error::SystemError> {
        let token =
            refresh_token.ok_or_else(|| error::SystemError::unauthorized("Missing refresh token"))?;

        let claims = Claims::decode(&token, self.tokens.secret.as_ref())
            .ok()
            .filter(|c| c.is(TypeClaims::RefreshToken))
            .ok_or_else(|| error::SystemError::unauthorized("Invalid refresh token"))?;
        let jti = claims.jti.ok_or_else(|| error::SystemError::unauthorized("Invalid refresh token"))?;

        if !self.cache.take(&refresh_key(&jti)).await? {
            return Err(error::SystemError::unauthorized("Refresh token revoked"));
        }
        if self.repo.find_by_id(&claims.sub).await?.is_none() {
            return Err(error::SystemError::unauthorized("Account no longer exists"));
        }

        self.issue_tokens(&claims.sub).await
    }

    pub async fn sign_out(&self, refresh_token: Option<String>) -> Result<(), error::SystemError> {
        let Some(token) = refresh_token else {
            return Ok(());
        };

        // an expired or forged token has nothing to revoke
        if let Ok(Claims { jti: Some(jti), .. }) = Claims::decode(&token, self.tokens.secret.as_ref())
        {
            self.cache.delete(&refresh_key(&jti)).await?;
        }
        Ok(())
    }

    /// Soft-deletes the account and revokes the given refresh token. Its
    /// friendships stay in the store but drop out of feeds and lists.
    pub async fn delete_account(
        &self,
        id: Uuid,
        refresh_token: Option<String>,
    ) -> Result<(), error::SystemError> {
        if !self.repo.soft_delete(&id).await? {
            return Err(error::SystemError::not_found("User not found"));
        }

        self.cache.delete(&user_key(&id)).await?;
        self.sign_out(refresh_token).await?;
        info!("User {} deleted", id);
        Ok(())
    }

    async fn issue_tokens(&self, user_id: &Uuid) -> Result<(String, String), error::SystemError> {
        let access_token = Claims::new(user_id, self.tokens.access_ttl)
            .with_type(TypeClaims::AccessToken)
            .encode(self.tokens.secret.as_ref())?;

        let jti = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let refresh_token = Claims::new(user_id, self.tokens.refresh_ttl)
            .with_jti(jti)
            .with_type(TypeClaims::RefreshToken)
            .encode(self.tokens.secret.as_ref())?;

        self.cache.set(&refresh_key(&jti), user_id, self.tokens.refresh_ttl as usize).await?;

        Ok((access_token, refresh_token))
    }
}
