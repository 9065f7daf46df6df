//! User service - User CRUD use cases.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::removal::{plan_removal, Removal};
use crate::domain::{DeletePolicy, Entity, User, UserData};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user, reactivating a soft-deleted one with the same name
    async fn create_user(&self, data: UserData) -> AppResult<User>;

    /// Get user by id, soft-deleted included
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    async fn get_user_by_name(&self, name: &str) -> AppResult<User>;

    async fn list_users(&self, include_deleted: bool) -> AppResult<Vec<User>>;

    async fn update_user(&self, id: Uuid, data: UserData) -> AppResult<User>;

    async fn delete_user(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    policy: DeletePolicy,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>, policy: DeletePolicy) -> Self {
        Self { uow, policy }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn create_user(&self, data: UserData) -> AppResult<User> {
        let users = self.uow.users();
        match users.find_by_name(data.name.trim()).await? {
            Some(existing) if !existing.is_deleted() => Err(AppError::conflict(User::NAME)),
            Some(existing) => {
                let mut user = existing.revise(data)?;
                user.reactivate();
                let user = users.update(&user).await?;
                tracing::info!(id = %user.id(), name = %user.name(), "User reactivated");
                Ok(user)
            }
            None => {
                let user = users.create(&User::new(data)?).await?;
                tracing::info!(id = %user.id(), name = %user.name(), "User created");
                Ok(user)
            }
        }
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found(User::NAME)
    }

    async fn get_user_by_name(&self, name: &str) -> AppResult<User> {
        self.uow
            .users()
            .find_by_name(name)
            .await?
            .ok_or_not_found(User::NAME)
    }

    async fn list_users(&self, include_deleted: bool) -> AppResult<Vec<User>> {
        self.uow.users().list(include_deleted).await
    }

    async fn update_user(&self, id: Uuid, data: UserData) -> AppResult<User> {
        let users = self.uow.users();
        let current = users.find_by_id(id).await?.ok_or_not_found(User::NAME)?;

        // Renaming onto another user's name
        if let Some(other) = users.find_by_name(data.name.trim()).await? {
            if other.id() != id {
                return Err(AppError::conflict(User::NAME));
            }
        }

        users.update(&current.revise(data)?).await
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        let users = self.uow.users();
        match plan_removal(self.policy, users.find_by_id(id).await?)? {
            Removal::Soft(user) => {
                users.update(&user).await?;
            }
            Removal::Hard(id) => users.delete(id).await?,
        }
        tracing::info!(id = %id, policy = %self.policy, "User deleted");
        Ok(())
    }
}
