//! Role service - Role CRUD use cases.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::removal::{plan_removal, Removal};
use crate::domain::{DeletePolicy, Entity, Role, RoleData};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Role service trait for dependency injection.
#[async_trait]
pub trait RoleService: Send + Sync {
    /// Create a role, reactivating a soft-deleted one with the same name
    async fn create_role(&self, data: RoleData) -> AppResult<Role>;

    /// Get role by id, soft-deleted included
    async fn get_role(&self, id: Uuid) -> AppResult<Role>;

    async fn get_role_by_name(&self, name: &str) -> AppResult<Role>;

    async fn list_roles(&self, include_deleted: bool) -> AppResult<Vec<Role>>;

    async fn update_role(&self, id: Uuid, data: RoleData) -> AppResult<Role>;

    async fn delete_role(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of RoleService using Unit of Work.
pub struct RoleManager<U: UnitOfWork> {
    uow: Arc<U>,
    policy: DeletePolicy,
}

impl<U: UnitOfWork> RoleManager<U> {
    pub fn new(uow: Arc<U>, policy: DeletePolicy) -> Self {
        Self { uow, policy }
    }
}

#[async_trait]
impl<U: UnitOfWork> RoleService for RoleManager<U> {
    async fn create_role(&self, data: RoleData) -> AppResult<Role> {
        let roles = self.uow.roles();
        match roles.find_by_name(data.name.trim()).await? {
            Some(existing) if !existing.is_deleted() => Err(AppError::conflict(Role::NAME)),
            Some(existing) => {
                let mut role = existing.revise(data)?;
                role.reactivate();
                let role = roles.update(&role).await?;
                tracing::info!(id = %role.id(), name = %role.name(), "Role reactivated");
                Ok(role)
            }
            None => {
                let role = roles.create(&Role::new(data)?).await?;
                tracing::info!(id = %role.id(), name = %role.name(), "Role created");
                Ok(role)
            }
        }
    }

    async fn get_role(&self, id: Uuid) -> AppResult<Role> {
        self.uow
            .roles()
            .find_by_id(id)
            .await?
            .ok_or_not_found(Role::NAME)
    }

    async fn get_role_by_name(&self, name: &str) -> AppResult<Role> {
        self.uow
            .roles()
            .find_by_name(name)
            .await?
            .ok_or_not_found(Role::NAME)
    }

    async fn list_roles(&self, include_deleted: bool) -> AppResult<Vec<Role>> {
        self.uow.roles().list(include_deleted).await
    }

    async fn update_role(&self, id: Uuid, data: RoleData) -> AppResult<Role> {
        let roles = self.uow.roles();
        let current = roles.find_by_id(id).await?.ok_or_not_found(Role::NAME)?;

        // Renaming onto another role's name
        if let Some(other) = roles.find_by_name(data.name.trim()).await? {
            if other.id() != id {
                return Err(AppError::conflict(Role::NAME));
            }
        }

        roles.update(&current.revise(data)?).await
    }

    async fn delete_role(&self, id: Uuid) -> AppResult<()> {
        let roles = self.uow.roles();
        match plan_removal(self.policy, roles.find_by_id(id).await?)? {
            Removal::Soft(role) => {
                roles.update(&role).await?;
            }
            Removal::Hard(id) => roles.delete(id).await?,
        }
        tracing::info!(id = %id, policy = %self.policy, "Role deleted");
        Ok(())
    }
}
