//! Employee repository.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::base::{insert_row, scoped, update_row};
use super::entities::employee::{self, ActiveModel, Entity as EmployeeEntity};
use super::entities::user;
use super::hydrate::Hydrator;
use crate::domain::{Employee, Entity as _};
use crate::errors::AppResult;
use crate::infra::session::Session;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Employee repository trait for dependency injection.
///
/// Writes persist only the employee row and its foreign keys.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn create(&self, employee: &Employee) -> AppResult<Employee>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Employee>>;

    async fn find_by_person_id(&self, person_id: Uuid) -> AppResult<Option<Employee>>;

    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Employee>>;

    /// Employee whose user account is named `username`
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Employee>>;

    /// Active employees holding the role
    async fn find_by_role_id(&self, role_id: Uuid) -> AppResult<Vec<Employee>>;

    async fn list(&self, include_deleted: bool) -> AppResult<Vec<Employee>>;

    async fn update(&self, employee: &Employee) -> AppResult<Employee>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct EmployeeStore {
    session: Arc<Session>,
}

impl EmployeeStore {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl EmployeeRepository for EmployeeStore {
    async fn create(&self, employee: &Employee) -> AppResult<Employee> {
        let session = self.session.acquire().await;
        insert_row(session.conn()?, ActiveModel::from(employee)).await?;
        session.identities().register(employee);
        Ok(employee.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Employee>> {
        let session = self.session.acquire().await;
        if let Some(hit) = session.identities().resolve(id) {
            return Ok(Some(hit));
        }
        let hydrator = Hydrator::of(&session)?;
        match EmployeeEntity::find_by_id(id).one(session.conn()?).await? {
            Some(model) => Ok(Some(hydrator.employee(model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_person_id(&self, person_id: Uuid) -> AppResult<Option<Employee>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let model = EmployeeEntity::find()
            .filter(employee::Column::PersonId.eq(person_id))
            .one(session.conn()?)
            .await?;
        match model {
            Some(model) => Ok(Some(hydrator.employee(model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Employee>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let model = EmployeeEntity::find()
            .filter(employee::Column::UserId.eq(user_id))
            .one(session.conn()?)
            .await?;
        match model {
            Some(model) => Ok(Some(hydrator.employee(model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Employee>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let model = EmployeeEntity::find()
            .inner_join(user::Entity)
            .filter(user::Column::Name.eq(username))
            .one(session.conn()?)
            .await?;
        match model {
            Some(model) => Ok(Some(hydrator.employee(model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_role_id(&self, role_id: Uuid) -> AppResult<Vec<Employee>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let models = EmployeeEntity::find()
            .filter(employee::Column::RoleId.eq(role_id))
            .filter(employee::Column::InactivatedAt.is_null())
            .order_by_asc(employee::Column::CreatedAt)
            .all(session.conn()?)
            .await?;
        hydrator.employees(models).await
    }

    async fn list(&self, include_deleted: bool) -> AppResult<Vec<Employee>> {
        let session = self.session.acquire().await;
        let hydrator = Hydrator::of(&session)?;
        let models = scoped::<EmployeeEntity>(include_deleted)
            .all(session.conn()?)
            .await?;
        hydrator.employees(models).await
    }

    async fn update(&self, employee: &Employee) -> AppResult<Employee> {
        let session = self.session.acquire().await;
        update_row(session.conn()?, ActiveModel::from(employee), Employee::NAME).await?;
        session.identities().register(employee);
        Ok(employee.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let session = self.session.acquire().await;
        EmployeeEntity::delete_by_id(id).exec(session.conn()?).await?;
        session.identities().evict::<Employee>(id);
        Ok(())
    }
}
