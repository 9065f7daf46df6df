//! Row to domain conversion.
//!
//! Every conversion goes through the session's identity map: a row whose
//! entity was already rehydrated in this session yields the cached copy.
//! Referenced entities (a customer's person, an employee's role) are loaded
//! through the same path.

use sea_orm::{ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, SelectTwo};
use uuid::Uuid;

use super::entities::{
    customer, employee, permission, person, profile, profile_permission, role, user, user_profile,
};
use crate::domain::{
    Customer, Employee, EmploymentDates, Entity, Lifecycle, Permission, Person, Profile,
    ProfilePermission, Role, User, UserProfile,
};
use crate::errors::{AppResult, OptionExt};
use crate::infra::identity_map::IdentityMap;
use crate::infra::session::SessionGuard;

/// Live permission links of a profile joined to their permissions, oldest
/// link first.
fn active_permission_links(
    profile_id: Uuid,
) -> SelectTwo<profile_permission::Entity, permission::Entity> {
    profile_permission::Entity::find()
        .filter(profile_permission::Column::ProfileId.eq(profile_id))
        .filter(profile_permission::Column::InactivatedAt.is_null())
        .order_by_asc(profile_permission::Column::CreatedAt)
        .find_also_related(permission::Entity)
}

fn active_user_links(profile_id: Uuid) -> SelectTwo<user_profile::Entity, user::Entity> {
    user_profile::Entity::find()
        .filter(user_profile::Column::ProfileId.eq(profile_id))
        .filter(user_profile::Column::InactivatedAt.is_null())
        .order_by_asc(user_profile::Column::CreatedAt)
        .find_also_related(user::Entity)
}

/// Builds domain entities from rows read inside one session.
pub(crate) struct Hydrator<'a> {
    conn: &'a DatabaseTransaction,
    identities: &'a IdentityMap,
}

macro_rules! lifecycle {
    ($model:expr) => {
        Lifecycle::restore(
            $model.id,
            $model.created_at,
            $model.updated_at,
            $model.inactivated_at,
        )
    };
}

impl<'a> Hydrator<'a> {
    pub(crate) fn new(conn: &'a DatabaseTransaction, identities: &'a IdentityMap) -> Self {
        Self { conn, identities }
    }

    /// Hydrator bound to the transaction held by `session`.
    pub(crate) fn of(session: &'a SessionGuard<'_>) -> AppResult<Self> {
        Ok(Self::new(session.conn()?, session.identities()))
    }

    fn cached<T: Entity>(&self, id: Uuid) -> Option<T> {
        self.identities.resolve(id)
    }

    pub(crate) fn person(&self, model: person::Model) -> Person {
        if let Some(hit) = self.cached(model.id) {
            return hit;
        }
        let lifecycle = lifecycle!(model);
        self.identities.resolve_or_register(Person::restore(
            lifecycle,
            model.name,
            model.cpf,
            model.email,
            model.birth_date,
        ))
    }

    pub(crate) fn user(&self, model: user::Model) -> User {
        if let Some(hit) = self.cached(model.id) {
            return hit;
        }
        let lifecycle = lifecycle!(model);
        self.identities
            .resolve_or_register(User::restore(lifecycle, model.name, model.password_hash))
    }

    pub(crate) fn role(&self, model: role::Model) -> Role {
        if let Some(hit) = self.cached(model.id) {
            return hit;
        }
        let lifecycle = lifecycle!(model);
        self.identities
            .resolve_or_register(Role::restore(lifecycle, model.name, model.description))
    }

    pub(crate) fn permission(&self, model: permission::Model) -> Permission {
        if let Some(hit) = self.cached(model.id) {
            return hit;
        }
        let lifecycle = lifecycle!(model);
        self.identities.resolve_or_register(Permission::restore(
            lifecycle,
            model.name,
            model.description,
        ))
    }

    /// Profile with its permissions and users, taken from active links in
    /// link creation order.
    pub(crate) async fn profile(&self, model: profile::Model) -> AppResult<Profile> {
        if let Some(hit) = self.cached(model.id) {
            return Ok(hit);
        }

        let permissions = active_permission_links(model.id)
            .all(self.conn)
            .await?
            .into_iter()
            .filter_map(|(_, permission)| permission)
            .map(|permission| self.permission(permission))
            .collect();

        let users = active_user_links(model.id)
            .all(self.conn)
            .await?
            .into_iter()
            .filter_map(|(_, user)| user)
            .map(|user| self.user(user))
            .collect();

        let lifecycle = lifecycle!(model);
        Ok(self.identities.resolve_or_register(Profile::restore(
            lifecycle,
            model.name,
            model.description,
            permissions,
            users,
        )))
    }

    pub(crate) async fn profile_permission(
        &self,
        model: profile_permission::Model,
    ) -> AppResult<ProfilePermission> {
        if let Some(hit) = self.cached(model.id) {
            return Ok(hit);
        }
        let profile = self.profile_by_id(model.profile_id).await?;
        let permission = self.permission_by_id(model.permission_id).await?;
        let lifecycle = lifecycle!(model);
        Ok(self
            .identities
            .resolve_or_register(ProfilePermission::restore(lifecycle, profile, permission)))
    }

    pub(crate) async fn user_profile(&self, model: user_profile::Model) -> AppResult<UserProfile> {
        if let Some(hit) = self.cached(model.id) {
            return Ok(hit);
        }
        let user = self.user_by_id(model.user_id).await?;
        let profile = self.profile_by_id(model.profile_id).await?;
        let lifecycle = lifecycle!(model);
        Ok(self
            .identities
            .resolve_or_register(UserProfile::restore(lifecycle, user, profile)))
    }

    pub(crate) async fn customer(&self, model: customer::Model) -> AppResult<Customer> {
        if let Some(hit) = self.cached(model.id) {
            return Ok(hit);
        }
        let person = self.person_by_id(model.person_id).await?;
        let lifecycle = lifecycle!(model);
        Ok(self
            .identities
            .resolve_or_register(Customer::restore(lifecycle, person)))
    }

    pub(crate) async fn employee(&self, model: employee::Model) -> AppResult<Employee> {
        if let Some(hit) = self.cached(model.id) {
            return Ok(hit);
        }
        let person = self.person_by_id(model.person_id).await?;
        let role = self.role_by_id(model.role_id).await?;
        let user = self.user_by_id(model.user_id).await?;
        let dates = EmploymentDates {
            admission_date: model.admission_date,
            termination_date: model.termination_date,
        };
        let lifecycle = lifecycle!(model);
        Ok(self
            .identities
            .resolve_or_register(Employee::restore(lifecycle, person, role, user, dates)))
    }

    pub(crate) async fn profiles(&self, models: Vec<profile::Model>) -> AppResult<Vec<Profile>> {
        let mut profiles = Vec::with_capacity(models.len());
        for model in models {
            profiles.push(self.profile(model).await?);
        }
        Ok(profiles)
    }

    pub(crate) async fn profile_permissions(
        &self,
        models: Vec<profile_permission::Model>,
    ) -> AppResult<Vec<ProfilePermission>> {
        let mut links = Vec::with_capacity(models.len());
        for model in models {
            links.push(self.profile_permission(model).await?);
        }
        Ok(links)
    }

    pub(crate) async fn user_profiles(
        &self,
        models: Vec<user_profile::Model>,
    ) -> AppResult<Vec<UserProfile>> {
        let mut links = Vec::with_capacity(models.len());
        for model in models {
            links.push(self.user_profile(model).await?);
        }
        Ok(links)
    }

    pub(crate) async fn customers(&self, models: Vec<customer::Model>) -> AppResult<Vec<Customer>> {
        let mut customers = Vec::with_capacity(models.len());
        for model in models {
            customers.push(self.customer(model).await?);
        }
        Ok(customers)
    }

    pub(crate) async fn employees(&self, models: Vec<employee::Model>) -> AppResult<Vec<Employee>> {
        let mut employees = Vec::with_capacity(models.len());
        for model in models {
            employees.push(self.employee(model).await?);
        }
        Ok(employees)
    }

    // Referenced rows are required by foreign keys; a miss means the row
    // vanished underneath this session.

    async fn person_by_id(&self, id: Uuid) -> AppResult<Person> {
        if let Some(hit) = self.cached(id) {
            return Ok(hit);
        }
        let model = person::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_not_found(Person::NAME)?;
        Ok(self.person(model))
    }

    async fn user_by_id(&self, id: Uuid) -> AppResult<User> {
        if let Some(hit) = self.cached(id) {
            return Ok(hit);
        }
        let model = user::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_not_found(User::NAME)?;
        Ok(self.user(model))
    }

    async fn role_by_id(&self, id: Uuid) -> AppResult<Role> {
        if let Some(hit) = self.cached(id) {
            return Ok(hit);
        }
        let model = role::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_not_found(Role::NAME)?;
        Ok(self.role(model))
    }

    async fn permission_by_id(&self, id: Uuid) -> AppResult<Permission> {
        if let Some(hit) = self.cached(id) {
            return Ok(hit);
        }
        let model = permission::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_not_found(Permission::NAME)?;
        Ok(self.permission(model))
    }

    async fn profile_by_id(&self, id: Uuid) -> AppResult<Profile> {
        if let Some(hit) = self.cached(id) {
            return Ok(hit);
        }
        let model = profile::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_not_found(Profile::NAME)?;
        self.profile(model).await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, QueryTrait};

    use super::*;

    #[test]
    fn test_permission_links_skip_revoked_grants_in_grant_order() {
        let sql = active_permission_links(Uuid::new_v4())
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"LEFT JOIN "permissions""#));
        assert!(sql.contains(r#""profile_permissions"."profile_id" = "#));
        assert!(sql.contains(r#""profile_permissions"."inactivated_at" IS NULL"#));
        assert!(sql.contains(r#"ORDER BY "profile_permissions"."created_at" ASC"#));
    }

    #[test]
    fn test_user_links_skip_revoked_assignments() {
        let sql = active_user_links(Uuid::new_v4())
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"LEFT JOIN "users""#));
        assert!(sql.contains(r#""user_profiles"."inactivated_at" IS NULL"#));
        assert!(sql.contains(r#"ORDER BY "user_profiles"."created_at" ASC"#));
    }
}
