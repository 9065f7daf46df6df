//! Employee database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{Employee, Entity as _};
use crate::infra::repositories::base::LifecycleEntity;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub person_id: Uuid,
    pub role_id: Uuid,
    pub user_id: Uuid,
    pub admission_date: Option<Date>,
    pub termination_date: Option<Date>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub inactivated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::person::Entity",
        from = "Column::PersonId",
        to = "super::person::Column::Id"
    )]
    Person,
    #[sea_orm(
        belongs_to = "super::role::Entity",
        from = "Column::RoleId",
        to = "super::role::Column::Id"
    )]
    Role,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl LifecycleEntity for Entity {
    fn created_at() -> Column {
        Column::CreatedAt
    }

    fn inactivated_at() -> Column {
        Column::InactivatedAt
    }
}

impl From<&Employee> for ActiveModel {
    fn from(employee: &Employee) -> Self {
        let lifecycle = employee.lifecycle();
        let dates = employee.dates();
        ActiveModel {
            id: Set(lifecycle.id()),
            person_id: Set(employee.person().id()),
            role_id: Set(employee.role().id()),
            user_id: Set(employee.user().id()),
            admission_date: Set(dates.admission_date),
            termination_date: Set(dates.termination_date),
            created_at: Set(lifecycle.created_at()),
            updated_at: Set(lifecycle.updated_at()),
            inactivated_at: Set(lifecycle.inactivated_at()),
        }
    }
}
