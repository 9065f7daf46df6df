//! Customer database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{Customer, Entity as _};
use crate::infra::repositories::base::LifecycleEntity;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub person_id: Uuid,
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
}

impl Related<super::person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Person.def()
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

impl From<&Customer> for ActiveModel {
    fn from(customer: &Customer) -> Self {
        let lifecycle = customer.lifecycle();
        ActiveModel {
            id: Set(lifecycle.id()),
            person_id: Set(customer.person().id()),
            created_at: Set(lifecycle.created_at()),
            updated_at: Set(lifecycle.updated_at()),
            inactivated_at: Set(lifecycle.inactivated_at()),
        }
    }
}
