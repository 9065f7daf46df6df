//! Person database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{Entity as _, Person};
use crate::infra::repositories::base::LifecycleEntity;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "persons")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub cpf: Option<String>,
    #[sea_orm(unique)]
    pub email: Option<String>,
    pub birth_date: Option<Date>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    /// NULL = active, set = soft deleted
    pub inactivated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl LifecycleEntity for Entity {
    fn created_at() -> Column {
        Column::CreatedAt
    }

    fn inactivated_at() -> Column {
        Column::InactivatedAt
    }
}

impl From<&Person> for ActiveModel {
    fn from(person: &Person) -> Self {
        let lifecycle = person.lifecycle();
        ActiveModel {
            id: Set(lifecycle.id()),
            name: Set(person.name().to_string()),
            cpf: Set(person.cpf().map(str::to_string)),
            email: Set(person.email().map(str::to_string)),
            birth_date: Set(person.birth_date()),
            created_at: Set(lifecycle.created_at()),
            updated_at: Set(lifecycle.updated_at()),
            inactivated_at: Set(lifecycle.inactivated_at()),
        }
    }
}
