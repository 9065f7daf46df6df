//! Profile database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{Entity as _, Profile};
use crate::infra::repositories::base::LifecycleEntity;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub description: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
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

impl From<&Profile> for ActiveModel {
    fn from(profile: &Profile) -> Self {
        let lifecycle = profile.lifecycle();
        ActiveModel {
            id: Set(lifecycle.id()),
            name: Set(profile.name().to_string()),
            description: Set(profile.description().to_string()),
            created_at: Set(lifecycle.created_at()),
            updated_at: Set(lifecycle.updated_at()),
            inactivated_at: Set(lifecycle.inactivated_at()),
        }
    }
}
