//! Migration: Seed the permission taxonomy, the four profiles and the
//! employee roles.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm_migration::prelude::*;
use uuid::Uuid;

use crate::config::{
    permissions, PROFILE_ADMINISTRATOR, PROFILE_CUSTOMER, PROFILE_EMPLOYEE, PROFILE_MANAGER,
    ROLE_EMPLOYEE, ROLE_MANAGER,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

const ROLES: [(&str, &str); 2] = [
    (ROLE_MANAGER, "store manager with full access"),
    (ROLE_EMPLOYEE, "store employee with restricted access"),
];

const PROFILE_NAMES: [&str; 4] = [
    PROFILE_ADMINISTRATOR,
    PROFILE_MANAGER,
    PROFILE_EMPLOYEE,
    PROFILE_CUSTOMER,
];

/// (name, description, granted permissions)
fn profiles() -> Vec<(&'static str, &'static str, Vec<&'static str>)> {
    let everything: Vec<_> = permissions::all().collect();
    let mut staff: Vec<_> = permissions::all()
        .filter(|name| name.starts_with("can_view_"))
        .collect();
    staff.push(permissions::persons::UPDATE);

    vec![
        (
            PROFILE_ADMINISTRATOR,
            "Manager with full access.",
            everything.clone(),
        ),
        (PROFILE_MANAGER, "Manager with full access.", everything),
        (PROFILE_EMPLOYEE, "Employee with restricted access.", staff),
        (
            PROFILE_CUSTOMER,
            "Customer with limited access.",
            vec![permissions::customers::VIEW, permissions::customers::UPDATE],
        ),
    ]
}

fn seed_error(e: impl std::fmt::Display) -> DbErr {
    DbErr::Custom(format!("Seed statement: {}", e))
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = Utc::now();

        let mut permission_ids = HashMap::new();
        let mut insert = Query::insert();
        insert.into_table(Permissions::Table).columns([
            Permissions::Id,
            Permissions::Name,
            Permissions::Description,
            Permissions::CreatedAt,
            Permissions::UpdatedAt,
        ]);
        for name in permissions::all() {
            let id = Uuid::new_v4();
            insert
                .values([
                    id.into(),
                    name.into(),
                    permissions::describe(name).into(),
                    now.into(),
                    now.into(),
                ])
                .map_err(seed_error)?;
            permission_ids.insert(name, id);
        }
        manager.exec_stmt(insert).await?;

        for (name, description, granted) in profiles() {
            let profile_id = Uuid::new_v4();
            let mut insert = Query::insert();
            insert
                .into_table(Profiles::Table)
                .columns([
                    Profiles::Id,
                    Profiles::Name,
                    Profiles::Description,
                    Profiles::CreatedAt,
                    Profiles::UpdatedAt,
                ])
                .values([
                    profile_id.into(),
                    name.into(),
                    description.into(),
                    now.into(),
                    now.into(),
                ])
                .map_err(seed_error)?;
            manager.exec_stmt(insert).await?;

            let mut links = Query::insert();
            links.into_table(ProfilePermissions::Table).columns([
                ProfilePermissions::Id,
                ProfilePermissions::ProfileId,
                ProfilePermissions::PermissionId,
                ProfilePermissions::CreatedAt,
                ProfilePermissions::UpdatedAt,
            ]);
            for permission in granted {
                let permission_id = permission_ids
                    .get(permission)
                    .copied()
                    .ok_or_else(|| DbErr::Custom(format!("Unknown permission {}", permission)))?;
                links
                    .values([
                        Uuid::new_v4().into(),
                        profile_id.into(),
                        permission_id.into(),
                        now.into(),
                        now.into(),
                    ])
                    .map_err(seed_error)?;
            }
            manager.exec_stmt(links).await?;
        }

        let mut insert = Query::insert();
        insert.into_table(Roles::Table).columns([
            Roles::Id,
            Roles::Name,
            Roles::Description,
            Roles::CreatedAt,
            Roles::UpdatedAt,
        ]);
        for (name, description) in ROLES {
            insert
                .values([
                    Uuid::new_v4().into(),
                    name.into(),
                    description.into(),
                    now.into(),
                    now.into(),
                ])
                .map_err(seed_error)?;
        }
        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Profile links go with their profiles
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Profiles::Table)
                    .and_where(Expr::col(Profiles::Name).is_in(PROFILE_NAMES))
                    .to_owned(),
            )
            .await?;

        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Permissions::Table)
                    .and_where(Expr::col(Permissions::Name).is_in(permissions::all()))
                    .to_owned(),
            )
            .await?;

        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Roles::Table)
                    .and_where(Expr::col(Roles::Name).is_in(ROLES.map(|(name, _)| name)))
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum Permissions {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Profiles {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ProfilePermissions {
    Table,
    Id,
    ProfileId,
    PermissionId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Roles {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}
