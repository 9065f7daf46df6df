//! Migration: Create permissions, profiles, roles, users and the link tables.

use sea_orm_migration::prelude::*;

use super::{cascade_fk, lifecycle_table};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                lifecycle_table(Permissions::Table)
                    .col(
                        ColumnDef::new(Permissions::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Permissions::Description).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                lifecycle_table(Profiles::Table)
                    .col(
                        ColumnDef::new(Profiles::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Profiles::Description).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                lifecycle_table(Roles::Table)
                    .col(
                        ColumnDef::new(Roles::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Roles::Description).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                lifecycle_table(Users::Table)
                    .col(
                        ColumnDef::new(Users::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                lifecycle_table(ProfilePermissions::Table)
                    .col(ColumnDef::new(ProfilePermissions::ProfileId).uuid().not_null())
                    .col(
                        ColumnDef::new(ProfilePermissions::PermissionId)
                            .uuid()
                            .not_null(),
                    )
                    .foreign_key(&mut cascade_fk(
                        "fk_profile_permissions_profile",
                        ProfilePermissions::Table,
                        ProfilePermissions::ProfileId,
                        Profiles::Table,
                    ))
                    .foreign_key(&mut cascade_fk(
                        "fk_profile_permissions_permission",
                        ProfilePermissions::Table,
                        ProfilePermissions::PermissionId,
                        Permissions::Table,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_profile_permissions_pair")
                    .table(ProfilePermissions::Table)
                    .col(ProfilePermissions::ProfileId)
                    .col(ProfilePermissions::PermissionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                lifecycle_table(UserProfiles::Table)
                    .col(ColumnDef::new(UserProfiles::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserProfiles::ProfileId).uuid().not_null())
                    .foreign_key(&mut cascade_fk(
                        "fk_user_profiles_user",
                        UserProfiles::Table,
                        UserProfiles::UserId,
                        Users::Table,
                    ))
                    .foreign_key(&mut cascade_fk(
                        "fk_user_profiles_profile",
                        UserProfiles::Table,
                        UserProfiles::ProfileId,
                        Profiles::Table,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_profiles_pair")
                    .table(UserProfiles::Table)
                    .col(UserProfiles::UserId)
                    .col(UserProfiles::ProfileId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Link tables first
        manager
            .drop_table(Table::drop().table(UserProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProfilePermissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Permissions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Permissions {
    Table,
    Name,
    Description,
}

#[derive(Iden)]
enum Profiles {
    Table,
    Name,
    Description,
}

#[derive(Iden)]
pub(super) enum Roles {
    Table,
    Name,
    Description,
}

#[derive(Iden)]
pub(super) enum Users {
    Table,
    Name,
    PasswordHash,
}

#[derive(Iden)]
enum ProfilePermissions {
    Table,
    ProfileId,
    PermissionId,
}

#[derive(Iden)]
enum UserProfiles {
    Table,
    UserId,
    ProfileId,
}
