//! Migration: Create persons, customers and employees.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_authorization_tables::{Roles, Users};
use super::{cascade_fk, lifecycle_table};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                lifecycle_table(Persons::Table)
                    .col(ColumnDef::new(Persons::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Persons::Cpf).string_len(11).null().unique_key())
                    .col(ColumnDef::new(Persons::Email).string_len(150).null().unique_key())
                    .col(ColumnDef::new(Persons::BirthDate).date().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                lifecycle_table(Customers::Table)
                    .col(ColumnDef::new(Customers::PersonId).uuid().not_null())
                    .foreign_key(&mut cascade_fk(
                        "fk_customers_person",
                        Customers::Table,
                        Customers::PersonId,
                        Persons::Table,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_customers_person_id")
                    .table(Customers::Table)
                    .col(Customers::PersonId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                lifecycle_table(Employees::Table)
                    .col(ColumnDef::new(Employees::PersonId).uuid().not_null())
                    .col(ColumnDef::new(Employees::RoleId).uuid().not_null())
                    .col(ColumnDef::new(Employees::UserId).uuid().not_null())
                    .col(ColumnDef::new(Employees::AdmissionDate).date().null())
                    .col(ColumnDef::new(Employees::TerminationDate).date().null())
                    .foreign_key(&mut cascade_fk(
                        "fk_employees_person",
                        Employees::Table,
                        Employees::PersonId,
                        Persons::Table,
                    ))
                    .foreign_key(&mut cascade_fk(
                        "fk_employees_role",
                        Employees::Table,
                        Employees::RoleId,
                        Roles::Table,
                    ))
                    .foreign_key(&mut cascade_fk(
                        "fk_employees_user",
                        Employees::Table,
                        Employees::UserId,
                        Users::Table,
                    ))
                    .to_owned(),
            )
            .await?;

        // One employee record per person and per login account
        manager
            .create_index(
                Index::create()
                    .name("idx_employees_person_id")
                    .table(Employees::Table)
                    .col(Employees::PersonId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employees_user_id")
                    .table(Employees::Table)
                    .col(Employees::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Persons::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Persons {
    Table,
    Name,
    Cpf,
    Email,
    BirthDate,
}

#[derive(Iden)]
enum Customers {
    Table,
    PersonId,
}

#[derive(Iden)]
enum Employees {
    Table,
    PersonId,
    RoleId,
    UserId,
    AdmissionDate,
    TerminationDate,
}
