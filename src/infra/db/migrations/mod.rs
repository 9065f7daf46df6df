//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_authorization_tables;
mod m20240101_000002_create_people_tables;
mod m20240102_000001_seed_authorization;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_authorization_tables::Migration),
            Box::new(m20240101_000002_create_people_tables::Migration),
            Box::new(m20240102_000001_seed_authorization::Migration),
        ]
    }
}

/// Columns shared by every table
#[derive(Iden)]
enum Lifecycle {
    Id,
    CreatedAt,
    UpdatedAt,
    InactivatedAt,
}

/// `CREATE TABLE` with the lifecycle columns already in place.
fn lifecycle_table<T: IntoTableRef>(table: T) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(ColumnDef::new(Lifecycle::Id).uuid().not_null().primary_key())
        .col(
            ColumnDef::new(Lifecycle::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Lifecycle::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Lifecycle::InactivatedAt)
                .timestamp_with_time_zone()
                .null(),
        )
        .to_owned()
}

/// Foreign key to `<to>.id`, removed together with the referenced row.
fn cascade_fk<F, C, T>(name: &str, from: F, column: C, to: T) -> ForeignKeyCreateStatement
where
    F: IntoIden + 'static,
    C: IntoIden,
    T: IntoIden + 'static,
{
    ForeignKey::create()
        .name(name)
        .from(from, column)
        .to(to, Lifecycle::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .on_update(ForeignKeyAction::Cascade)
        .to_owned()
}
