//! Shared repository helpers.
//!
//! Every table carries the lifecycle columns, so listing and row updates are
//! written once here against [`LifecycleEntity`].

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Select,
};

use crate::errors::{AppError, AppResult};

/// SeaORM entity whose table has the lifecycle columns.
pub(crate) trait LifecycleEntity: EntityTrait {
    fn created_at() -> Self::Column;

    fn inactivated_at() -> Self::Column;
}

/// All rows in creation order, active rows only unless `include_deleted`.
pub(crate) fn scoped<E: LifecycleEntity>(include_deleted: bool) -> Select<E> {
    let query = E::find().order_by_asc(E::created_at());
    if include_deleted {
        query
    } else {
        query.filter(E::inactivated_at().is_null())
    }
}

/// Insert a new row.
pub(crate) async fn insert_row<A>(conn: &DatabaseTransaction, model: A) -> AppResult<()>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    model.insert(conn).await?;
    Ok(())
}

/// Overwrite an existing row. A missing row is reported as `NotFound(name)`.
pub(crate) async fn update_row<A>(
    conn: &DatabaseTransaction,
    model: A,
    name: &str,
) -> AppResult<()>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    match model.update(conn).await {
        Ok(_) => Ok(()),
        Err(DbErr::RecordNotUpdated) => Err(AppError::not_found(name)),
        Err(e) => Err(e.into()),
    }
}
