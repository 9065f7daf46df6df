//! Request-scoped database session.
//!
//! A session owns one database transaction and one [`IdentityMap`]. Every
//! repository built for a request shares the same session, so all of the
//! request's writes commit or roll back together.

use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use tokio::sync::{Mutex, MutexGuard};

use super::identity_map::IdentityMap;
use crate::errors::{AppError, AppResult};

pub struct Session {
    txn: Mutex<Option<DatabaseTransaction>>,
    identities: IdentityMap,
}

/// Exclusive access to the session's transaction for one repository call.
pub struct SessionGuard<'a> {
    txn: MutexGuard<'a, Option<DatabaseTransaction>>,
    identities: &'a IdentityMap,
}

impl SessionGuard<'_> {
    /// Open transaction; fails once the session has been closed.
    pub fn conn(&self) -> AppResult<&DatabaseTransaction> {
        self.txn
            .as_ref()
            .ok_or_else(|| AppError::internal("Session already closed"))
    }

    pub fn identities(&self) -> &IdentityMap {
        self.identities
    }
}

impl Session {
    /// Begin a ReadCommitted transaction on `db`.
    pub async fn begin(db: &DatabaseConnection) -> AppResult<Self> {
        let txn = db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await?;

        Ok(Self {
            txn: Mutex::new(Some(txn)),
            identities: IdentityMap::new(),
        })
    }

    pub async fn acquire(&self) -> SessionGuard<'_> {
        SessionGuard {
            txn: self.txn.lock().await,
            identities: &self.identities,
        }
    }

    pub async fn commit(&self) -> AppResult<()> {
        let txn = self.txn.lock().await.take();
        self.identities.clear();
        match txn {
            Some(txn) => txn.commit().await.map_err(AppError::from),
            None => Err(AppError::internal("Session already closed")),
        }
    }

    /// Roll back and close. Closing an already closed session is a no-op.
    pub async fn rollback(&self) -> AppResult<()> {
        let txn = self.txn.lock().await.take();
        self.identities.clear();
        if let Some(txn) = txn {
            txn.rollback().await?;
        }
        Ok(())
    }
}
