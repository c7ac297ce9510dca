//! Unit-of-work scoping for catalog operations.
//!
//! # Responsibility
//! - Wrap one SQLite transaction per service operation.
//! - Own the shared catalog connection and serialize access to it.
//!
//! # Invariants
//! - A unit of work is finished exactly once: `commit` and `rollback` take
//!   it by value, and dropping it unfinished rolls back.
//! - The connection lock is held only for the lifetime of one unit of work.

use crate::db::{open_db, open_db_in_memory, seed};
use crate::repo::catalog_repo::{RepoError, RepoResult, SqliteCatalogRepository};
use log::{debug, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

/// Whether a unit of work only reads or also writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

/// One atomic catalog operation over a borrowed connection.
pub struct UnitOfWork<'conn> {
    tx: Transaction<'conn>,
    label: &'static str,
    started_at: Instant,
}

impl<'conn> UnitOfWork<'conn> {
    /// Starts a transaction. Writers take the database write lock up front
    /// so they never fail halfway on lock upgrade.
    pub fn begin(
        conn: &'conn mut Connection,
        label: &'static str,
        mode: AccessMode,
    ) -> RepoResult<Self> {
        let behavior = match mode {
            AccessMode::Read => TransactionBehavior::Deferred,
            AccessMode::Write => TransactionBehavior::Immediate,
        };
        let tx = conn.transaction_with_behavior(behavior)?;
        debug!("event=uow_begin module=repo status=start op={label} mode={mode:?}");
        Ok(Self {
            tx,
            label,
            started_at: Instant::now(),
        })
    }

    /// Repository view bound to this unit of work.
    pub fn repo(&self) -> SqliteCatalogRepository<'_> {
        SqliteCatalogRepository::new(&self.tx)
    }

    pub fn commit(self) -> RepoResult<()> {
        let Self {
            tx,
            label,
            started_at,
        } = self;
        tx.commit()?;
        debug!(
            "event=uow_commit module=repo status=ok op={label} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    pub fn rollback(self) -> RepoResult<()> {
        let Self {
            tx,
            label,
            started_at,
        } = self;
        tx.rollback()?;
        debug!(
            "event=uow_rollback module=repo status=ok op={label} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

/// Shared handle to the catalog database.
///
/// Safe to share across request handlers; every operation runs inside its
/// own [`UnitOfWork`].
pub struct Catalog {
    conn: Mutex<Connection>,
}

impl Catalog {
    /// Wraps an already bootstrapped connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Seeds demo data when the catalog has no authors.
    pub fn seed_if_empty(&self) -> RepoResult<bool> {
        let mut conn = self.connection()?;
        seed::seed_if_empty(&mut conn)
    }

    /// Locks the underlying connection for direct access.
    pub fn connection(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RepoError::Unavailable("catalog connection lock poisoned".to_string()))
    }

    /// Runs `op` in a read-only unit of work.
    pub fn read<T, E>(
        &self,
        label: &'static str,
        op: impl FnOnce(&SqliteCatalogRepository<'_>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<RepoError>,
    {
        self.run(label, AccessMode::Read, op)
    }

    /// Runs `op` in a write unit of work: commits when `op` succeeds and
    /// rolls back every change when it fails.
    pub fn write<T, E>(
        &self,
        label: &'static str,
        op: impl FnOnce(&SqliteCatalogRepository<'_>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<RepoError>,
    {
        self.run(label, AccessMode::Write, op)
    }

    fn run<T, E>(
        &self,
        label: &'static str,
        mode: AccessMode,
        op: impl FnOnce(&SqliteCatalogRepository<'_>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<RepoError>,
    {
        let mut conn = self.connection()?;
        let uow = UnitOfWork::begin(&mut conn, label, mode)?;
        let outcome = op(&uow.repo());

        match outcome {
            Ok(value) => {
                uow.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = uow.rollback() {
                    warn!(
                        "event=uow_rollback module=repo status=error op={label} error={rollback_err}"
                    );
                }
                Err(err)
            }
        }
    }
}
