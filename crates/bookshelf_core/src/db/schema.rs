//! Catalog schema installation.
//!
//! The schema is a single DDL script versioned through `PRAGMA user_version`.
//! A fresh database gets the whole script in one transaction; a database
//! already at [`SCHEMA_VERSION`] is left alone.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, TransactionBehavior};

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

const CATALOG_DDL: &str = include_str!("catalog.sql");

/// Installs the catalog tables unless the database already carries them.
///
/// Fails with [`DbError::UnsupportedSchemaVersion`] for databases written
/// by a newer build.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let found = user_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: SCHEMA_VERSION,
        });
    }
    if found == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    tx.execute_batch(CATALOG_DDL)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;

    info!(
        "event=schema_install module=db status=ok from_version={found} to_version={SCHEMA_VERSION}"
    );
    Ok(())
}

fn user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}
