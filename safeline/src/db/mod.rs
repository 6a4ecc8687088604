//! Database layer for Safeline.
//!
//! Provides SQLite-based persistence for emergency contacts. The `Database`
//! handle owns the connection; `ContactStore` wraps it with the contact CRUD
//! API used by the controllers.

mod contacts;
mod schema;

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::{Mutex, MutexGuard};
use rusqlite::{Connection, OptionalExtension};

use safeline_shared::errors::{SafelineError, SafelineResult};

pub use contacts::{Contact, ContactStore};

/// Helper macro to convert rusqlite errors to SafelineError.
macro_rules! db_err {
    ($result:expr) => {
        $result.map_err(|e| SafelineError::Database(e.to_string()))
    };
}

pub(crate) use db_err;

/// SQLite database handle.
///
/// Thread-safe via `parking_lot::Mutex`. Domain-specific stores wrap this to
/// provide their APIs (e.g., `ContactStore`).
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create the database.
    pub fn open(db_path: &Path) -> SafelineResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = db_err!(Connection::open(db_path))?;

        // WAL for concurrent reads, busy timeout so overlapping handles
        // queue instead of failing.
        db_err!(conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=FULL;
            PRAGMA foreign_keys=ON;
            PRAGMA busy_timeout=5000;
            "
        ))?;

        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database. Used by tests.
    pub fn open_in_memory() -> SafelineResult<Self> {
        let conn = db_err!(Connection::open_in_memory())?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Acquire the database connection.
    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }

    /// Initialize database schema.
    ///
    /// Idempotent: a fresh database gets the full schema, a current one is
    /// left untouched, and a newer-versioned one is refused rather than
    /// silently rewritten.
    fn init_schema(conn: &Connection) -> SafelineResult<()> {
        db_err!(conn.execute_batch(schema::SCHEMA_VERSION_TABLE))?;

        let current_version: Option<i32> = db_err!(
            conn.query_row(
                "SELECT version FROM schema_version WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .optional()
        )?;

        match current_version {
            None => {
                Self::apply_full_schema(conn)?;
            }
            Some(v) if v == schema::SCHEMA_VERSION => {
                // Already at current version - nothing to do
            }
            Some(v) => {
                return Err(SafelineError::Database(format!(
                    "Schema version mismatch: database has v{}, process expects v{}",
                    v,
                    schema::SCHEMA_VERSION
                )));
            }
        }

        Ok(())
    }

    /// Apply full schema for new database.
    fn apply_full_schema(conn: &Connection) -> SafelineResult<()> {
        for sql in schema::all_schemas() {
            db_err!(conn.execute_batch(sql))?;
        }

        let now = Utc::now().to_rfc3339();
        db_err!(conn.execute(
            "INSERT INTO schema_version (id, version, updated_at) VALUES (1, ?1, ?2)",
            rusqlite::params![schema::SCHEMA_VERSION, now],
        ))?;

        tracing::info!(
            "Initialized database schema version {}",
            schema::SCHEMA_VERSION
        );
        Ok(())
    }
}
