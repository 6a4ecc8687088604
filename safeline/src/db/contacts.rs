//! Contact store: CRUD over the `Contacts` relation.

use rusqlite::params;

use safeline_shared::errors::{SafelineError, SafelineResult};

use super::{Database, db_err};

/// A stored emergency contact.
///
/// `id` is assigned by the store and stable for the record's lifetime.
/// There is no update-in-place; edits are delete + recreate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub mobile: String,
}

/// Persistent store for emergency contacts.
///
/// A store handle is either backed by an open [`Database`] or disconnected.
/// The disconnected form exists so a failed database open can still hand the
/// rest of the app a usable handle: reads come back empty, writes fail with a
/// database error. See `SafelineRuntime::new`.
#[derive(Clone)]
pub struct ContactStore {
    db: Option<Database>,
}

impl ContactStore {
    /// Create a store backed by an open database.
    pub fn new(db: Database) -> Self {
        Self { db: Some(db) }
    }

    /// Create a store with no backing database.
    pub fn disconnected() -> Self {
        Self { db: None }
    }

    /// Whether a backing database is present.
    pub fn is_connected(&self) -> bool {
        self.db.is_some()
    }

    /// List all contacts in natural storage order.
    ///
    /// Query failures degrade to an empty list; callers cannot distinguish
    /// "no contacts" from "query error". The failure is logged here.
    pub fn list(&self) -> Vec<Contact> {
        let Some(db) = &self.db else {
            tracing::warn!("contact store is disconnected, returning no contacts");
            return Vec::new();
        };

        match Self::query_all(db) {
            Ok(contacts) => contacts,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list contacts");
                Vec::new()
            }
        }
    }

    fn query_all(db: &Database) -> SafelineResult<Vec<Contact>> {
        let conn = db.conn();
        let mut stmt = db_err!(conn.prepare("SELECT id, name, mobile FROM Contacts"))?;
        let rows = db_err!(stmt.query_map([], |row| {
            Ok(Contact {
                id: row.get(0)?,
                // NULL columns surface as empty strings rather than errors
                name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                mobile: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            })
        }))?;

        let mut contacts = Vec::new();
        for row in rows {
            contacts.push(db_err!(row)?);
        }
        Ok(contacts)
    }

    /// Insert a new contact.
    ///
    /// Fails fast with [`SafelineError::Validation`] before touching storage
    /// when either field is empty or whitespace-only. Both fields are
    /// trimmed. The new row id is not returned; callers re-list to observe
    /// the insert.
    pub fn add(&self, name: &str, mobile: &str) -> SafelineResult<()> {
        let name = name.trim();
        let mobile = mobile.trim();
        if name.is_empty() || mobile.is_empty() {
            return Err(SafelineError::Validation(
                "both name and mobile are required".to_string(),
            ));
        }

        let db = self.db.as_ref().ok_or_else(|| {
            SafelineError::Database("contact store is disconnected".to_string())
        })?;

        let conn = db.conn();
        db_err!(conn.execute(
            "INSERT INTO Contacts (name, mobile) VALUES (?1, ?2)",
            params![name, mobile],
        ))?;

        tracing::debug!(name, "Contact added");
        Ok(())
    }

    /// Delete the contact with the given id.
    ///
    /// Deleting a non-existent id is a no-op, not an error.
    pub fn delete(&self, id: i64) -> SafelineResult<()> {
        let db = self.db.as_ref().ok_or_else(|| {
            SafelineError::Database("contact store is disconnected".to_string())
        })?;

        let conn = db.conn();
        let affected = db_err!(conn.execute("DELETE FROM Contacts WHERE id = ?1", params![id]))?;

        if affected == 0 {
            tracing::debug!(id, "Delete matched no contact");
        } else {
            tracing::debug!(id, "Contact deleted");
        }
        Ok(())
    }
}
