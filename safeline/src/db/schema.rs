//! Database schema definitions.
//!
//! The `Contacts` relation is the durable contract around the core: three
//! columns with SQLite AUTOINCREMENT identity. `name` and `mobile` are
//! nullable at the storage layer; non-empty enforcement is the caller's job.

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Schema version tracking table.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// Emergency contacts table schema.
///
/// Column names and identity semantics must stay exactly as written so
/// existing data files keep working.
pub const CONTACTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    mobile TEXT
);
"#;

/// Get all schema creation statements.
pub fn all_schemas() -> Vec<&'static str> {
    vec![SCHEMA_VERSION_TABLE, CONTACTS_TABLE]
}
