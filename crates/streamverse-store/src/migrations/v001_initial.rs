//! v001 -- Initial schema creation.
//!
//! One generic `documents` table holds every collection.  The identity
//! provider keeps its accounts, the resumable session and the password reset
//! outbox in dedicated tables.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Documents
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    key        TEXT NOT NULL,
    body       TEXT NOT NULL,               -- JSON object
    created_at TEXT NOT NULL,               -- RFC-3339, microseconds, UTC
    updated_at TEXT NOT NULL,

    PRIMARY KEY (collection, key)
);

CREATE INDEX IF NOT EXISTS idx_documents_collection_created
    ON documents(collection, created_at DESC);

-- ----------------------------------------------------------------
-- Accounts (identity provider)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS accounts (
    uid           TEXT PRIMARY KEY NOT NULL,
    email         TEXT NOT NULL UNIQUE,     -- lowercase
    password_hash TEXT NOT NULL,            -- argon2id PHC string
    display_name  TEXT,
    created_at    TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Resumable session (at most one row)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS current_session (
    id         INTEGER PRIMARY KEY CHECK (id = 1),
    uid        TEXT NOT NULL,
    started_at TEXT NOT NULL,

    FOREIGN KEY (uid) REFERENCES accounts(uid) ON DELETE CASCADE
);

-- ----------------------------------------------------------------
-- Password reset outbox
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS password_resets (
    id           TEXT PRIMARY KEY NOT NULL, -- UUID v4
    email        TEXT NOT NULL,
    requested_at TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Local settings
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS app_settings (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
