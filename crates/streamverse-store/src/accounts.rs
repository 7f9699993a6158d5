//! Identity-provider tables: accounts, the resumable session and the
//! password reset outbox.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use streamverse_shared::UserId;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::Account;

impl Database {
    // ------------------------------------------------------------------
    // Accounts
    // ------------------------------------------------------------------

    /// Insert a new account.  Fails with [`StoreError::Conflict`] when the
    /// email is already registered.
    pub fn create_account(&self, account: &Account) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO accounts (uid, email, password_hash, display_name, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    account.uid.as_str(),
                    account.email,
                    account.password_hash,
                    account.display_name,
                    account.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| StoreError::from_constraint(e, "email already registered"))?;
        Ok(())
    }

    pub fn get_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        self.conn()
            .query_row(
                "SELECT uid, email, password_hash, display_name, created_at
                 FROM accounts WHERE email = ?1",
                params![email],
                row_to_account,
            )
            .optional()
            .map_err(StoreError::from)
    }

    pub fn get_account(&self, uid: &UserId) -> Result<Option<Account>> {
        self.conn()
            .query_row(
                "SELECT uid, email, password_hash, display_name, created_at
                 FROM accounts WHERE uid = ?1",
                params![uid.as_str()],
                row_to_account,
            )
            .optional()
            .map_err(StoreError::from)
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    /// Remember `uid` as the signed-in account, or forget it with `None`.
    pub fn set_current_session(&self, uid: Option<&UserId>) -> Result<()> {
        match uid {
            Some(uid) => {
                self.conn().execute(
                    "INSERT OR REPLACE INTO current_session (id, uid, started_at)
                     VALUES (1, ?1, ?2)",
                    params![uid.as_str(), Utc::now().to_rfc3339()],
                )?;
            }
            None => {
                self.conn().execute("DELETE FROM current_session", [])?;
            }
        }
        Ok(())
    }

    /// The account of the remembered session, if any.
    pub fn current_session_account(&self) -> Result<Option<Account>> {
        self.conn()
            .query_row(
                "SELECT a.uid, a.email, a.password_hash, a.display_name, a.created_at
                 FROM current_session s JOIN accounts a ON a.uid = s.uid
                 WHERE s.id = 1",
                [],
                row_to_account,
            )
            .optional()
            .map_err(StoreError::from)
    }

    // ------------------------------------------------------------------
    // Password reset outbox
    // ------------------------------------------------------------------

    pub fn record_password_reset(&self, email: &str) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.conn().execute(
            "INSERT INTO password_resets (id, email, requested_at) VALUES (?1, ?2, ?3)",
            params![id.to_string(), email, Utc::now().to_rfc3339()],
        )?;
        Ok(id)
    }

    pub fn password_reset_count(&self, email: &str) -> Result<usize> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM password_resets WHERE email = ?1",
            params![email],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to an [`Account`].
fn row_to_account(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    let uid: String = row.get(0)?;
    let created_str: String = row.get(4)?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Account {
        uid: UserId(uid),
        email: row.get(1)?,
        password_hash: row.get(2)?,
        display_name: row.get(3)?,
        created_at,
    })
}
