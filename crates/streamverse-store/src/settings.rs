//! Local key/value settings, including the persistent guest identifier.

use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use crate::database::Database;
use crate::error::Result;

const GUEST_ID_KEY: &str = "sv_guest_id";

impl Database {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn()
            .query_row(
                "SELECT value FROM app_settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?)
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO app_settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Identifier for this installation, created on first use.
    pub fn guest_id(&self) -> Result<String> {
        if let Some(id) = self.get_setting(GUEST_ID_KEY)? {
            return Ok(id);
        }
        let id = Uuid::new_v4().to_string();
        self.set_setting(GUEST_ID_KEY, &id)?;
        Ok(id)
    }
}
