//! Row types that are not documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use streamverse_shared::UserId;

/// A local identity-provider account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub uid: UserId,
    /// Normalised (trimmed, lowercase) email address.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
