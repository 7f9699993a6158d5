use serde::{Deserialize, Serialize};

use crate::constants::FALLBACK_DISPLAY_NAME;
use crate::types::UserId;

/// The identity provider's view of who is signed in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub uid: UserId,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Per-user descriptive record, written once at registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub email: String,
}

impl Profile {
    /// Profile built from provider-supplied fields when no stored profile
    /// could be read.
    pub fn fallback(session: &Session) -> Self {
        let name = session
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(FALLBACK_DISPLAY_NAME)
            .to_string();

        Self {
            name,
            email: session.email.clone().unwrap_or_default(),
        }
    }

    /// Pick the stored profile if there is one, the fallback otherwise.
    pub fn resolve(stored: Option<Profile>, session: &Session) -> Self {
        stored.unwrap_or_else(|| Self::fallback(session))
    }
}
