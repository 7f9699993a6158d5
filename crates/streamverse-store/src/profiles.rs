//! `users` collection: one profile document per uid.

use streamverse_shared::constants::COLLECTION_PROFILES;
use streamverse_shared::{Profile, UserId};

use crate::database::Database;
use crate::error::Result;

impl Database {
    pub fn put_profile(&self, uid: &UserId, profile: &Profile) -> Result<()> {
        let body = serde_json::to_value(profile)?;
        self.put_document(COLLECTION_PROFILES, uid.as_str(), &body)
    }

    pub fn get_profile(&self, uid: &UserId) -> Result<Option<Profile>> {
        match self.get_document(COLLECTION_PROFILES, uid.as_str())? {
            Some(body) => Ok(Some(serde_json::from_value(body)?)),
            None => Ok(None),
        }
    }
}
