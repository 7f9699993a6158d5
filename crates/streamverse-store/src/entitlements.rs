//! `subscriptions` collection: one entitlement document per uid.

use rusqlite::Connection;
use streamverse_shared::constants::COLLECTION_ENTITLEMENTS;
use streamverse_shared::{Entitlement, UserId};

use crate::database::Database;
use crate::documents;
use crate::error::Result;

pub(crate) fn put(conn: &Connection, uid: &UserId, entitlement: &Entitlement) -> Result<()> {
    let body = serde_json::to_value(entitlement)?;
    documents::put(conn, COLLECTION_ENTITLEMENTS, uid.as_str(), &body)
}

impl Database {
    pub fn put_entitlement(&self, uid: &UserId, entitlement: &Entitlement) -> Result<()> {
        put(self.conn(), uid, entitlement)
    }

    pub fn get_entitlement(&self, uid: &UserId) -> Result<Option<Entitlement>> {
        match self.get_document(COLLECTION_ENTITLEMENTS, uid.as_str())? {
            Some(body) => Ok(Some(serde_json::from_value(body)?)),
            None => Ok(None),
        }
    }
}
