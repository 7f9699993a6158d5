//! Shared handle over the [`Database`] with live snapshot delivery.
//!
//! Reads and writes are serialised through one mutex.  A write names the
//! documents it touches; after it succeeds their new snapshots are published
//! to any [`LiveDocument`] subscribers while the lock is still held, so a
//! subscriber never sees snapshots out of order.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;

use crate::database::Database;
use crate::documents::DocKey;
use crate::error::{Result, StoreError};
use crate::live::{LiveDocument, LiveRegistry};

#[derive(Clone)]
pub struct Store {
    db: Arc<Mutex<Database>>,
    live: Arc<LiveRegistry>,
}

impl Store {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            live: Arc::new(LiveRegistry::new()),
        }
    }

    /// Open the database in the platform data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Database::new()?))
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        Ok(Self::new(Database::open_at(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Run a read-only closure against the database.
    pub fn read<R>(&self, f: impl FnOnce(&Database) -> Result<R>) -> Result<R> {
        let db = self.db.lock().map_err(|_| StoreError::LockPoisoned)?;
        f(&*db)
    }

    /// Run a write closure, then publish fresh snapshots of `touched`.
    /// Nothing is published if the closure fails.
    pub fn write<R>(
        &self,
        touched: &[DocKey],
        f: impl FnOnce(&mut Database) -> Result<R>,
    ) -> Result<R> {
        let mut db = self.db.lock().map_err(|_| StoreError::LockPoisoned)?;
        let result = f(&mut *db)?;

        for key in touched {
            if self.live.subscriber_count(key) == 0 {
                continue;
            }
            match db.get_document(&key.collection, &key.key) {
                Ok(snapshot) => self.live.publish(key, snapshot),
                Err(e) => {
                    tracing::warn!(doc = %key, error = %e, "failed to read back snapshot");
                }
            }
        }

        Ok(result)
    }

    /// Open a live subscription on one document, seeded with its current
    /// body.
    pub fn watch<T: DeserializeOwned>(&self, key: DocKey) -> Result<LiveDocument<T>> {
        let db = self.db.lock().map_err(|_| StoreError::LockPoisoned)?;
        let current = db.get_document(&key.collection, &key.key)?;
        let rx = self.live.subscribe(&key, current);
        tracing::debug!(doc = %key, "live subscription opened");
        Ok(LiveDocument::new(key, rx))
    }

    /// Number of live subscriptions currently open on `key`.
    pub fn live_subscriptions(&self, key: &DocKey) -> usize {
        self.live.subscriber_count(key)
    }

    /// End every live subscription.
    pub fn close_subscriptions(&self) {
        self.live.close_all();
    }
}
