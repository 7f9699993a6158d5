//! Live document subscriptions.
//!
//! Each watched document has one `watch` channel.  Writers publish the full
//! body after every change; subscribers hold a [`LiveDocument`] that yields
//! the latest snapshot.  Dropping the handle is the unsubscribe.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;

use crate::documents::DocKey;

type Snapshot = Option<Value>;

/// Registry of watched documents.
#[derive(Default)]
pub struct LiveRegistry {
    channels: Mutex<HashMap<DocKey, watch::Sender<Snapshot>>>,
}

impl LiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn channels(&self) -> MutexGuard<'_, HashMap<DocKey, watch::Sender<Snapshot>>> {
        match self.channels.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Subscribe to `key`, seeding the channel with `current`.
    pub fn subscribe(&self, key: &DocKey, current: Snapshot) -> watch::Receiver<Snapshot> {
        let mut channels = self.channels();
        match channels.get(key) {
            Some(tx) => {
                tx.send_if_modified(|value| {
                    if *value != current {
                        *value = current;
                        true
                    } else {
                        false
                    }
                });
                tx.subscribe()
            }
            None => {
                let (tx, rx) = watch::channel(current);
                channels.insert(key.clone(), tx);
                rx
            }
        }
    }

    /// Deliver a new snapshot of `key` to its subscribers.  Channels nobody
    /// listens to any more are pruned.
    pub fn publish(&self, key: &DocKey, snapshot: Snapshot) {
        let mut channels = self.channels();
        let Some(tx) = channels.get(key) else {
            return;
        };

        if tx.receiver_count() == 0 {
            channels.remove(key);
            return;
        }

        tx.send_replace(snapshot);
        tracing::trace!(doc = %key, subscribers = tx.receiver_count(), "snapshot published");
    }

    /// Number of live subscriptions currently open on `key`.
    pub fn subscriber_count(&self, key: &DocKey) -> usize {
        self.channels()
            .get(key)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    /// Close every channel.  Subscribers observe the end of their stream.
    pub fn close_all(&self) {
        self.channels().clear();
    }
}

/// Typed handle on one watched document.
pub struct LiveDocument<T> {
    key: DocKey,
    rx: watch::Receiver<Snapshot>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> LiveDocument<T> {
    pub fn new(key: DocKey, rx: watch::Receiver<Snapshot>) -> Self {
        Self {
            key,
            rx,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &DocKey {
        &self.key
    }

    /// Latest snapshot, marking it seen.  A body that does not decode as `T`
    /// reads as absent.
    pub fn current(&mut self) -> Option<T> {
        let snapshot = self.rx.borrow_and_update().clone();
        self.decode(snapshot)
    }

    /// Wait for the next snapshot.  `None` once the store has closed the
    /// subscription.
    pub async fn changed(&mut self) -> Option<Option<T>> {
        self.rx.changed().await.ok()?;
        Some(self.current())
    }

    fn decode(&self, snapshot: Snapshot) -> Option<T> {
        let value = snapshot?;
        match serde_json::from_value(value) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(doc = %self.key, error = %e, "undecodable snapshot treated as absent");
                None
            }
        }
    }
}

impl<T> std::fmt::Debug for LiveDocument<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveDocument").field("key", &self.key).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn subscribers_see_published_snapshots() {
        let registry = LiveRegistry::new();
        let key = DocKey::new("c", "k");

        let rx = registry.subscribe(&key, None);
        let mut doc: LiveDocument<Value> = LiveDocument::new(key.clone(), rx);
        assert_eq!(doc.current(), None);

        registry.publish(&key, Some(json!({"v": 1})));
        assert_eq!(doc.changed().await, Some(Some(json!({"v": 1}))));
    }

    #[tokio::test]
    async fn dropping_the_handle_unsubscribes() {
        let registry = LiveRegistry::new();
        let key = DocKey::new("c", "k");

        let a = registry.subscribe(&key, None);
        let b = registry.subscribe(&key, None);
        assert_eq!(registry.subscriber_count(&key), 2);

        drop(a);
        assert_eq!(registry.subscriber_count(&key), 1);
        drop(b);
        assert_eq!(registry.subscriber_count(&key), 0);

        registry.publish(&key, Some(json!({})));
        assert_eq!(registry.subscriber_count(&key), 0);
    }

    #[tokio::test]
    async fn close_all_ends_streams() {
        let registry = LiveRegistry::new();
        let key = DocKey::new("c", "k");
        let mut doc: LiveDocument<Value> = LiveDocument::new(key.clone(), registry.subscribe(&key, None));

        registry.close_all();
        assert_eq!(doc.changed().await, None);
    }

    #[tokio::test]
    async fn undecodable_snapshot_reads_as_absent() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Typed {
            n: u32,
        }

        let registry = LiveRegistry::new();
        let key = DocKey::new("c", "k");
        let mut doc: LiveDocument<Typed> =
            LiveDocument::new(key.clone(), registry.subscribe(&key, Some(json!({"n": "x"}))));
        assert_eq!(doc.current(), None);

        registry.publish(&key, Some(json!({"n": 3})));
        assert_eq!(doc.changed().await, Some(Some(Typed { n: 3 })));
    }
}
