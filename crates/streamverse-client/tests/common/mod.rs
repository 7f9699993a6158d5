#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use streamverse_client::backend::{entitlement_key, BackendResult};
use streamverse_client::{
    App, BackendError, ClientConfig, DocumentBackend, IdentityProvider, LocalIdentityProvider,
    ShellView,
};
use streamverse_shared::{
    Entitlement, Favorite, FavoriteId, NewFavorite, NewPayment, PaymentRecord, Profile, Session,
    TitleId, UserId,
};
use streamverse_store::{LiveDocument, Store};

pub const WAIT: Duration = Duration::from_secs(5);
pub const PASSWORD: &str = "secret1";

/// No payment delay and a catalog address that refuses connections.
pub fn test_config() -> ClientConfig {
    let mut config = ClientConfig::default();
    config.payment_delay = Duration::ZERO;
    config.catalog.base_url = "http://127.0.0.1:9".into();
    config.catalog.timeout = Duration::from_secs(2);
    config
}

pub fn fast_identity(store: Store) -> Arc<LocalIdentityProvider> {
    let params = argon2::Params::new(8, 1, 1, None).unwrap();
    Arc::new(LocalIdentityProvider::with_params(store, params).unwrap())
}

pub struct Harness {
    pub store: Store,
    pub identity: Arc<LocalIdentityProvider>,
    pub backend: Arc<InstrumentedBackend>,
    pub app: App,
}

impl Harness {
    pub fn new() -> Self {
        Self::over(Store::open_in_memory().unwrap())
    }

    pub fn over(store: Store) -> Self {
        let identity = fast_identity(store.clone());
        let backend = Arc::new(InstrumentedBackend::new(store.clone()));
        let app = App::new(test_config(), identity.clone(), backend.clone()).unwrap();
        Self {
            store,
            identity,
            backend,
            app,
        }
    }

    /// Register `email` (which signs it in) and wait for the shell to
    /// reflect the new session.
    pub async fn sign_up(&self, email: &str) -> Session {
        let session = self.identity.create_account(email, PASSWORD).await.unwrap();
        self.synced(Some(&session.uid)).await;
        session
    }

    pub async fn sign_in(&self, email: &str) -> Session {
        let session = self.identity.sign_in(email, PASSWORD).await.unwrap();
        self.synced(Some(&session.uid)).await;
        session
    }

    pub async fn sign_out(&self) {
        self.identity.sign_out().await.unwrap();
        self.synced(None).await;
    }

    pub async fn synced(&self, uid: Option<&UserId>) -> ShellView {
        tokio::time::timeout(WAIT, self.app.sync().synced_with(uid))
            .await
            .expect("shell did not sync in time")
    }

    pub async fn wait_for_view(&self, pred: impl Fn(&ShellView) -> bool) -> ShellView {
        let mut rx = self.app.sync().subscribe();
        tokio::time::timeout(WAIT, async move {
            rx.wait_for(|view| pred(view)).await.map(|view| view.clone())
        })
        .await
        .expect("view did not change in time")
        .expect("session sync stopped")
    }

    pub fn live_entitlements(&self, uid: &UserId) -> usize {
        self.store.live_subscriptions(&entitlement_key(uid))
    }
}

/// [`Store`] behind the backend port, counting every call and able to fail
/// selected operations.
pub struct InstrumentedBackend {
    store: Store,
    calls: AtomicUsize,
    pub fail_profile_reads: AtomicBool,
    pub fail_entitlement_watch: AtomicBool,
    pub fail_purchases: AtomicBool,
    /// Added latency on every profile read, in milliseconds.
    pub profile_delay_ms: AtomicU64,
    max_live_entitlements: AtomicUsize,
    watched: Mutex<Vec<UserId>>,
}

impl InstrumentedBackend {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            calls: AtomicUsize::new(0),
            fail_profile_reads: AtomicBool::new(false),
            fail_entitlement_watch: AtomicBool::new(false),
            fail_purchases: AtomicBool::new(false),
            profile_delay_ms: AtomicU64::new(0),
            max_live_entitlements: AtomicUsize::new(0),
            watched: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of entitlement subscriptions seen open at once.
    pub fn max_live_entitlements(&self) -> usize {
        self.max_live_entitlements.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn open_entitlements(&self) -> usize {
        self.watched
            .lock()
            .unwrap()
            .iter()
            .map(|uid| self.store.live_subscriptions(&entitlement_key(uid)))
            .sum()
    }
}

#[async_trait]
impl DocumentBackend for InstrumentedBackend {
    async fn read_profile(&self, uid: &UserId) -> BackendResult<Option<Profile>> {
        self.count();
        let delay = self.profile_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_profile_reads.load(Ordering::SeqCst) {
            return Err(BackendError::PermissionDenied("users".into()));
        }
        self.store.read_profile(uid).await
    }

    async fn write_profile(&self, uid: &UserId, profile: &Profile) -> BackendResult<()> {
        self.count();
        self.store.write_profile(uid, profile).await
    }

    async fn read_entitlement(&self, uid: &UserId) -> BackendResult<Option<Entitlement>> {
        self.count();
        self.store.read_entitlement(uid).await
    }

    async fn watch_entitlement(&self, uid: &UserId) -> BackendResult<LiveDocument<Entitlement>> {
        self.count();
        if self.fail_entitlement_watch.load(Ordering::SeqCst) {
            return Err(BackendError::PermissionDenied("subscriptions".into()));
        }
        let live = self.store.watch_entitlement(uid).await?;
        self.watched.lock().unwrap().push(uid.clone());
        self.max_live_entitlements
            .fetch_max(self.open_entitlements(), Ordering::SeqCst);
        Ok(live)
    }

    async fn commit_purchase(
        &self,
        uid: &UserId,
        entitlement: &Entitlement,
        payment: NewPayment,
    ) -> BackendResult<PaymentRecord> {
        self.count();
        if self.fail_purchases.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("payments offline".into()));
        }
        self.store.commit_purchase(uid, entitlement, payment).await
    }

    async fn list_payments(&self, uid: &UserId) -> BackendResult<Vec<PaymentRecord>> {
        self.count();
        self.store.list_payments(uid).await
    }

    async fn add_favorite(&self, favorite: NewFavorite) -> BackendResult<Favorite> {
        self.count();
        self.store.add_favorite(favorite).await
    }

    async fn list_favorites(&self, owner: &UserId) -> BackendResult<Vec<Favorite>> {
        self.count();
        self.store.list_favorites(owner).await
    }

    async fn find_favorites(
        &self,
        owner: &UserId,
        title_id: TitleId,
    ) -> BackendResult<Vec<Favorite>> {
        self.count();
        self.store.find_favorites(owner, title_id).await
    }

    async fn remove_favorite(&self, id: &FavoriteId) -> BackendResult<bool> {
        self.count();
        self.store.remove_favorite(id).await
    }
}
