//! Application shell shared by every page command.
//!
//! [`App`] owns the collaborator ports, the catalog client, the session
//! synchronizer and the shell cancellation token that every background
//! task hangs off.

use std::sync::{Arc, Mutex};

use streamverse_catalog::CatalogClient;
use streamverse_shared::Session;
use streamverse_store::Store;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::backend::DocumentBackend;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::hero::TrailerRotation;
use crate::identity::{IdentityProvider, LocalIdentityProvider};
use crate::sync::{SessionSync, ShellView};

pub struct App {
    config: ClientConfig,
    identity: Arc<dyn IdentityProvider>,
    backend: Arc<dyn DocumentBackend>,
    catalog: CatalogClient,
    sync: SessionSync,
    shell: CancellationToken,
    /// Running only while the home page is shown.
    hero: Mutex<Option<TrailerRotation>>,
    guest_id: Option<String>,
}

impl App {
    /// Mount the shell over the given collaborators.  Must be called from
    /// within a Tokio runtime.
    pub fn new(
        config: ClientConfig,
        identity: Arc<dyn IdentityProvider>,
        backend: Arc<dyn DocumentBackend>,
    ) -> Result<Self> {
        let catalog = CatalogClient::new(config.catalog.clone())?;
        let shell = CancellationToken::new();
        let sync = SessionSync::start(identity.as_ref(), Arc::clone(&backend), &shell);

        Ok(Self {
            config,
            identity,
            backend,
            catalog,
            sync,
            shell,
            hero: Mutex::new(None),
            guest_id: None,
        })
    }

    /// Mount the shell over the local store at the configured path.
    pub fn open(config: ClientConfig) -> Result<Self> {
        let store = match &config.db_path {
            Some(path) => Store::open_at(path)?,
            None => Store::open_default()?,
        };
        Self::with_store(config, store)
    }

    /// Mount the shell over an already opened local store.
    pub fn with_store(config: ClientConfig, store: Store) -> Result<Self> {
        let guest_id = store.write(&[], |db| db.guest_id())?;
        let identity = Arc::new(LocalIdentityProvider::new(store.clone())?);
        let mut app = Self::new(config, identity, Arc::new(store))?;
        app.guest_id = Some(guest_id);
        info!(guest = ?app.guest_id, "shell mounted");
        Ok(app)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    pub fn backend(&self) -> &dyn DocumentBackend {
        self.backend.as_ref()
    }

    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    pub fn sync(&self) -> &SessionSync {
        &self.sync
    }

    /// Current shell view.
    pub fn view(&self) -> ShellView {
        self.sync.view()
    }

    /// The identity provider's session, authoritative for route gating.
    pub fn session(&self) -> Option<Session> {
        self.identity.current_session()
    }

    pub fn guest_id(&self) -> Option<&str> {
        self.guest_id.as_deref()
    }

    // ------------------------------------------------------------------
    // Hero trailer
    // ------------------------------------------------------------------

    /// Trailer currently shown on the home page, if it is mounted.
    pub fn hero_trailer(&self) -> Option<&'static str> {
        let hero = self.hero.lock().ok()?;
        hero.as_ref().map(TrailerRotation::current)
    }

    pub(crate) fn set_hero_active(&self, active: bool) {
        let Ok(mut hero) = self.hero.lock() else {
            return;
        };
        match (active, hero.is_some()) {
            (true, false) => {
                *hero = Some(TrailerRotation::start(self.config.trailer_period, &self.shell));
                debug!("trailer rotation started");
            }
            (false, true) => {
                if let Some(rotation) = hero.take() {
                    rotation.stop();
                }
                debug!("trailer rotation stopped");
            }
            _ => {}
        }
    }

    /// Tear the shell down: stop the trailer rotation and every
    /// subscription.
    pub async fn shutdown(&self) {
        self.set_hero_active(false);
        self.shell.cancel();
        self.sync.shutdown().await;
        info!("shell torn down");
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shell.cancel();
    }
}
