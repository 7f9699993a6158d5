//! Session/entitlement synchronizer.
//!
//! One task per shell observes the identity provider's session.  On every
//! sign-in it reads the user's profile once and arms a single live
//! subscription on the user's entitlement document; on sign-out it cancels
//! that subscription before clearing the view.  The resulting [`ShellView`]
//! is published on a `watch` channel that every page reads.

use std::sync::{Arc, Mutex};

use streamverse_shared::{Access, Entitlement, Profile, Session, UserId};
use streamverse_store::LiveDocument;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backend::DocumentBackend;
use crate::identity::IdentityProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Anonymous,
    Authenticating,
    Authenticated,
}

/// What the shell knows about the signed-in user.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellView {
    phase: Phase,
    session: Option<Session>,
    profile: Option<Profile>,
    access: Access,
}

impl ShellView {
    pub fn anonymous() -> Self {
        Self {
            phase: Phase::Anonymous,
            session: None,
            profile: None,
            access: Access::none(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn uid(&self) -> Option<&UserId> {
        self.session.as_ref().map(|s| &s.uid)
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn has_active_access(&self) -> bool {
        self.access.has_active_access()
    }

    pub fn plan_label(&self) -> Option<&str> {
        self.access.plan_label()
    }
}

/// Handle on the running synchronizer.
pub struct SessionSync {
    view_rx: watch::Receiver<ShellView>,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SessionSync {
    /// Spawn the synchronizer.  It stops when `shell` is cancelled or
    /// [`SessionSync::shutdown`] is called.
    pub fn start(
        identity: &dyn IdentityProvider,
        backend: Arc<dyn DocumentBackend>,
        shell: &CancellationToken,
    ) -> Self {
        let (view_tx, view_rx) = watch::channel(ShellView::anonymous());
        let cancel = shell.child_token();

        let task = SyncTask {
            backend,
            view_tx,
            cancel: cancel.clone(),
            session: None,
            armed: None,
        };
        let handle = tokio::spawn(task.run(identity.observe_session()));

        Self {
            view_rx,
            cancel,
            task: Mutex::new(Some(handle)),
        }
    }

    /// Snapshot of the current view.
    pub fn view(&self) -> ShellView {
        self.view_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ShellView> {
        self.view_rx.clone()
    }

    /// Wait until the view reflects `uid` (or the anonymous state for
    /// `None`) and is no longer authenticating.
    pub async fn synced_with(&self, uid: Option<&UserId>) -> ShellView {
        let mut rx = self.view_rx.clone();
        let settled = rx
            .wait_for(|v| v.uid() == uid && v.phase != Phase::Authenticating)
            .await
            .map(|v| v.clone());
        match settled {
            Ok(view) => view,
            // The task has exited; its last view stays readable.
            Err(_) => rx.borrow().clone(),
        }
    }

    /// Cancel every subscription and wait for the task to finish.  The view
    /// is left anonymous.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let handle = self.task.lock().ok().and_then(|mut task| task.take());
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "session sync task failed");
            }
        }
    }
}

impl Drop for SessionSync {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// The one live entitlement subscription.  `cancel` is a child of the shell
/// token.
struct EntitlementWatch {
    uid: UserId,
    live: LiveDocument<Entitlement>,
    cancel: CancellationToken,
}

enum Event {
    Shutdown,
    SessionChanged,
    IdentityGone,
    Snapshot(Option<Entitlement>),
    WatchClosed,
    WatchCancelled,
}

enum Arming {
    Done,
    /// The provider reported another session before the reads finished.
    Superseded,
    /// Shell cancelled or identity provider gone.
    Abandoned,
}

struct SyncTask {
    backend: Arc<dyn DocumentBackend>,
    view_tx: watch::Sender<ShellView>,
    cancel: CancellationToken,
    session: Option<Session>,
    armed: Option<EntitlementWatch>,
}

impl SyncTask {
    async fn run(mut self, mut sessions: watch::Receiver<Option<Session>>) {
        let initial = sessions.borrow_and_update().clone();
        self.apply_session(initial, &mut sessions).await;

        loop {
            let event = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Event::Shutdown,
                changed = sessions.changed() => match changed {
                    Ok(()) => Event::SessionChanged,
                    Err(_) => Event::IdentityGone,
                },
                event = next_snapshot(&mut self.armed) => event,
            };

            match event {
                Event::Shutdown => {
                    self.teardown();
                    break;
                }
                Event::SessionChanged => {
                    let next = sessions.borrow_and_update().clone();
                    self.apply_session(next, &mut sessions).await;
                }
                Event::IdentityGone => {
                    warn!("identity provider closed; treating as signed out");
                    self.teardown();
                    break;
                }
                Event::Snapshot(doc) => {
                    let access = Access::from_entitlement(doc.as_ref());
                    debug!(
                        active = access.has_active_access(),
                        plan = access.plan_label(),
                        "entitlement snapshot"
                    );
                    self.view_tx.send_if_modified(|view| {
                        if view.access == access {
                            return false;
                        }
                        view.access = access;
                        true
                    });
                }
                Event::WatchClosed => {
                    warn!("entitlement subscription closed; access revoked");
                    self.armed = None;
                    self.view_tx.send_modify(|view| view.access = Access::none());
                }
                Event::WatchCancelled => {
                    self.armed = None;
                }
            }
        }

        debug!("session sync stopped");
    }

    async fn apply_session(
        &mut self,
        next: Option<Session>,
        sessions: &mut watch::Receiver<Option<Session>>,
    ) {
        let previous = self.session.as_ref().map(|s| s.uid.clone());
        let next_uid = next.as_ref().map(|s| s.uid.clone());

        if previous == next_uid {
            // Same identity; keep the subscription and refresh provider fields.
            if let Some(session) = next {
                self.session = Some(session.clone());
                self.view_tx.send_if_modified(|view| {
                    if view.session.as_ref() == Some(&session) {
                        return false;
                    }
                    view.session = Some(session);
                    true
                });
            }
            return;
        }

        if previous.is_some() {
            self.teardown();
        }

        let mut next = next;
        while let Some(session) = next.take() {
            let uid = session.uid.clone();
            match self.arm(session, sessions).await {
                Arming::Done => {}
                Arming::Superseded => {
                    debug!(uid = %uid.short(), "session changed while synchronising");
                    next = sessions.borrow_and_update().clone();
                    if next.as_ref().map(|s| &s.uid) != Some(&uid) {
                        self.teardown();
                    }
                }
                Arming::Abandoned => self.teardown(),
            }
        }
    }

    /// Session start: profile read, then the entitlement subscription.  Both
    /// reads are dropped if the session changes or the shell is cancelled
    /// before they finish.
    async fn arm(
        &mut self,
        session: Session,
        sessions: &mut watch::Receiver<Option<Session>>,
    ) -> Arming {
        self.session = Some(session.clone());
        self.view_tx.send_replace(ShellView {
            phase: Phase::Authenticating,
            session: Some(session.clone()),
            profile: None,
            access: Access::none(),
        });

        let backend = Arc::clone(&self.backend);
        let uid = session.uid.clone();
        let reads = async move {
            let stored = backend.read_profile(&uid).await;
            let live = backend.watch_entitlement(&uid).await;
            (stored, live)
        };

        let (stored, live) = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Arming::Abandoned,
            changed = sessions.changed() => {
                return match changed {
                    Ok(()) => Arming::Superseded,
                    Err(_) => Arming::Abandoned,
                };
            }
            reads = reads => reads,
        };

        let stored = match stored {
            Ok(profile) => profile,
            Err(e) => {
                warn!(uid = %session.uid.short(), error = %e, "profile read failed; using fallback");
                None
            }
        };
        let profile = Profile::resolve(stored, &session);

        let access = match live {
            Ok(mut live) => {
                let first = live.current();
                self.armed = Some(EntitlementWatch {
                    uid: session.uid.clone(),
                    live,
                    cancel: self.cancel.child_token(),
                });
                Access::from_entitlement(first.as_ref())
            }
            Err(e) => {
                warn!(uid = %session.uid.short(), error = %e, "entitlement subscription failed");
                Access::none()
            }
        };

        info!(
            uid = %session.uid.short(),
            active = access.has_active_access(),
            "session synchronised"
        );
        self.view_tx.send_replace(ShellView {
            phase: Phase::Authenticated,
            session: Some(session),
            profile: Some(profile),
            access,
        });
        Arming::Done
    }

    /// Session end: cancel the subscription, then clear the view.
    fn teardown(&mut self) {
        if let Some(armed) = self.armed.take() {
            armed.cancel.cancel();
            debug!(uid = %armed.uid.short(), "entitlement subscription cancelled");
        }
        self.session = None;
        self.view_tx.send_replace(ShellView::anonymous());
    }
}

async fn next_snapshot(armed: &mut Option<EntitlementWatch>) -> Event {
    let Some(armed) = armed else {
        return std::future::pending().await;
    };

    tokio::select! {
        biased;
        _ = armed.cancel.cancelled() => Event::WatchCancelled,
        next = armed.live.changed() => match next {
            Some(doc) => Event::Snapshot(doc),
            None => Event::WatchClosed,
        },
    }
}
