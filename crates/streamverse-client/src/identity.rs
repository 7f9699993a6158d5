//! Identity provider port and the local implementation backed by the
//! store's account tables.
//!
//! The provider owns the session.  Everything else observes it through
//! [`IdentityProvider::observe_session`].

use argon2::password_hash::SaltString;
use argon2::{Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::OsRng;
use streamverse_shared::constants::MIN_PASSWORD_LEN;
use streamverse_shared::{AuthError, Session, UserId};
use streamverse_store::{Account, Store, StoreError};
use tokio::sync::watch;
use tracing::{debug, info};

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new account and sign it in.
    async fn create_account(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;

    fn current_session(&self) -> Option<Session>;

    /// Session changes, starting from the current one.
    fn observe_session(&self) -> watch::Receiver<Option<Session>>;
}

/// Accounts with argon2id password hashes in the local store.  The signed-in
/// account is persisted so a restarted client resumes its session.
pub struct LocalIdentityProvider {
    store: Store,
    hasher: Argon2<'static>,
    session_tx: watch::Sender<Option<Session>>,
}

impl LocalIdentityProvider {
    pub fn new(store: Store) -> Result<Self, StoreError> {
        Self::with_hasher(store, Argon2::default())
    }

    /// Use custom argon2 cost parameters.
    pub fn with_params(store: Store, params: Params) -> Result<Self, StoreError> {
        Self::with_hasher(
            store,
            Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
        )
    }

    fn with_hasher(store: Store, hasher: Argon2<'static>) -> Result<Self, StoreError> {
        let resumed = store
            .read(|db| db.current_session_account())?
            .map(|account| session_for(&account));

        if let Some(session) = &resumed {
            info!(uid = %session.uid.short(), "resumed stored session");
        }

        let (session_tx, _) = watch::channel(resumed);
        Ok(Self {
            store,
            hasher,
            session_tx,
        })
    }

    fn start_session(&self, account: &Account) -> Result<Session, AuthError> {
        self.store
            .write(&[], |db| db.set_current_session(Some(&account.uid)))
            .map_err(provider_error)?;

        let session = session_for(account);
        self.session_tx.send_replace(Some(session.clone()));
        Ok(session)
    }

    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            hasher
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| AuthError::Provider(format!("hash error: {e}")))
        })
        .await
        .map_err(|e| AuthError::Provider(format!("hash task failed: {e}")))?
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&hash)
                .map_err(|e| AuthError::Provider(format!("invalid hash format: {e}")))?;
            match hasher.verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(argon2::password_hash::Error::Password) => Ok(false),
                Err(e) => Err(AuthError::Provider(format!("verify error: {e}"))),
            }
        })
        .await
        .map_err(|e| AuthError::Provider(format!("verify task failed: {e}")))?
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn create_account(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = normalise_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let account = Account {
            uid: UserId::new(),
            email,
            password_hash: self.hash_password(password).await?,
            display_name: None,
            created_at: Utc::now(),
        };

        self.store
            .write(&[], |db| db.create_account(&account))
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::EmailAlreadyInUse,
                other => provider_error(other),
            })?;

        info!(uid = %account.uid.short(), "account created");
        self.start_session(&account)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = normalise_email(email)?;
        let account = self
            .store
            .read(|db| db.get_account_by_email(&email))
            .map_err(provider_error)?
            .ok_or(AuthError::UserNotFound)?;

        if !self.verify_password(password, &account.password_hash).await? {
            debug!(uid = %account.uid.short(), "password rejected");
            return Err(AuthError::WrongPassword);
        }

        info!(uid = %account.uid.short(), "signed in");
        self.start_session(&account)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.store
            .write(&[], |db| db.set_current_session(None))
            .map_err(provider_error)?;

        if let Some(previous) = self.session_tx.send_replace(None) {
            info!(uid = %previous.uid.short(), "signed out");
        }
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let email = normalise_email(email)?;
        let exists = self
            .store
            .read(|db| db.get_account_by_email(&email))
            .map_err(provider_error)?
            .is_some();
        if !exists {
            return Err(AuthError::UserNotFound);
        }

        let request_id = self
            .store
            .write(&[], |db| db.record_password_reset(&email))
            .map_err(provider_error)?;

        info!(%request_id, "password reset link queued");
        Ok(())
    }

    fn current_session(&self) -> Option<Session> {
        self.session_tx.borrow().clone()
    }

    fn observe_session(&self) -> watch::Receiver<Option<Session>> {
        self.session_tx.subscribe()
    }
}

fn session_for(account: &Account) -> Session {
    Session {
        uid: account.uid.clone(),
        email: Some(account.email.clone()),
        display_name: account.display_name.clone(),
    }
}

fn provider_error(e: StoreError) -> AuthError {
    AuthError::Provider(e.to_string())
}

/// Trim, lowercase and sanity-check an email address.
pub fn normalise_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    let (local, domain) = email.split_once('@').ok_or(AuthError::InvalidEmail)?;

    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@');
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(AuthError::InvalidEmail);
    }
    Ok(email)
}
