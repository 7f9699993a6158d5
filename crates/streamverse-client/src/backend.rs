//! Document store port.  The client reads and writes user documents only
//! through [`DocumentBackend`]; [`Store`] is the local implementation.

use async_trait::async_trait;
use streamverse_shared::constants::{COLLECTION_ENTITLEMENTS, COLLECTION_PROFILES};
use streamverse_shared::{
    Entitlement, Favorite, FavoriteId, NewFavorite, NewPayment, PaymentRecord, Profile, TitleId,
    UserId,
};
use streamverse_store::{DocKey, LiveDocument, Store};

use crate::error::BackendError;

pub type BackendResult<T> = std::result::Result<T, BackendError>;

#[async_trait]
pub trait DocumentBackend: Send + Sync {
    // -- Profiles --

    async fn read_profile(&self, uid: &UserId) -> BackendResult<Option<Profile>>;

    async fn write_profile(&self, uid: &UserId, profile: &Profile) -> BackendResult<()>;

    // -- Entitlements --

    async fn read_entitlement(&self, uid: &UserId) -> BackendResult<Option<Entitlement>>;

    /// Live subscription on the user's entitlement document, seeded with
    /// its current snapshot.  Dropping the handle unsubscribes.
    async fn watch_entitlement(&self, uid: &UserId) -> BackendResult<LiveDocument<Entitlement>>;

    /// Write the entitlement and append the payment record atomically.
    async fn commit_purchase(
        &self,
        uid: &UserId,
        entitlement: &Entitlement,
        payment: NewPayment,
    ) -> BackendResult<PaymentRecord>;

    /// Payment history, newest first.
    async fn list_payments(&self, uid: &UserId) -> BackendResult<Vec<PaymentRecord>>;

    // -- Favorites --

    async fn add_favorite(&self, favorite: NewFavorite) -> BackendResult<Favorite>;

    async fn list_favorites(&self, owner: &UserId) -> BackendResult<Vec<Favorite>>;

    async fn find_favorites(&self, owner: &UserId, title_id: TitleId)
        -> BackendResult<Vec<Favorite>>;

    /// Delete by key.  `Ok(false)` when it was already gone.
    async fn remove_favorite(&self, id: &FavoriteId) -> BackendResult<bool>;
}

pub fn profile_key(uid: &UserId) -> DocKey {
    DocKey::new(COLLECTION_PROFILES, uid.as_str())
}

pub fn entitlement_key(uid: &UserId) -> DocKey {
    DocKey::new(COLLECTION_ENTITLEMENTS, uid.as_str())
}

#[async_trait]
impl DocumentBackend for Store {
    async fn read_profile(&self, uid: &UserId) -> BackendResult<Option<Profile>> {
        Ok(self.read(|db| db.get_profile(uid))?)
    }

    async fn write_profile(&self, uid: &UserId, profile: &Profile) -> BackendResult<()> {
        Ok(self.write(&[profile_key(uid)], |db| db.put_profile(uid, profile))?)
    }

    async fn read_entitlement(&self, uid: &UserId) -> BackendResult<Option<Entitlement>> {
        Ok(self.read(|db| db.get_entitlement(uid))?)
    }

    async fn watch_entitlement(&self, uid: &UserId) -> BackendResult<LiveDocument<Entitlement>> {
        Ok(self.watch(entitlement_key(uid))?)
    }

    async fn commit_purchase(
        &self,
        uid: &UserId,
        entitlement: &Entitlement,
        payment: NewPayment,
    ) -> BackendResult<PaymentRecord> {
        Ok(self.write(&[entitlement_key(uid)], |db| {
            db.commit_purchase(uid, entitlement, payment)
        })?)
    }

    async fn list_payments(&self, uid: &UserId) -> BackendResult<Vec<PaymentRecord>> {
        Ok(self.read(|db| db.list_payments(uid))?)
    }

    async fn add_favorite(&self, favorite: NewFavorite) -> BackendResult<Favorite> {
        Ok(self.write(&[], |db| db.add_favorite(favorite))?)
    }

    async fn list_favorites(&self, owner: &UserId) -> BackendResult<Vec<Favorite>> {
        Ok(self.read(|db| db.list_favorites(owner))?)
    }

    async fn find_favorites(
        &self,
        owner: &UserId,
        title_id: TitleId,
    ) -> BackendResult<Vec<Favorite>> {
        Ok(self.read(|db| db.find_favorites(owner, title_id))?)
    }

    async fn remove_favorite(&self, id: &FavoriteId) -> BackendResult<bool> {
        Ok(self.write(&[], |db| db.remove_favorite(id))?)
    }
}
