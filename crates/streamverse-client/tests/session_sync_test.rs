mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use chrono::Utc;
use common::{fast_identity, Harness, PASSWORD};
use streamverse_client::backend::entitlement_key;
use streamverse_client::{DocumentBackend, IdentityProvider, Phase};
use streamverse_shared::{Entitlement, NewPayment, Plan, Profile};
use streamverse_store::Store;

#[tokio::test]
async fn anonymous_shell_has_no_access() {
    let h = Harness::new();
    let view = h.synced(None).await;

    assert_eq!(view.phase(), Phase::Anonymous);
    assert!(!view.has_active_access());
    assert_eq!(view.plan_label(), None);
    assert!(view.profile().is_none());
}

#[tokio::test]
async fn switching_users_keeps_a_single_entitlement_subscription() {
    let h = Harness::new();

    let ada = h.sign_up("ada@example.com").await;
    h.store
        .write(&[entitlement_key(&ada.uid)], |db| {
            db.put_entitlement(&ada.uid, &Entitlement::monthly(Plan::Premium, Utc::now()))
        })
        .unwrap();
    let view = h.wait_for_view(|v| v.has_active_access()).await;
    assert_eq!(view.plan_label(), Some("Premium"));
    assert_eq!(h.live_entitlements(&ada.uid), 1);

    h.sign_out().await;
    assert_eq!(h.live_entitlements(&ada.uid), 0);
    assert!(!h.app.view().has_active_access());

    let bob = h.sign_up("bob@example.com").await;
    let view = h.app.view();
    assert_eq!(view.uid(), Some(&bob.uid));
    assert_eq!(view.phase(), Phase::Authenticated);
    assert!(!view.has_active_access());
    assert_eq!(view.plan_label(), None);

    assert_eq!(h.live_entitlements(&ada.uid), 0);
    assert_eq!(h.live_entitlements(&bob.uid), 1);
    assert_eq!(h.backend.max_live_entitlements(), 1);

    // Back to the first identity: only its entitlement is reflected.
    h.sign_out().await;
    h.sign_in("ada@example.com").await;
    let view = h.app.view();
    assert_eq!(view.plan_label(), Some("Premium"));
    assert_eq!(h.live_entitlements(&bob.uid), 0);
    assert_eq!(h.backend.max_live_entitlements(), 1);
}

#[tokio::test]
async fn direct_switch_between_identities_tears_down_first() {
    let h = Harness::new();
    let ada = h.sign_up("ada@example.com").await;

    // Signing in as someone else without signing out.
    let bob = h.sign_up("bob@example.com").await;
    assert_eq!(h.app.view().uid(), Some(&bob.uid));
    assert_eq!(h.live_entitlements(&ada.uid), 0);
    assert_eq!(h.live_entitlements(&bob.uid), 1);
    assert_eq!(h.backend.max_live_entitlements(), 1);
}

#[tokio::test]
async fn purchase_updates_view_in_place() {
    let h = Harness::new();
    let ada = h.sign_up("ada@example.com").await;
    assert!(!h.app.view().has_active_access());

    h.backend
        .commit_purchase(
            &ada.uid,
            &Entitlement::monthly(Plan::Basic, Utc::now()),
            NewPayment::success(ada.uid.clone(), Plan::Basic, 7),
        )
        .await
        .unwrap();

    let view = h.wait_for_view(|v| v.has_active_access()).await;
    assert_eq!(view.plan_label(), Some("Basic"));
    assert_eq!(view.phase(), Phase::Authenticated);
}

#[tokio::test]
async fn inactive_entitlement_grants_nothing() {
    let h = Harness::new();
    let ada = h.sign_up("ada@example.com").await;

    let mut lapsed = Entitlement::monthly(Plan::Premium, Utc::now());
    lapsed.active = false;
    h.store
        .write(&[entitlement_key(&ada.uid)], |db| db.put_entitlement(&ada.uid, &lapsed))
        .unwrap();

    h.sign_out().await;
    h.sign_in("ada@example.com").await;
    let view = h.app.view();
    assert!(!view.has_active_access());
    assert_eq!(view.plan_label(), None);
}

#[tokio::test]
async fn stored_profile_is_preferred() {
    let h = Harness::new();
    let ada = h.sign_up("ada@example.com").await;
    h.backend
        .write_profile(
            &ada.uid,
            &Profile {
                name: "Ada Lovelace".into(),
                email: "ada@example.com".into(),
            },
        )
        .await
        .unwrap();

    h.sign_out().await;
    h.sign_in("ada@example.com").await;
    assert_eq!(h.app.view().profile().unwrap().name, "Ada Lovelace");
}

#[tokio::test]
async fn profile_failure_falls_back_and_still_arms() {
    let h = Harness::new();
    h.backend.fail_profile_reads.store(true, Ordering::SeqCst);

    let ada = h.sign_up("ada@example.com").await;
    let view = h.app.view();
    let profile = view.profile().unwrap();
    assert_eq!(profile.name, "User");
    assert_eq!(profile.email, "ada@example.com");
    assert_eq!(h.live_entitlements(&ada.uid), 1);
}

#[tokio::test]
async fn failed_subscription_means_no_access() {
    let h = Harness::new();
    h.backend.fail_entitlement_watch.store(true, Ordering::SeqCst);

    let ada = h.identity.create_account("ada@example.com", PASSWORD).await.unwrap();
    h.store
        .write(&[], |db| {
            db.put_entitlement(&ada.uid, &Entitlement::monthly(Plan::Premium, Utc::now()))
        })
        .unwrap();
    h.sign_out().await;

    h.sign_in("ada@example.com").await;
    let view = h.app.view();
    assert_eq!(view.phase(), Phase::Authenticated);
    assert!(!view.has_active_access());
    assert_eq!(h.live_entitlements(&ada.uid), 0);
}

#[tokio::test]
async fn closed_subscription_revokes_access() {
    let h = Harness::new();
    let ada = h.sign_up("ada@example.com").await;
    h.backend
        .commit_purchase(
            &ada.uid,
            &Entitlement::monthly(Plan::Premium, Utc::now()),
            NewPayment::success(ada.uid.clone(), Plan::Premium, 1),
        )
        .await
        .unwrap();
    h.wait_for_view(|v| v.has_active_access()).await;

    h.store.close_subscriptions();
    let view = h.wait_for_view(|v| !v.has_active_access()).await;
    assert_eq!(view.plan_label(), None);
    assert_eq!(view.uid(), Some(&ada.uid));
}

#[tokio::test]
async fn shutdown_releases_everything() {
    let h = Harness::new();
    let ada = h.sign_up("ada@example.com").await;
    assert_eq!(h.live_entitlements(&ada.uid), 1);

    h.app.shutdown().await;
    assert_eq!(h.app.view().phase(), Phase::Anonymous);
    assert!(h.app.view().profile().is_none());
    assert_eq!(h.live_entitlements(&ada.uid), 0);
}

#[tokio::test]
async fn stored_session_is_resumed() {
    let store = Store::open_in_memory().unwrap();
    let ada = fast_identity(store.clone())
        .create_account("ada@example.com", PASSWORD)
        .await
        .unwrap();

    let h = Harness::over(store);
    let view = h.synced(Some(&ada.uid)).await;
    assert_eq!(view.phase(), Phase::Authenticated);
    assert_eq!(view.session().unwrap().email.as_deref(), Some("ada@example.com"));
}

#[tokio::test]
async fn sign_out_during_a_slow_profile_read_clears_the_view() {
    let h = Harness::new();
    h.backend.profile_delay_ms.store(300, Ordering::SeqCst);

    let ada = h.identity.create_account("ada@example.com", PASSWORD).await.unwrap();
    h.wait_for_view(|v| v.phase() == Phase::Authenticating).await;
    h.identity.sign_out().await.unwrap();

    // Settles long before the profile read would have finished.
    let view = tokio::time::timeout(Duration::from_millis(200), h.app.sync().synced_with(None))
        .await
        .expect("sign-out was not reflected while the profile read was pending");
    assert_eq!(view.phase(), Phase::Anonymous);
    assert!(view.uid().is_none());
    assert!(!view.has_active_access());
    assert_eq!(h.live_entitlements(&ada.uid), 0);
    assert_eq!(h.backend.max_live_entitlements(), 0);

    h.backend.profile_delay_ms.store(0, Ordering::SeqCst);
    let again = h.sign_in("ada@example.com").await;
    assert_eq!(again.uid, ada.uid);
    assert_eq!(h.app.view().phase(), Phase::Authenticated);
    assert_eq!(h.live_entitlements(&ada.uid), 1);
}
