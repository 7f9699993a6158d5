mod common;

use std::sync::atomic::Ordering;

use common::Harness;
use streamverse_client::commands::{billing, subscription};
use streamverse_client::{DocumentBackend, NoticeLevel, Route};
use streamverse_shared::{PaymentStatus, Plan};

#[tokio::test]
async fn premium_purchase_grants_access() {
    let h = Harness::new();
    let ada = h.sign_up("ada@example.com").await;
    assert_eq!(h.app.select_title(550), Route::Subscribe);

    let mut prompt = None;
    let outcome = subscription::subscribe(&h.app, Plan::Premium, |notice| {
        prompt = Some(notice.clone());
        true
    })
    .await
    .unwrap();

    let prompt = prompt.unwrap();
    assert_eq!(prompt.title, "Confirm Premium Plan Payment");
    assert_eq!(prompt.text, "Proceed to pay for Premium plan?");

    assert_eq!(outcome.notice.level, NoticeLevel::Success);
    assert_eq!(outcome.notice.title, "Payment Successful!");
    assert_eq!(outcome.notice.text, "You are now subscribed to the Premium plan.");
    assert_eq!(outcome.route, Some(Route::Home));

    let entitlement = h.backend.read_entitlement(&ada.uid).await.unwrap().unwrap();
    assert!(entitlement.active);
    assert_eq!(entitlement.plan.as_deref(), Some("Premium"));
    assert!(entitlement.end_date > entitlement.start_date);

    let payments = h.backend.list_payments(&ada.uid).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].payment.amount, 2999);
    assert_eq!(payments[0].payment.status, PaymentStatus::Success);
    assert!(payments[0].payment.transaction_id < 1_000_000_000);
    assert_eq!(Some(&payments[0]), outcome.payment.as_ref());

    let view = h.wait_for_view(|v| v.has_active_access()).await;
    assert_eq!(view.plan_label(), Some("Premium"));
    assert_eq!(h.app.select_title(550), Route::Movie(550));
}

#[tokio::test]
async fn declining_the_confirmation_charges_nothing() {
    let h = Harness::new();
    let ada = h.sign_up("ada@example.com").await;

    let outcome = subscription::subscribe(&h.app, Plan::Premium, |_| false).await;
    assert!(outcome.is_none());
    assert!(h.backend.list_payments(&ada.uid).await.unwrap().is_empty());
    assert!(h.backend.read_entitlement(&ada.uid).await.unwrap().is_none());
}

#[tokio::test]
async fn purchase_requires_sign_in() {
    let h = Harness::new();
    let outcome = subscription::subscribe(&h.app, Plan::Basic, |_| {
        panic!("no confirmation expected without a session")
    })
    .await
    .unwrap();

    assert_eq!(outcome.notice.level, NoticeLevel::Warning);
    assert_eq!(outcome.notice.title, "Login Required");
    assert_eq!(outcome.route, Some(Route::Login));
    assert_eq!(h.backend.calls(), 0);
}

#[tokio::test]
async fn failed_purchase_leaves_access_unchanged() {
    let h = Harness::new();
    let ada = h.sign_up("ada@example.com").await;
    h.backend.fail_purchases.store(true, Ordering::SeqCst);

    let outcome = subscription::subscribe(&h.app, Plan::Premium, |_| true)
        .await
        .unwrap();
    assert_eq!(outcome.notice.level, NoticeLevel::Error);
    assert_eq!(outcome.notice.title, "Payment Failed");
    assert_eq!(outcome.route, None);
    assert!(outcome.payment.is_none());

    assert!(h.backend.read_entitlement(&ada.uid).await.unwrap().is_none());
    assert!(h.backend.list_payments(&ada.uid).await.unwrap().is_empty());
    assert!(!h.app.view().has_active_access());
    assert_eq!(h.app.select_title(550), Route::Subscribe);
}

#[tokio::test]
async fn billing_history_is_newest_first() {
    let h = Harness::new();
    h.sign_up("ada@example.com").await;

    subscription::subscribe(&h.app, Plan::Basic, |_| true).await.unwrap();
    subscription::subscribe(&h.app, Plan::Premium, |_| true).await.unwrap();

    let history = billing::history(&h.app).await.unwrap();
    let plans: Vec<&str> = history.iter().map(|p| p.payment.plan.as_str()).collect();
    assert_eq!(plans, vec!["Premium", "Basic"]);
    assert_eq!(history[1].payment.amount, 0);

    let row = billing::row(&history[0]);
    assert_eq!(row[1], "Premium");
    assert_eq!(row[2], "₦2999");
    assert_eq!(row[3], "Success");

    let view = h.wait_for_view(|v| v.plan_label() == Some("Premium")).await;
    assert!(view.has_active_access());
    assert_eq!(subscription::screen(&h.app).current_plan.as_deref(), Some("Premium"));
}

#[tokio::test]
async fn other_users_payments_are_not_listed() {
    let h = Harness::new();
    h.sign_up("ada@example.com").await;
    subscription::subscribe(&h.app, Plan::Premium, |_| true).await.unwrap();

    h.sign_out().await;
    h.sign_up("bob@example.com").await;
    assert!(billing::history(&h.app).await.unwrap().is_empty());
}
