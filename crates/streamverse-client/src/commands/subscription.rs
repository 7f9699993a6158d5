//! Plan selection and the simulated checkout.

use chrono::Utc;
use rand::Rng;
use streamverse_shared::constants::TRANSACTION_ID_BOUND;
use streamverse_shared::{Entitlement, NewPayment, PaymentRecord, Plan};
use tracing::{info, warn};

use crate::events::Notice;
use crate::router::Route;
use crate::state::App;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeScreen {
    pub plans: Vec<Plan>,
    /// Label of the active plan, if any.
    pub current_plan: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PurchaseOutcome {
    pub notice: Notice,
    pub route: Option<Route>,
    pub payment: Option<PaymentRecord>,
}

pub fn screen(app: &App) -> SubscribeScreen {
    let view = app.view();
    SubscribeScreen {
        plans: Plan::ALL.to_vec(),
        current_plan: view.plan_label().map(str::to_string),
    }
}

/// Prompt shown before charging for `plan`.
pub fn confirmation(plan: Plan) -> Notice {
    Notice::info(
        format!("Confirm {plan} Plan Payment"),
        format!("Proceed to pay for {plan} plan?"),
    )
}

/// Run the checkout for `plan`.  Returns `None` when the user declines the
/// confirmation.
///
/// The entitlement and the payment record are committed together, so a
/// failed checkout leaves access unchanged.
pub async fn subscribe(
    app: &App,
    plan: Plan,
    confirm: impl FnOnce(&Notice) -> bool,
) -> Option<PurchaseOutcome> {
    let Some(session) = app.session() else {
        return Some(PurchaseOutcome {
            notice: Notice::warning("Login Required", "Please log in to subscribe."),
            route: Some(Route::Login),
            payment: None,
        });
    };

    if !confirm(&confirmation(plan)) {
        return None;
    }

    tokio::time::sleep(app.config().payment_delay).await;

    let entitlement = Entitlement::monthly(plan, Utc::now());
    let transaction_id = rand::thread_rng().gen_range(0..TRANSACTION_ID_BOUND);
    let payment = NewPayment::success(session.uid.clone(), plan, transaction_id);

    match app
        .backend()
        .commit_purchase(&session.uid, &entitlement, payment)
        .await
    {
        Ok(record) => {
            info!(uid = %session.uid.short(), %plan, "subscription purchased");
            Some(PurchaseOutcome {
                notice: Notice::success(
                    "Payment Successful!",
                    format!("You are now subscribed to the {plan} plan."),
                ),
                route: Some(Route::Home),
                payment: Some(record),
            })
        }
        Err(e) => {
            warn!(uid = %session.uid.short(), %plan, error = %e, "purchase failed");
            Some(PurchaseOutcome {
                notice: Notice::error("Payment Failed", e.to_string()),
                route: None,
                payment: None,
            })
        }
    }
}
