use streamverse_shared::PaymentRecord;

use super::require_uid;
use crate::error::Result;
use crate::state::App;

/// Payment history of the signed-in user, newest first.
pub async fn history(app: &App) -> Result<Vec<PaymentRecord>> {
    let uid = require_uid(app)?;
    Ok(app.backend().list_payments(&uid).await?)
}

/// One row of the billing table.
pub fn row(record: &PaymentRecord) -> [String; 5] {
    let p = &record.payment;
    [
        p.created_at.format("%Y-%m-%d").to_string(),
        p.plan.clone(),
        format!("₦{}", p.amount),
        format!("{:?}", p.status),
        p.transaction_id.to_string(),
    ]
}
