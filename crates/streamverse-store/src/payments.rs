//! `payments` collection and the atomic purchase commit.

use streamverse_shared::constants::COLLECTION_PAYMENTS;
use streamverse_shared::{Entitlement, NewPayment, PaymentId, PaymentRecord, UserId};

use crate::database::Database;
use crate::documents::{self, Query};
use crate::entitlements;
use crate::error::Result;

impl Database {
    /// Write the entitlement and append the payment record in one
    /// transaction.  Either both documents exist afterwards or neither
    /// changed.
    pub fn commit_purchase(
        &mut self,
        uid: &UserId,
        entitlement: &Entitlement,
        payment: NewPayment,
    ) -> Result<PaymentRecord> {
        let id = PaymentId::new();
        let body = serde_json::to_value(&payment)?;

        let tx = self.conn_mut().transaction()?;
        entitlements::put(&tx, uid, entitlement)?;
        documents::insert(&tx, COLLECTION_PAYMENTS, id.as_str(), &body)?;
        tx.commit()?;

        tracing::info!(
            uid = %uid.short(),
            plan = %payment.plan,
            amount = payment.amount,
            transaction_id = payment.transaction_id,
            "purchase committed"
        );

        Ok(PaymentRecord { id, payment })
    }

    /// Payment history for `uid`, most recent first.
    pub fn list_payments(&self, uid: &UserId) -> Result<Vec<PaymentRecord>> {
        let docs = self.query_documents(
            COLLECTION_PAYMENTS,
            &Query::new().where_eq("ownerId", uid.as_str()).newest_first(),
        )?;

        let mut payments = Vec::with_capacity(docs.len());
        for (key, body) in docs {
            payments.push(PaymentRecord {
                id: PaymentId(key),
                payment: serde_json::from_value(body)?,
            });
        }
        Ok(payments)
    }
}
