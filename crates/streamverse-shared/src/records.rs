//! Append-only payment history and saved-title records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entitlement::Plan;
use crate::types::{FavoriteId, PaymentId, TitleId, UserId};

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Success,
    Failed,
}

/// Payment document body, before the store assigns it a key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub owner_id: UserId,
    pub plan: String,
    pub amount: u32,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub transaction_id: u64,
}

impl NewPayment {
    /// A successful simulated charge for `plan`.
    pub fn success(owner_id: UserId, plan: Plan, transaction_id: u64) -> Self {
        Self {
            owner_id,
            plan: plan.name().to_string(),
            amount: plan.price(),
            status: PaymentStatus::Success,
            created_at: Utc::now(),
            transaction_id,
        }
    }
}

/// A stored payment history entry. Never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: PaymentId,
    #[serde(flatten)]
    pub payment: NewPayment,
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

/// Favorite document body, before the store assigns it a key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewFavorite {
    pub title_id: TitleId,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: FavoriteId,
    #[serde(flatten)]
    pub favorite: NewFavorite,
}

impl Favorite {
    pub fn title_id(&self) -> TitleId {
        self.favorite.title_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premium_payment_amount() {
        let p = NewPayment::success(UserId::from("u1"), Plan::Premium, 42);
        assert_eq!(p.amount, 2999);
        assert_eq!(p.plan, "Premium");
        assert_eq!(p.status, PaymentStatus::Success);
    }

    #[test]
    fn payment_status_serializes_as_word() {
        let json = serde_json::to_string(&PaymentStatus::Success).unwrap();
        assert_eq!(json, "\"Success\"");
    }

    #[test]
    fn favorite_uses_canonical_field_names() {
        let fav = NewFavorite {
            title_id: 550,
            title: "Fight Club".into(),
            poster_path: Some("/a.jpg".into()),
            owner_id: UserId::from("u1"),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&fav).unwrap();
        assert_eq!(value["titleId"], 550);
        assert_eq!(value["ownerId"], "u1");
        assert_eq!(value["posterPath"], "/a.jpg");
    }
}
