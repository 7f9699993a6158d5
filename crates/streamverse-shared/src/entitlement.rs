//! Subscription entitlement records and the access view derived from them.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{BASIC_PRICE, PREMIUM_PRICE};

/// Purchasable subscription plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Plan {
    Basic,
    Premium,
}

impl Plan {
    pub const ALL: [Plan; 2] = [Plan::Basic, Plan::Premium];

    pub fn name(&self) -> &'static str {
        match self {
            Plan::Basic => "Basic",
            Plan::Premium => "Premium",
        }
    }

    /// Monthly price charged by the simulated checkout.
    pub fn price(&self) -> u32 {
        match self {
            Plan::Basic => BASIC_PRICE,
            Plan::Premium => PREMIUM_PRICE,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Plan::Basic => "Free access to limited movies.",
            Plan::Premium => "Unlock all movies, shows & exclusive content.",
        }
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Plan::Basic),
            "premium" => Ok(Plan::Premium),
            other => Err(format!("unknown plan: {other}")),
        }
    }
}

// Stored under the user's uid; overwritten by every completed purchase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub active: bool,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl Entitlement {
    /// Active one-month entitlement starting at `start`.
    pub fn monthly(plan: Plan, start: DateTime<Utc>) -> Self {
        let end = start
            .checked_add_months(Months::new(1))
            .unwrap_or(start);

        Self {
            plan: Some(plan.name().to_string()),
            active: true,
            start_date: start,
            end_date: end,
        }
    }
}

/// The only entitlement-derived state views are allowed to read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Access {
    has_active_access: bool,
    plan_label: Option<String>,
}

impl Access {
    pub fn none() -> Self {
        Self::default()
    }

    /// `exists(doc) && doc.active`; the plan label is only exposed while
    /// access is active.
    pub fn from_entitlement(doc: Option<&Entitlement>) -> Self {
        match doc {
            Some(e) if e.active => Self {
                has_active_access: true,
                plan_label: e.plan.clone(),
            },
            _ => Self::none(),
        }
    }

    pub fn has_active_access(&self) -> bool {
        self.has_active_access
    }

    pub fn plan_label(&self) -> Option<&str> {
        self.plan_label.as_deref()
    }
}
