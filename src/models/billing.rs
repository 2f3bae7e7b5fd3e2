// src/models/billing.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A subscription tier. The catalog is fixed; there is no plan management.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    pub price: f64,
    pub features: &'static [&'static str],
    pub popular: bool,
}

pub const PLANS: [Plan; 3] = [
    Plan {
        id: "basic",
        name: "Basic Plan",
        price: 9.99,
        features: &[
            "Basic Dashboard Access",
            "Email Support",
            "Standard Features",
            "Monthly Reports",
        ],
        popular: false,
    },
    Plan {
        id: "premium",
        name: "Premium Plan",
        price: 19.99,
        features: &[
            "Advanced Dashboard",
            "Priority Chat Support",
            "All Premium Features",
            "Weekly Reports",
            "API Access",
            "Custom Integrations",
        ],
        popular: true,
    },
    Plan {
        id: "enterprise",
        name: "Enterprise Plan",
        price: 49.99,
        features: &[
            "Full Enterprise Access",
            "Dedicated Support",
            "Custom Solutions",
            "Daily Reports",
            "Advanced Analytics",
            "Team Management",
        ],
        popular: false,
    },
];

pub fn find_plan(id: &str) -> Option<&'static Plan> {
    PLANS.iter().find(|p| p.id == id)
}

/// The active subscription, stored under 'userSubscription'.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub plan: String,
    pub plan_name: String,
    pub amount: f64,
    pub start_date: DateTime<Utc>,
    /// Thirty days after the start date.
    pub end_date: DateTime<Utc>,
    /// "TXN" followed by the millisecond timestamp of completion.
    pub transaction_id: String,
}

/// DTO for the mock checkout. Card fields are accepted and discarded; no
/// payment processor is involved.
#[derive(Debug, Deserialize, Validate)]
pub struct SubscribeRequest {
    #[validate(length(min = 1))]
    pub plan: String,
    #[validate(length(min = 1))]
    pub card_number: String,
    #[validate(length(min = 1))]
    pub expiry: String,
    #[validate(length(min = 1))]
    pub cvv: String,
    #[validate(length(min = 1))]
    pub name: String,
}
