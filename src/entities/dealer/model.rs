//! Dealer entity model

use crate::core::validation::not_blank;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Subscription plan of a dealer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionTier {
    Basic,
    Premium,
}

crate::impl_wire_enum!(SubscriptionTier, "subscription tier", {
    Basic => "BASIC",
    Premium => "PREMIUM",
});

/// A dealer owning vehicles and paying for a subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dealer {
    pub id: Uuid,
    pub name: String,
    /// Stored trimmed and lowercased; unique across dealers
    pub email: String,
    pub subscription_tier: SubscriptionTier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

crate::impl_entity!(
    Dealer,
    "dealer",
    "dealers",
    unique: ["email"],
    fields: [name, email, subscription_tier]
);

impl Dealer {
    pub fn new(name: impl Into<String>, email: &str, subscription_tier: SubscriptionTier) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into().trim().to_string(),
            email: normalize_email(email),
            subscription_tier,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_premium(&self) -> bool {
        self.subscription_tier == SubscriptionTier::Premium
    }
}

/// Canonical form under which emails are stored and looked up
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Body of `POST /dealers` and `PUT /dealers/{id}`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DealerRequest {
    #[validate(custom(function = "not_blank"), length(max = 100))]
    pub name: String,

    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    pub subscription_tier: SubscriptionTier,
}
