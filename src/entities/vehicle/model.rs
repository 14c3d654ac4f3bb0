//! Vehicle entity model

use crate::core::validation::{not_blank, positive_decimal};
use crate::entities::dealer::Dealer;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Inventory status of a vehicle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    #[default]
    Available,
    Sold,
}

crate::impl_wire_enum!(VehicleStatus, "vehicle status", {
    Available => "AVAILABLE",
    Sold => "SOLD",
});

/// A vehicle listed by a dealer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub dealer_id: Uuid,
    pub model: String,
    pub price: Decimal,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

crate::impl_entity!(
    Vehicle,
    "vehicle",
    "vehicles",
    unique: [],
    fields: [dealer_id, model, price, status]
);

impl Vehicle {
    pub fn new(
        dealer_id: Uuid,
        model: impl Into<String>,
        price: Decimal,
        status: VehicleStatus,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            dealer_id,
            model: model.into().trim().to_string(),
            price,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive substring match on the model name
    pub fn model_contains(&self, fragment: &str) -> bool {
        self.model
            .to_lowercase()
            .contains(&fragment.trim().to_lowercase())
    }
}

/// Body of `POST /vehicles` and `PUT /vehicles/{id}`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRequest {
    pub dealer_id: Uuid,

    #[validate(custom(function = "not_blank"), length(max = 100))]
    pub model: String,

    #[validate(custom(function = "positive_decimal"))]
    pub price: Decimal,

    #[serde(default)]
    pub status: VehicleStatus,
}

/// A vehicle as returned by the API, joined with its dealer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleView {
    #[serde(flatten)]
    pub vehicle: Vehicle,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dealer_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dealer_email: Option<String>,
}

impl VehicleView {
    pub fn new(vehicle: Vehicle, dealer: Option<&Dealer>) -> Self {
        Self {
            vehicle,
            dealer_name: dealer.map(|d| d.name.clone()),
            dealer_email: dealer.map(|d| d.email.clone()),
        }
    }
}
