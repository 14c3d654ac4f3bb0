//! Demo data for a fresh store

use crate::core::error::ServiceResult;
use crate::entities::dealer::{Dealer, SubscriptionTier};
use crate::entities::vehicle::{Vehicle, VehicleStatus};
use crate::server::host::Stores;
use rust_decimal::Decimal;

const DEALERS: [(&str, &str, SubscriptionTier); 4] = [
    ("Premium Motors", "premium@example.com", SubscriptionTier::Premium),
    ("Basic Cars", "basic@example.com", SubscriptionTier::Basic),
    ("Elite Vehicles", "elite@example.com", SubscriptionTier::Premium),
    ("Standard Auto", "standard@example.com", SubscriptionTier::Basic),
];

/// (dealer index, model, price in whole units, status)
const VEHICLES: [(usize, &str, i64, VehicleStatus); 9] = [
    (0, "BMW X5", 55_000, VehicleStatus::Available),
    (0, "Mercedes C-Class", 45_000, VehicleStatus::Available),
    (0, "Audi A4", 42_000, VehicleStatus::Sold),
    (2, "Porsche 911", 85_000, VehicleStatus::Available),
    (2, "Jaguar F-Type", 65_000, VehicleStatus::Available),
    (1, "Honda Civic", 25_000, VehicleStatus::Available),
    (1, "Toyota Camry", 28_000, VehicleStatus::Sold),
    (3, "Ford Focus", 22_000, VehicleStatus::Available),
    (3, "Nissan Altima", 24_000, VehicleStatus::Available),
];

/// What [`seed_demo_data`] inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub dealers: usize,
    pub vehicles: usize,
}

/// Insert the demo dealers and vehicles unless dealers already exist
pub async fn seed_demo_data(stores: &Stores) -> ServiceResult<SeedReport> {
    if stores.dealers.count().await? > 0 {
        tracing::debug!("dealer store not empty, skipping demo data");
        return Ok(SeedReport::default());
    }

    let mut dealers = Vec::with_capacity(DEALERS.len());
    for (name, email, tier) in DEALERS {
        dealers.push(stores.dealers.insert(Dealer::new(name, email, tier)).await?);
    }

    for (dealer, model, price, status) in VEHICLES {
        let vehicle = Vehicle::new(dealers[dealer].id, model, Decimal::new(price * 100, 2), status);
        stores.vehicles.insert(vehicle).await?;
    }

    let premium = dealers.iter().filter(|d| d.is_premium()).count();
    tracing::info!(
        premium_dealers = premium,
        basic_dealers = dealers.len() - premium,
        vehicles = VEHICLES.len(),
        "demo data initialized"
    );

    Ok(SeedReport {
        dealers: dealers.len(),
        vehicles: VEHICLES.len(),
    })
}
