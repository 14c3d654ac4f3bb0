//! Entity descriptor for Vehicle

use super::handlers::{
    VehicleAppState, create_vehicle, delete_vehicle, get_vehicle, list_premium_dealer_vehicles,
    list_vehicles, list_vehicles_by_dealer, list_vehicles_by_status, search_vehicles,
    update_vehicle,
};
use super::service::VehicleService;
use crate::server::entity_registry::EntityDescriptor;
use axum::{Router, routing::get};
use std::sync::Arc;

/// Descriptor for the Vehicle entity
pub struct VehicleDescriptor {
    pub service: Arc<VehicleService>,
}

impl VehicleDescriptor {
    pub fn new(service: Arc<VehicleService>) -> Self {
        Self { service }
    }
}

impl EntityDescriptor for VehicleDescriptor {
    fn entity_type(&self) -> &str {
        "vehicle"
    }

    fn plural(&self) -> &str {
        "vehicles"
    }

    fn build_routes(&self) -> Router {
        let state = VehicleAppState {
            service: self.service.clone(),
        };

        Router::new()
            .route("/vehicles", get(list_vehicles).post(create_vehicle))
            .route(
                "/vehicles/{id}",
                get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
            )
            .route("/vehicles/dealer/{dealer_id}", get(list_vehicles_by_dealer))
            .route("/vehicles/status/{status}", get(list_vehicles_by_status))
            .route("/vehicles/premium-dealers", get(list_premium_dealer_vehicles))
            .route("/vehicles/search", get(search_vehicles))
            .with_state(state)
    }
}
