//! Entity descriptor for Dealer

use super::handlers::{
    DealerAppState, create_dealer, delete_dealer, get_dealer, get_dealer_by_email, list_dealers,
    list_dealers_by_tier, update_dealer,
};
use super::service::DealerService;
use crate::server::entity_registry::EntityDescriptor;
use axum::{Router, routing::get};
use std::sync::Arc;

/// Descriptor for the Dealer entity
pub struct DealerDescriptor {
    pub service: Arc<DealerService>,
}

impl DealerDescriptor {
    pub fn new(service: Arc<DealerService>) -> Self {
        Self { service }
    }
}

impl EntityDescriptor for DealerDescriptor {
    fn entity_type(&self) -> &str {
        "dealer"
    }

    fn plural(&self) -> &str {
        "dealers"
    }

    fn build_routes(&self) -> Router {
        let state = DealerAppState {
            service: self.service.clone(),
        };

        Router::new()
            .route("/dealers", get(list_dealers).post(create_dealer))
            .route(
                "/dealers/{id}",
                get(get_dealer).put(update_dealer).delete(delete_dealer),
            )
            .route("/dealers/email/{email}", get(get_dealer_by_email))
            .route("/dealers/subscription/{tier}", get(list_dealers_by_tier))
            .with_state(state)
    }
}
