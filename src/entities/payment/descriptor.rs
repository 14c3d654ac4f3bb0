//! Entity descriptor for Payment

use super::handlers::{
    PaymentAppState, create_payment, delete_payment, get_payment, get_payment_by_transaction,
    list_payments, list_payments_by_dealer, list_payments_by_status, update_payment_status,
};
use super::service::PaymentService;
use crate::server::entity_registry::EntityDescriptor;
use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

/// Descriptor for the Payment entity
pub struct PaymentDescriptor {
    pub service: Arc<PaymentService>,
}

impl PaymentDescriptor {
    pub fn new(service: Arc<PaymentService>) -> Self {
        Self { service }
    }
}

impl EntityDescriptor for PaymentDescriptor {
    fn entity_type(&self) -> &str {
        "payment"
    }

    fn plural(&self) -> &str {
        "payments"
    }

    fn build_routes(&self) -> Router {
        let state = PaymentAppState {
            service: self.service.clone(),
        };

        Router::new()
            .route("/payments", get(list_payments).post(create_payment))
            .route("/payments/{id}", get(get_payment).delete(delete_payment))
            .route("/payments/{id}/status", put(update_payment_status))
            .route("/payments/dealer/{dealer_id}", get(list_payments_by_dealer))
            .route("/payments/status/{status}", get(list_payments_by_status))
            .route(
                "/payments/transaction/{transaction_id}",
                get(get_payment_by_transaction),
            )
            .with_state(state)
    }
}
