//! Server host holding the wired application state
//!
//! The host is the single owner of stores, services, the settlement engine
//! and the event bus. The REST layer and the lifecycle code in
//! [`ServerBuilder`](super::ServerBuilder) only borrow from it.

use crate::config::AppConfig;
use crate::core::auth::JwtAuthProvider;
use crate::core::events::EventBus;
use crate::core::store::RecordStore;
use crate::entities::dealer::{Dealer, DealerDescriptor, DealerService};
use crate::entities::payment::{PaymentDescriptor, PaymentService, PaymentStore};
use crate::entities::vehicle::{Vehicle, VehicleDescriptor, VehicleService};
use crate::server::entity_registry::EntityRegistry;
use crate::settlement::{OutcomeDecider, Scheduler, SettlementEngine, SettlementPolicy};
use std::sync::Arc;

/// Storage handles injected into the services
#[derive(Clone)]
pub struct Stores {
    pub dealers: Arc<dyn RecordStore<Dealer>>,
    pub vehicles: Arc<dyn RecordStore<Vehicle>>,
    pub payments: Arc<dyn PaymentStore>,
}

/// Host context containing all application state
pub struct ServerHost {
    pub config: Arc<AppConfig>,
    pub stores: Stores,
    pub dealers: Arc<DealerService>,
    pub vehicles: Arc<VehicleService>,
    pub payments: Arc<PaymentService>,
    pub engine: Arc<SettlementEngine>,
    pub auth: Arc<JwtAuthProvider>,
    pub event_bus: EventBus,

    /// Entity registry for CRUD routes
    pub entity_registry: EntityRegistry,
}

impl ServerHost {
    /// Wire services and the engine on top of the given stores
    ///
    /// Does not start any timer.
    pub fn from_components(
        config: AppConfig,
        stores: Stores,
        decider: Arc<dyn OutcomeDecider>,
        scheduler: Arc<dyn Scheduler>,
        event_bus: EventBus,
    ) -> Self {
        let engine = Arc::new(SettlementEngine::new(
            stores.payments.clone(),
            stores.dealers.clone(),
            decider,
            scheduler,
            event_bus.clone(),
            SettlementPolicy::from(&config.settlement),
        ));

        let dealers = Arc::new(DealerService::new(
            stores.dealers.clone(),
            stores.vehicles.clone(),
            event_bus.clone(),
        ));
        let vehicles = Arc::new(VehicleService::new(
            stores.vehicles.clone(),
            stores.dealers.clone(),
            event_bus.clone(),
        ));
        let payments = Arc::new(PaymentService::new(
            stores.payments.clone(),
            stores.dealers.clone(),
            engine.clone(),
            event_bus.clone(),
        ));

        let mut entity_registry = EntityRegistry::new();
        entity_registry.register(Box::new(DealerDescriptor::new(dealers.clone())));
        entity_registry.register(Box::new(VehicleDescriptor::new(vehicles.clone())));
        entity_registry.register(Box::new(PaymentDescriptor::new(payments.clone())));

        Self {
            auth: Arc::new(JwtAuthProvider::new(&config.auth)),
            config: Arc::new(config),
            stores,
            dealers,
            vehicles,
            payments,
            engine,
            event_bus,
            entity_registry,
        }
    }

    /// Get entity types registered in the host
    pub fn entity_types(&self) -> Vec<&str> {
        self.entity_registry.entity_types()
    }
}
