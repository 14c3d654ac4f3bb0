//! Vehicle CRUD rules

use super::model::{Vehicle, VehicleRequest, VehicleStatus, VehicleView};
use crate::core::entity::Entity;
use crate::core::error::{ServiceError, ServiceResult};
use crate::core::events::{DomainEvent, EventBus};
use crate::core::store::RecordStore;
use crate::entities::dealer::{Dealer, SubscriptionTier};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// Optional filters of `list`
#[derive(Debug, Clone, Default)]
pub struct VehicleFilter {
    pub dealer_id: Option<Uuid>,
    pub status: Option<VehicleStatus>,
}

/// Vehicle operations on top of the injected stores
pub struct VehicleService {
    store: Arc<dyn RecordStore<Vehicle>>,
    dealers: Arc<dyn RecordStore<Dealer>>,
    events: EventBus,
}

impl VehicleService {
    pub fn new(
        store: Arc<dyn RecordStore<Vehicle>>,
        dealers: Arc<dyn RecordStore<Dealer>>,
        events: EventBus,
    ) -> Self {
        Self {
            store,
            dealers,
            events,
        }
    }

    /// Create a vehicle for an existing dealer
    ///
    /// A missing dealer is reported as `NotFound` for the dealer.
    pub async fn create(&self, request: VehicleRequest) -> ServiceResult<VehicleView> {
        let dealer = self.require_dealer(&request.dealer_id).await?;

        let vehicle = Vehicle::new(
            request.dealer_id,
            request.model,
            request.price,
            request.status,
        );
        let vehicle = self.store.insert(vehicle).await?;

        tracing::info!(vehicle_id = %vehicle.id, dealer_id = %vehicle.dealer_id, "vehicle created");
        self.events
            .publish(DomainEvent::created(Vehicle::resource_name_singular(), vehicle.id));
        Ok(VehicleView::new(vehicle, Some(&dealer)))
    }

    pub async fn get(&self, id: &Uuid) -> ServiceResult<VehicleView> {
        let vehicle = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("vehicle", id))?;
        let dealer = self.dealers.get(&vehicle.dealer_id).await?;
        Ok(VehicleView::new(vehicle, dealer.as_ref()))
    }

    pub async fn list(&self, filter: VehicleFilter) -> ServiceResult<Vec<VehicleView>> {
        let vehicles = match filter.dealer_id {
            Some(dealer_id) => self.store.search("dealer_id", &dealer_id.to_string()).await?,
            None => self.store.list().await?,
        };
        let vehicles = vehicles
            .into_iter()
            .filter(|v| filter.status.is_none_or(|status| v.status == status))
            .collect();
        self.enrich(vehicles).await
    }

    /// Vehicles whose dealer is on the PREMIUM tier
    pub async fn premium_dealers(&self) -> ServiceResult<Vec<VehicleView>> {
        let premium: HashSet<Uuid> = self
            .dealers
            .search("subscription_tier", SubscriptionTier::Premium.as_str())
            .await?
            .into_iter()
            .map(|dealer| dealer.id)
            .collect();

        let vehicles = self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|v| premium.contains(&v.dealer_id))
            .collect();
        self.enrich(vehicles).await
    }

    pub async fn search_by_model(&self, fragment: &str) -> ServiceResult<Vec<VehicleView>> {
        let vehicles = self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|v| v.model_contains(fragment))
            .collect();
        self.enrich(vehicles).await
    }

    /// Replace a vehicle; the dealer is re-checked only when it changes
    pub async fn update(&self, id: &Uuid, request: VehicleRequest) -> ServiceResult<VehicleView> {
        let mut vehicle = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("vehicle", id))?;

        if vehicle.dealer_id != request.dealer_id {
            self.require_dealer(&request.dealer_id)
                .await
                .map_err(ServiceError::into_bad_reference)?;
        }

        vehicle.dealer_id = request.dealer_id;
        vehicle.model = request.model.trim().to_string();
        vehicle.price = request.price;
        vehicle.status = request.status;
        vehicle.touch();

        let vehicle = self.store.update(vehicle).await?;
        self.events
            .publish(DomainEvent::updated(Vehicle::resource_name_singular(), vehicle.id));

        let dealer = self.dealers.get(&vehicle.dealer_id).await?;
        Ok(VehicleView::new(vehicle, dealer.as_ref()))
    }

    pub async fn delete(&self, id: &Uuid) -> ServiceResult<()> {
        if !self.store.delete(id).await? {
            return Err(ServiceError::not_found("vehicle", id));
        }
        self.events
            .publish(DomainEvent::deleted(Vehicle::resource_name_singular(), *id));
        Ok(())
    }

    async fn require_dealer(&self, dealer_id: &Uuid) -> ServiceResult<Dealer> {
        self.dealers
            .get(dealer_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("dealer", dealer_id))
    }

    async fn enrich(&self, vehicles: Vec<Vehicle>) -> ServiceResult<Vec<VehicleView>> {
        let dealers: HashMap<Uuid, Dealer> = self
            .dealers
            .list()
            .await?
            .into_iter()
            .map(|dealer| (dealer.id, dealer))
            .collect();

        Ok(vehicles
            .into_iter()
            .map(|vehicle| {
                let dealer = dealers.get(&vehicle.dealer_id);
                VehicleView::new(vehicle, dealer)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct Fixture {
        service: VehicleService,
        premium: Dealer,
        basic: Dealer,
    }

    async fn fixture() -> Fixture {
        let dealers = Arc::new(InMemoryStore::<Dealer>::new());
        let premium = dealers
            .insert(Dealer::new("Premium Motors", "premium@example.com", SubscriptionTier::Premium))
            .await
            .unwrap();
        let basic = dealers
            .insert(Dealer::new("Basic Cars", "basic@example.com", SubscriptionTier::Basic))
            .await
            .unwrap();

        let service = VehicleService::new(
            Arc::new(InMemoryStore::<Vehicle>::new()),
            dealers,
            EventBus::default(),
        );
        Fixture {
            service,
            premium,
            basic,
        }
    }

    fn request(dealer_id: Uuid, model: &str, price: Decimal, status: VehicleStatus) -> VehicleRequest {
        VehicleRequest {
            dealer_id,
            model: model.to_string(),
            price,
            status,
        }
    }

    #[tokio::test]
    async fn test_create_requires_existing_dealer() {
        let f = fixture().await;
        let err = f
            .service
            .create(request(Uuid::new_v4(), "BMW X5", dec!(55000), VehicleStatus::Available))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "dealer", .. }));
    }

    #[tokio::test]
    async fn test_create_returns_enriched_view() {
        let f = fixture().await;
        let view = f
            .service
            .create(request(f.premium.id, "BMW X5", dec!(55000), VehicleStatus::Available))
            .await
            .unwrap();
        assert_eq!(view.dealer_name.as_deref(), Some("Premium Motors"));
        assert_eq!(view.dealer_email.as_deref(), Some("premium@example.com"));
    }

    #[tokio::test]
    async fn test_filters_and_queries() {
        let f = fixture().await;
        for (dealer, model, price, status) in [
            (f.premium.id, "BMW X5", dec!(55000), VehicleStatus::Available),
            (f.premium.id, "Audi A4", dec!(42000), VehicleStatus::Sold),
            (f.basic.id, "Honda Civic", dec!(25000), VehicleStatus::Available),
        ] {
            f.service.create(request(dealer, model, price, status)).await.unwrap();
        }

        let by_dealer = f
            .service
            .list(VehicleFilter {
                dealer_id: Some(f.premium.id),
                status: None,
            })
            .await
            .unwrap();
        assert_eq!(by_dealer.len(), 2);

        let sold = f
            .service
            .list(VehicleFilter {
                dealer_id: None,
                status: Some(VehicleStatus::Sold),
            })
            .await
            .unwrap();
        assert_eq!(sold.len(), 1);
        assert_eq!(sold[0].vehicle.model, "Audi A4");

        let premium = f.service.premium_dealers().await.unwrap();
        assert_eq!(premium.len(), 2);
        assert!(premium.iter().all(|v| v.vehicle.dealer_id == f.premium.id));

        let civic = f.service.search_by_model("civ").await.unwrap();
        assert_eq!(civic.len(), 1);
        assert_eq!(civic[0].dealer_name.as_deref(), Some("Basic Cars"));
    }

    #[tokio::test]
    async fn test_update_moves_vehicle_to_other_dealer() {
        let f = fixture().await;
        let created = f
            .service
            .create(request(f.premium.id, "Mercedes C-Class", dec!(45000), VehicleStatus::Available))
            .await
            .unwrap();

        let moved = f
            .service
            .update(
                &created.vehicle.id,
                request(f.basic.id, "Mercedes C-Class", dec!(43000), VehicleStatus::Sold),
            )
            .await
            .unwrap();
        assert_eq!(moved.vehicle.dealer_id, f.basic.id);
        assert_eq!(moved.vehicle.status, VehicleStatus::Sold);
        assert_eq!(moved.dealer_name.as_deref(), Some("Basic Cars"));

        let err = f
            .service
            .update(
                &created.vehicle.id,
                request(Uuid::new_v4(), "Mercedes C-Class", dec!(43000), VehicleStatus::Sold),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_vehicle() {
        let f = fixture().await;
        let err = f.service.delete(&Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "vehicle", .. }));
    }
}
