//! Dealer CRUD rules

use super::model::{Dealer, DealerRequest, SubscriptionTier, normalize_email};
use crate::core::entity::Entity;
use crate::core::error::{ServiceError, ServiceResult};
use crate::core::events::{DomainEvent, EventBus};
use crate::core::store::RecordStore;
use crate::entities::vehicle::Vehicle;
use std::sync::Arc;
use uuid::Uuid;

/// Dealer operations on top of the injected stores
pub struct DealerService {
    store: Arc<dyn RecordStore<Dealer>>,
    vehicles: Arc<dyn RecordStore<Vehicle>>,
    events: EventBus,
}

impl DealerService {
    pub fn new(
        store: Arc<dyn RecordStore<Dealer>>,
        vehicles: Arc<dyn RecordStore<Vehicle>>,
        events: EventBus,
    ) -> Self {
        Self {
            store,
            vehicles,
            events,
        }
    }

    pub async fn create(&self, request: DealerRequest) -> ServiceResult<Dealer> {
        let dealer = Dealer::new(request.name, &request.email, request.subscription_tier);
        self.ensure_email_free(&dealer.email, None).await?;

        let dealer = self.store.insert(dealer).await?;
        tracing::info!(dealer_id = %dealer.id, email = %dealer.email, "dealer created");
        self.events
            .publish(DomainEvent::created(Dealer::resource_name_singular(), dealer.id));
        Ok(dealer)
    }

    pub async fn get(&self, id: &Uuid) -> ServiceResult<Dealer> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("dealer", id))
    }

    /// All dealers, optionally restricted to one tier
    pub async fn list(&self, tier: Option<SubscriptionTier>) -> ServiceResult<Vec<Dealer>> {
        let dealers = match tier {
            Some(tier) => self.store.search("subscription_tier", tier.as_str()).await?,
            None => self.store.list().await?,
        };
        Ok(dealers)
    }

    pub async fn find_by_email(&self, email: &str) -> ServiceResult<Dealer> {
        let email = normalize_email(email);
        self.store
            .search("email", &email)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::not_found("dealer", email))
    }

    pub async fn update(&self, id: &Uuid, request: DealerRequest) -> ServiceResult<Dealer> {
        let mut dealer = self.get(id).await?;

        let email = normalize_email(&request.email);
        if email != dealer.email {
            self.ensure_email_free(&email, Some(*id)).await?;
        }

        dealer.name = request.name.trim().to_string();
        dealer.email = email;
        dealer.subscription_tier = request.subscription_tier;
        dealer.touch();

        let dealer = self.store.update(dealer).await?;
        self.events
            .publish(DomainEvent::updated(Dealer::resource_name_singular(), dealer.id));
        Ok(dealer)
    }

    /// Delete a dealer together with its vehicles
    ///
    /// Payments keep their `dealer_id`; they are financial records.
    pub async fn delete(&self, id: &Uuid) -> ServiceResult<()> {
        if !self.store.exists(id).await? {
            return Err(ServiceError::not_found("dealer", id));
        }

        let vehicles = self.vehicles.search("dealer_id", &id.to_string()).await?;
        for vehicle in &vehicles {
            if self.vehicles.delete(&vehicle.id).await? {
                self.events.publish(DomainEvent::deleted(
                    Vehicle::resource_name_singular(),
                    vehicle.id,
                ));
            }
        }

        self.store.delete(id).await?;
        tracing::info!(dealer_id = %id, vehicles = vehicles.len(), "dealer deleted");
        self.events
            .publish(DomainEvent::deleted(Dealer::resource_name_singular(), *id));
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<Uuid>) -> ServiceResult<()> {
        let taken = self
            .store
            .search("email", email)
            .await?
            .into_iter()
            .any(|existing| Some(existing.id) != owner);

        if taken {
            return Err(ServiceError::invalid(format!("Email already exists: {email}")));
        }
        Ok(())
    }
}
