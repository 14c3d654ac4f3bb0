//! Payment CRUD rules
//!
//! Creation and status changes go through the [`SettlementEngine`]; this
//! service adds the read side and administrative deletion.

use super::model::{Payment, PaymentRequest, PaymentStatus, PaymentView};
use super::store::PaymentStore;
use crate::core::entity::Entity;
use crate::core::error::{ServiceError, ServiceResult};
use crate::core::events::{DomainEvent, EventBus};
use crate::core::store::RecordStore;
use crate::entities::dealer::Dealer;
use crate::settlement::SettlementEngine;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Optional filters of `list`
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub dealer_id: Option<Uuid>,
    pub status: Option<PaymentStatus>,
}

pub struct PaymentService {
    store: Arc<dyn PaymentStore>,
    dealers: Arc<dyn RecordStore<Dealer>>,
    engine: Arc<SettlementEngine>,
    events: EventBus,
}

impl PaymentService {
    pub fn new(
        store: Arc<dyn PaymentStore>,
        dealers: Arc<dyn RecordStore<Dealer>>,
        engine: Arc<SettlementEngine>,
        events: EventBus,
    ) -> Self {
        Self {
            store,
            dealers,
            engine,
            events,
        }
    }

    /// Create a PENDING payment and arm its settlement
    pub async fn create(&self, request: PaymentRequest) -> ServiceResult<PaymentView> {
        let payment = self
            .engine
            .initiate(request.dealer_id, request.amount, request.method)
            .await?;
        self.view(payment).await
    }

    pub async fn get(&self, id: &Uuid) -> ServiceResult<PaymentView> {
        let payment = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("payment", id))?;
        self.view(payment).await
    }

    pub async fn find_by_transaction_id(&self, transaction_id: &str) -> ServiceResult<PaymentView> {
        let payment = self
            .store
            .find_by_transaction_id(transaction_id.trim())
            .await?
            .ok_or_else(|| ServiceError::not_found("payment", transaction_id))?;
        self.view(payment).await
    }

    pub async fn list(&self, filter: PaymentFilter) -> ServiceResult<Vec<PaymentView>> {
        let payments = match (filter.dealer_id, filter.status) {
            (Some(dealer_id), _) => self.store.search("dealer_id", &dealer_id.to_string()).await?,
            (None, Some(status)) => self.store.search("status", status.as_str()).await?,
            (None, None) => self.store.list().await?,
        };
        let payments = payments
            .into_iter()
            .filter(|p| filter.status.is_none_or(|status| p.status == status))
            .collect();
        self.enrich(payments).await
    }

    /// Administrative status change to SUCCESS or FAILED
    pub async fn update_status(&self, id: &Uuid, status: PaymentStatus) -> ServiceResult<PaymentView> {
        let payment = self.engine.override_status(id, status).await?;
        self.view(payment).await
    }

    /// Administrative cleanup; settlement never deletes payments
    pub async fn delete(&self, id: &Uuid) -> ServiceResult<()> {
        if !self.store.delete(id).await? {
            return Err(ServiceError::not_found("payment", id));
        }
        tracing::info!(payment_id = %id, "payment deleted");
        self.events
            .publish(DomainEvent::deleted(Payment::resource_name_singular(), *id));
        Ok(())
    }

    async fn view(&self, payment: Payment) -> ServiceResult<PaymentView> {
        let dealer = self.dealers.get(&payment.dealer_id).await?;
        Ok(PaymentView::new(payment, dealer.as_ref()))
    }

    async fn enrich(&self, payments: Vec<Payment>) -> ServiceResult<Vec<PaymentView>> {
        let dealers: HashMap<Uuid, Dealer> = self
            .dealers
            .list()
            .await?
            .into_iter()
            .map(|dealer| (dealer.id, dealer))
            .collect();

        Ok(payments
            .into_iter()
            .map(|payment| {
                let dealer = dealers.get(&payment.dealer_id);
                PaymentView::new(payment, dealer)
            })
            .collect())
    }
}
