//! Internal event system
//!
//! The EventBus uses `tokio::sync::broadcast` to decouple mutations (CRUD
//! services, settlement engine) from whoever wants to observe them (audit
//! logging, tests counting settlements).
//!
//! # Architecture
//!
//! ```text
//! CRUD services ─────┐
//!                    ├──▶ EventBus::publish() ──▶ broadcast channel ──▶ subscribers
//! SettlementEngine ──┘
//! ```

use crate::entities::payment::PaymentStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events related to entity mutations (create, update, delete)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EntityEvent {
    Created {
        entity_type: String,
        entity_id: Uuid,
    },
    Updated {
        entity_type: String,
        entity_id: Uuid,
    },
    Deleted {
        entity_type: String,
        entity_id: Uuid,
    },
}

/// Which trigger performed a settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementPath {
    /// The one-shot completion armed at creation
    Delayed,
    /// The periodic reconciliation sweep
    Sweep,
    /// An explicit call to `complete_if_pending`
    Direct,
}

/// Events related to payment status transitions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PaymentEvent {
    /// A PENDING payment reached a terminal status
    Settled {
        payment_id: Uuid,
        transaction_id: String,
        status: PaymentStatus,
        path: SettlementPath,
    },
    /// An operator forced a status
    StatusOverridden {
        payment_id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
    },
}

/// Top-level event that wraps entity and payment events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainEvent {
    Entity(EntityEvent),
    Payment(PaymentEvent),
}

impl DomainEvent {
    pub fn created(entity_type: &str, entity_id: Uuid) -> Self {
        DomainEvent::Entity(EntityEvent::Created {
            entity_type: entity_type.to_string(),
            entity_id,
        })
    }

    pub fn updated(entity_type: &str, entity_id: Uuid) -> Self {
        DomainEvent::Entity(EntityEvent::Updated {
            entity_type: entity_type.to_string(),
            entity_id,
        })
    }

    pub fn deleted(entity_type: &str, entity_id: Uuid) -> Self {
        DomainEvent::Entity(EntityEvent::Deleted {
            entity_type: entity_type.to_string(),
            entity_id,
        })
    }

    /// Get the id of the record this event relates to
    pub fn entity_id(&self) -> Uuid {
        match self {
            DomainEvent::Entity(e) => match e {
                EntityEvent::Created { entity_id, .. }
                | EntityEvent::Updated { entity_id, .. }
                | EntityEvent::Deleted { entity_id, .. } => *entity_id,
            },
            DomainEvent::Payment(p) => match p {
                PaymentEvent::Settled { payment_id, .. }
                | PaymentEvent::StatusOverridden { payment_id, .. } => *payment_id,
            },
        }
    }

    /// Get the action name
    pub fn action(&self) -> &str {
        match self {
            DomainEvent::Entity(e) => match e {
                EntityEvent::Created { .. } => "created",
                EntityEvent::Updated { .. } => "updated",
                EntityEvent::Deleted { .. } => "deleted",
            },
            DomainEvent::Payment(p) => match p {
                PaymentEvent::Settled { .. } => "settled",
                PaymentEvent::StatusOverridden { .. } => "status_overridden",
            },
        }
    }
}

/// Envelope wrapping an event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: DomainEvent,
}

impl EventEnvelope {
    pub fn new(event: DomainEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone (the sender is reference counted) and shared by every
/// service of a host.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// The capacity determines how many events can be buffered before
    /// slow receivers start losing events (lagged).
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Never fails. Without subscribers the event is dropped.
    /// Returns the number of receivers that will receive the event.
    pub fn publish(&self, event: DomainEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_event_serialization() {
        let event = DomainEvent::created("dealer", Uuid::new_v4());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "entity");
        assert_eq!(json["action"], "created");
        assert_eq!(json["entity_type"], "dealer");
    }

    #[test]
    fn test_payment_event_serialization() {
        let event = DomainEvent::Payment(PaymentEvent::Settled {
            payment_id: Uuid::new_v4(),
            transaction_id: "TXN1".to_string(),
            status: PaymentStatus::Success,
            path: SettlementPath::Sweep,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "payment");
        assert_eq!(json["action"], "settled");
        assert_eq!(json["status"], "SUCCESS");
        assert_eq!(json["path"], "sweep");
    }

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        let entity_id = Uuid::new_v4();
        assert_eq!(bus.publish(DomainEvent::deleted("vehicle", entity_id)), 1);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event.entity_id(), entity_id);
        assert_eq!(received.event.action(), "deleted");
    }

    #[tokio::test]
    async fn test_event_bus_multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);

        bus.publish(DomainEvent::updated("dealer", Uuid::new_v4()));

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert_eq!(e1.id, e2.id);
    }

    #[test]
    fn test_event_bus_publish_without_subscribers() {
        let bus = EventBus::default();
        assert_eq!(bus.publish(DomainEvent::created("payment", Uuid::new_v4())), 0);
    }
}
