//! In-memory record store for development and tests
//!
//! One `RwLock` guards each table together with its unique indexes, so every
//! single-record write (including the conditional status write used by
//! settlement) is atomic.

use crate::core::entity::Entity;
use crate::core::store::{RecordStore, StoreError, StoreResult};
use crate::entities::payment::{Payment, PaymentStatus, PaymentStore, StatusWrite};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

struct Table<T> {
    records: HashMap<Uuid, T>,
    /// (field, canonical value) -> owning record
    unique: HashMap<(&'static str, String), Uuid>,
}

impl<T: Entity> Table<T> {
    fn unique_keys(record: &T) -> Vec<(&'static str, String)> {
        T::unique_fields()
            .iter()
            .filter_map(|field| {
                record
                    .field_value(field)
                    .filter(|value| !value.is_null())
                    .map(|value| (*field, value.to_key()))
            })
            .collect()
    }

    fn check_unique(&self, record: &T) -> StoreResult<()> {
        for key in Self::unique_keys(record) {
            if self.unique.get(&key).is_some_and(|owner| *owner != record.id()) {
                return Err(StoreError::UniqueViolation {
                    entity: T::resource_name_singular(),
                    field: key.0,
                    value: key.1,
                });
            }
        }
        Ok(())
    }

    fn index(&mut self, record: &T) {
        for key in Self::unique_keys(record) {
            self.unique.insert(key, record.id());
        }
    }

    fn unindex(&mut self, record: &T) {
        for key in Self::unique_keys(record) {
            self.unique.remove(&key);
        }
    }
}

fn oldest_first<T: Entity>(mut records: Vec<T>) -> Vec<T> {
    records.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(&b.id()))
    });
    records
}

/// Thread-safe in-memory [`RecordStore`]
///
/// Cheap to clone; clones share the same table.
pub struct InMemoryStore<T: Entity> {
    table: Arc<RwLock<Table<T>>>,
}

impl<T: Entity> Clone for InMemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<T: Entity> InMemoryStore<T> {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(Table {
                records: HashMap::new(),
                unique: HashMap::new(),
            })),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Table<T>>> {
        self.table
            .read()
            .map_err(|e| StoreError::Backend(format!("Failed to acquire read lock: {e}")))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Table<T>>> {
        self.table
            .write()
            .map_err(|e| StoreError::Backend(format!("Failed to acquire write lock: {e}")))
    }
}

impl<T: Entity> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> RecordStore<T> for InMemoryStore<T> {
    async fn insert(&self, record: T) -> StoreResult<T> {
        let mut table = self.write()?;

        if table.records.contains_key(&record.id()) {
            return Err(StoreError::AlreadyExists {
                entity: T::resource_name_singular(),
                id: record.id(),
            });
        }
        table.check_unique(&record)?;

        table.index(&record);
        table.records.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn get(&self, id: &Uuid) -> StoreResult<Option<T>> {
        Ok(self.read()?.records.get(id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<T>> {
        let table = self.read()?;
        Ok(oldest_first(table.records.values().cloned().collect()))
    }

    async fn update(&self, record: T) -> StoreResult<T> {
        let mut table = self.write()?;

        let Some(previous) = table.records.get(&record.id()).cloned() else {
            return Err(StoreError::NotFound {
                entity: T::resource_name_singular(),
                id: record.id(),
            });
        };
        table.check_unique(&record)?;

        table.unindex(&previous);
        table.index(&record);
        table.records.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn delete(&self, id: &Uuid) -> StoreResult<bool> {
        let mut table = self.write()?;

        match table.records.remove(id) {
            Some(previous) => {
                table.unindex(&previous);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn search(&self, field: &str, value: &str) -> StoreResult<Vec<T>> {
        let table = self.read()?;
        let matches = table
            .records
            .values()
            .filter(|record| {
                record
                    .field_value(field)
                    .is_some_and(|candidate| candidate.matches(value))
            })
            .cloned()
            .collect();
        Ok(oldest_first(matches))
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.read()?.records.len())
    }
}

#[async_trait]
impl PaymentStore for InMemoryStore<Payment> {
    async fn find_by_transaction_id(&self, transaction_id: &str) -> StoreResult<Option<Payment>> {
        let table = self.read()?;
        let owner = table
            .unique
            .get(&("transaction_id", transaction_id.to_string()))
            .copied();
        Ok(owner.and_then(|id| table.records.get(&id).cloned()))
    }

    async fn pending_created_before(&self, cutoff: DateTime<Utc>) -> StoreResult<Vec<Payment>> {
        let table = self.read()?;
        let stale = table
            .records
            .values()
            .filter(|p| p.status == PaymentStatus::Pending && p.created_at <= cutoff)
            .cloned()
            .collect();
        Ok(oldest_first(stale))
    }

    async fn compare_and_set_status(
        &self,
        id: &Uuid,
        expected: PaymentStatus,
        next: PaymentStatus,
        at: DateTime<Utc>,
    ) -> StoreResult<StatusWrite> {
        let mut table = self.write()?;

        let Some(payment) = table.records.get_mut(id) else {
            return Ok(StatusWrite::Missing);
        };
        if payment.status != expected {
            return Ok(StatusWrite::Rejected(payment.status));
        }

        payment.status = next;
        payment.updated_at = at;
        Ok(StatusWrite::Applied(payment.clone()))
    }

    async fn force_status(
        &self,
        id: &Uuid,
        next: PaymentStatus,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<(PaymentStatus, Payment)>> {
        let mut table = self.write()?;

        Ok(table.records.get_mut(id).map(|payment| {
            let previous = payment.status;
            payment.status = next;
            payment.updated_at = at;
            (previous, payment.clone())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::dealer::{Dealer, SubscriptionTier};
    use crate::entities::payment::PaymentMethod;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn payment() -> Payment {
        Payment::pending(Uuid::new_v4(), dec!(100.00), PaymentMethod::Card)
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = InMemoryStore::<Payment>::new();
        let created = store.insert(payment()).await.unwrap();

        let fetched = store.get(&created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_fails() {
        let store = InMemoryStore::<Payment>::new();
        let record = store.insert(payment()).await.unwrap();

        let err = store.insert(record).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_transaction_id_is_rejected() {
        let store = InMemoryStore::<Payment>::new();
        let first = store.insert(payment()).await.unwrap();

        let mut copy = payment();
        copy.transaction_id = first.transaction_id.clone();
        let err = store.insert(copy).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::UniqueViolation {
                field: "transaction_id",
                ..
            }
        ));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unique_index_follows_updates_and_deletes() {
        let store = InMemoryStore::<Dealer>::new();
        let mut dealer = store
            .insert(Dealer::new("Premium Motors", "premium@example.com", SubscriptionTier::Premium))
            .await
            .unwrap();

        dealer.email = "motors@example.com".to_string();
        store.update(dealer.clone()).await.unwrap();

        // The old email is free again
        store
            .insert(Dealer::new("Other", "premium@example.com", SubscriptionTier::Basic))
            .await
            .unwrap();

        assert!(store.delete(&dealer.id).await.unwrap());
        assert!(!store.delete(&dealer.id).await.unwrap());
        store
            .insert(Dealer::new("Third", "motors@example.com", SubscriptionTier::Basic))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let store = InMemoryStore::<Payment>::new();
        let err = store.update(payment()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_search_and_list_order() {
        let store = InMemoryStore::<Payment>::new();
        let dealer_id = Uuid::new_v4();

        let mut older = Payment::pending(dealer_id, dec!(10), PaymentMethod::Upi);
        older.created_at = Utc::now() - Duration::minutes(5);
        let newer = Payment::pending(dealer_id, dec!(20), PaymentMethod::Card);
        store.insert(newer.clone()).await.unwrap();
        store.insert(older.clone()).await.unwrap();
        store.insert(payment()).await.unwrap();

        let found = store.search("dealer_id", &dealer_id.to_string()).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, older.id);

        assert_eq!(store.search("amount", "20.0").await.unwrap().len(), 1);
        assert_eq!(store.list().await.unwrap()[0].id, older.id);
    }

    #[tokio::test]
    async fn test_find_by_transaction_id() {
        let store = InMemoryStore::<Payment>::new();
        let created = store.insert(payment()).await.unwrap();

        let found = store
            .find_by_transaction_id(&created.transaction_id)
            .await
            .unwrap();
        assert_eq!(found.map(|p| p.id), Some(created.id));
        assert!(store.find_by_transaction_id("TXN0-00000000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pending_created_before() {
        let store = InMemoryStore::<Payment>::new();
        let mut stale = payment();
        stale.created_at = Utc::now() - Duration::seconds(60);
        let stale = store.insert(stale).await.unwrap();
        store.insert(payment()).await.unwrap();

        let mut settled = payment();
        settled.created_at = Utc::now() - Duration::seconds(60);
        settled.status = PaymentStatus::Success;
        store.insert(settled).await.unwrap();

        let found = store
            .pending_created_before(Utc::now() - Duration::seconds(30))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, stale.id);
    }

    #[tokio::test]
    async fn test_compare_and_set_applies_once() {
        let store = InMemoryStore::<Payment>::new();
        let created = store.insert(payment()).await.unwrap();
        let at = Utc::now();

        let first = store
            .compare_and_set_status(&created.id, PaymentStatus::Pending, PaymentStatus::Success, at)
            .await
            .unwrap();
        let StatusWrite::Applied(updated) = first else {
            panic!("expected the first write to apply");
        };
        assert_eq!(updated.status, PaymentStatus::Success);
        assert_eq!(updated.updated_at, at);
        assert_eq!(updated.created_at, created.created_at);

        let second = store
            .compare_and_set_status(&created.id, PaymentStatus::Pending, PaymentStatus::Failed, at)
            .await
            .unwrap();
        assert_eq!(second, StatusWrite::Rejected(PaymentStatus::Success));

        let missing = store
            .compare_and_set_status(&Uuid::new_v4(), PaymentStatus::Pending, PaymentStatus::Failed, at)
            .await
            .unwrap();
        assert_eq!(missing, StatusWrite::Missing);
    }

    #[tokio::test]
    async fn test_concurrent_compare_and_set_has_single_winner() {
        let store = InMemoryStore::<Payment>::new();
        let created = store.insert(payment()).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            let id = created.id;
            handles.push(tokio::spawn(async move {
                let next = if i % 2 == 0 {
                    PaymentStatus::Success
                } else {
                    PaymentStatus::Failed
                };
                store
                    .compare_and_set_status(&id, PaymentStatus::Pending, next, Utc::now())
                    .await
                    .unwrap()
            }));
        }

        let mut applied = 0;
        for handle in handles {
            if matches!(handle.await.unwrap(), StatusWrite::Applied(_)) {
                applied += 1;
            }
        }
        assert_eq!(applied, 1);
    }

    #[tokio::test]
    async fn test_force_status() {
        let store = InMemoryStore::<Payment>::new();
        let created = store.insert(payment()).await.unwrap();

        let (previous, updated) = store
            .force_status(&created.id, PaymentStatus::Failed, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(previous, PaymentStatus::Pending);
        assert_eq!(updated.status, PaymentStatus::Failed);

        let missing = store
            .force_status(&Uuid::new_v4(), PaymentStatus::Success, Utc::now())
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
