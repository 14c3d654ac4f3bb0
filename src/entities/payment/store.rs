//! Payment store port
//!
//! Besides plain CRUD, settlement needs two things from storage: a scan of
//! stale PENDING payments and a conditional status write that is atomic with
//! respect to every other write on the same record.

use super::model::{Payment, PaymentStatus};
use crate::core::store::{RecordStore, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Result of [`PaymentStore::compare_and_set_status`]
#[derive(Debug, Clone, PartialEq)]
pub enum StatusWrite {
    /// The expected status matched; the updated record is returned
    Applied(Payment),

    /// The record holds another status, which is left untouched
    Rejected(PaymentStatus),

    /// No record with this id
    Missing,
}

#[async_trait]
pub trait PaymentStore: RecordStore<Payment> {
    async fn find_by_transaction_id(&self, transaction_id: &str) -> StoreResult<Option<Payment>>;

    /// PENDING payments with `created_at <= cutoff`, oldest first
    async fn pending_created_before(&self, cutoff: DateTime<Utc>) -> StoreResult<Vec<Payment>>;

    /// Set `status = next, updated_at = at WHERE status = expected`
    ///
    /// Must be a single atomic operation: two concurrent calls with the same
    /// `expected` can never both be applied.
    async fn compare_and_set_status(
        &self,
        id: &Uuid,
        expected: PaymentStatus,
        next: PaymentStatus,
        at: DateTime<Utc>,
    ) -> StoreResult<StatusWrite>;

    /// Unconditionally set the status, returning the previous status and the
    /// updated record; `None` when the payment does not exist
    async fn force_status(
        &self,
        id: &Uuid,
        next: PaymentStatus,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<(PaymentStatus, Payment)>>;
}
