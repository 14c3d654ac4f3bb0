//! Record store traits
//!
//! The services and the settlement engine only see these traits; the
//! persistence technology behind them is an injected collaborator.

use crate::core::entity::Entity;
use async_trait::async_trait;
use uuid::Uuid;

/// Errors raised by a record store backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A record with the same id is already stored
    #[error("{entity} with id '{id}' already exists")]
    AlreadyExists { entity: &'static str, id: Uuid },

    /// The record targeted by an update does not exist
    #[error("{entity} with id '{id}' not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// A unique field already holds this value on another record
    #[error("{entity} with {field} '{value}' already exists")]
    UniqueViolation {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// The backend itself failed (lock poisoned, connection lost, ...)
    #[error("storage backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// CRUD storage for one entity type
///
/// Implementations must make every single-record write atomic: a reader
/// never observes a half-applied update.
#[async_trait]
pub trait RecordStore<T: Entity>: Send + Sync {
    /// Insert a new record, enforcing `T::unique_fields()`
    async fn insert(&self, record: T) -> StoreResult<T>;

    /// Point lookup by id
    async fn get(&self, id: &Uuid) -> StoreResult<Option<T>>;

    /// All records, oldest first
    async fn list(&self) -> StoreResult<Vec<T>>;

    /// Replace an existing record, enforcing `T::unique_fields()`
    async fn update(&self, record: T) -> StoreResult<T>;

    /// Remove a record; returns whether it existed
    async fn delete(&self, id: &Uuid) -> StoreResult<bool>;

    /// Records whose `field` matches `value` (see [`FieldValue::matches`](crate::core::field::FieldValue::matches))
    async fn search(&self, field: &str, value: &str) -> StoreResult<Vec<T>>;

    /// Check whether a record exists
    async fn exists(&self, id: &Uuid) -> StoreResult<bool> {
        Ok(self.get(id).await?.is_some())
    }

    /// Number of stored records
    async fn count(&self) -> StoreResult<usize> {
        Ok(self.list().await?.len())
    }
}
