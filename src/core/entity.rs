//! Entity trait defining the common shape of all stored records

use crate::core::field::FieldValue;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Base trait for every record kept in a [`RecordStore`](crate::core::store::RecordStore).
///
/// All entities have:
/// - id: Unique identifier
/// - created_at: Creation timestamp (immutable)
/// - updated_at: Last modification timestamp
///
/// Foreign keys are plain fields (e.g. `dealer_id`), never back-pointers, so
/// joins are explicit store queries.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs (e.g., "dealers", "payments")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "dealer", "payment")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Get the last update timestamp
    fn updated_at(&self) -> DateTime<Utc>;

    /// Fields whose values must be unique across all records of this type
    fn unique_fields() -> &'static [&'static str] {
        &[]
    }

    /// Get the value of a specific field by name
    fn field_value(&self, field: &str) -> Option<FieldValue>;
}
