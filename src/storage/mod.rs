//! Storage implementations
//!
//! Only the in-memory backend ships with the crate; anything implementing
//! [`RecordStore`](crate::core::store::RecordStore) and
//! [`PaymentStore`](crate::entities::payment::PaymentStore) can replace it.

pub mod in_memory;

pub use in_memory::InMemoryStore;
