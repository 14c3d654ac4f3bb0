//! Core module containing fundamental traits and types shared by every entity

pub mod auth;
pub mod entity;
pub mod error;
pub mod events;
pub mod field;
pub mod store;
pub mod validation;

pub use auth::{AuthContext, AuthPolicy, AuthProvider, JwtAuthProvider};
pub use entity::Entity;
pub use error::{ServiceError, ServiceResult};
pub use events::{DomainEvent, EventBus};
pub use field::FieldValue;
pub use store::{RecordStore, StoreError, StoreResult};
pub use validation::ValidatedJson;
