//! Entities module - contains all business entities
//!
//! Each entity lives in its own module with the same layout: `model`
//! (record + request DTOs), `service` (CRUD rules), `handlers` (axum) and
//! `descriptor` (route registration).

pub mod macros;

pub mod dealer;
pub mod payment;
pub mod vehicle;

pub use dealer::{Dealer, SubscriptionTier};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use vehicle::{Vehicle, VehicleStatus};
