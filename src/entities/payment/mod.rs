//! Payment entity module
//!
//! Payments are created through the settlement engine, which owns their
//! status. This module holds the record, its store port and the REST surface.

pub mod descriptor;
pub mod handlers;
pub mod model;
pub mod service;
pub mod store;

pub use descriptor::PaymentDescriptor;
pub use model::{Payment, PaymentMethod, PaymentRequest, PaymentStatus, PaymentView};
pub use service::PaymentService;
pub use store::{PaymentStore, StatusWrite};
