//! Dealer entity module

pub mod descriptor;
pub mod handlers;
pub mod model;
pub mod service;

pub use descriptor::DealerDescriptor;
pub use model::{Dealer, DealerRequest, SubscriptionTier};
pub use service::DealerService;
