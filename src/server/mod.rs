//! Server module wiring the application and its REST exposure
//!
//! [`ServerBuilder`] assembles stores, services and the settlement engine
//! into a [`ServerHost`], then exposes the host through [`RestExposure`].

pub mod builder;
pub mod entity_registry;
pub mod host;
pub mod rest;

pub use builder::ServerBuilder;
pub use entity_registry::{EntityDescriptor, EntityRegistry};
pub use host::{ServerHost, Stores};
pub use rest::RestExposure;
