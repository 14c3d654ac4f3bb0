//! Vehicle entity module

pub mod descriptor;
pub mod handlers;
pub mod model;
pub mod service;

pub use descriptor::VehicleDescriptor;
pub use model::{Vehicle, VehicleRequest, VehicleStatus, VehicleView};
pub use service::VehicleService;
