//! # Autocenter
//!
//! Back-office service for car dealers: dealer accounts, vehicle inventory
//! and subscription payments.
//!
//! ## Features
//!
//! - **CRUD over REST**: dealers, vehicles and payments with camelCase JSON
//! - **Settlement Engine**: every payment leaves PENDING exactly once, either
//!   through its delayed completion or through the periodic sweep
//! - **Injectable seams**: stores, outcome decider and scheduler are traits
//! - **Demo bearer auth**: HS256 tokens guarding the entity routes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use autocenter::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_config(AppConfig::load()?)
//!         .serve()
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod seed;
pub mod server;
pub mod settlement;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        AuthContext, AuthPolicy, AuthProvider, DomainEvent, Entity, EventBus, FieldValue,
        JwtAuthProvider, RecordStore, ServiceError, ServiceResult, StoreError, StoreResult,
    };

    // === Entities ===
    pub use crate::entities::{
        Dealer, Payment, PaymentMethod, PaymentStatus, SubscriptionTier, Vehicle, VehicleStatus,
    };
    pub use crate::entities::payment::{PaymentStore, StatusWrite};

    // === Settlement ===
    pub use crate::settlement::{
        FixedOutcome, ManualScheduler, Outcome, OutcomeDecider, Scheduler, Settlement,
        SettlementEngine, SettlementPolicy, SweepReport, TokioScheduler, WeightedRandomOutcome,
    };

    // === Storage ===
    pub use crate::storage::InMemoryStore;

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{ServerBuilder, ServerHost, Stores};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use chrono::{DateTime, Utc};
    pub use rust_decimal::Decimal;
    pub use uuid::Uuid;
}
