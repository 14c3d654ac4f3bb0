//! Payment settlement
//!
//! [`SettlementEngine`] owns the payment state machine, [`OutcomeDecider`]
//! simulates the gateway and [`Scheduler`] drives the delayed completion and
//! the periodic sweep.

pub mod engine;
pub mod outcome;
pub mod scheduler;

pub use engine::{Settlement, SettlementEngine, SettlementPolicy, SweepReport};
pub use outcome::{FixedOutcome, Outcome, OutcomeDecider, WeightedRandomOutcome};
pub use scheduler::{ManualScheduler, ScheduleHandle, Scheduler, TokioScheduler};
