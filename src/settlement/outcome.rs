//! Simulated gateway outcome

use crate::entities::payment::{Payment, PaymentStatus};
use rand::Rng;

/// Terminal result reported by the (simulated) payment gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed,
}

impl From<Outcome> for PaymentStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => PaymentStatus::Success,
            Outcome::Failed => PaymentStatus::Failed,
        }
    }
}

/// Decides how a PENDING payment settles
pub trait OutcomeDecider: Send + Sync {
    fn decide(&self, payment: &Payment) -> Outcome;
}

/// Weighted coin flip, SUCCESS with probability `success_ratio`
#[derive(Debug, Clone, Copy)]
pub struct WeightedRandomOutcome {
    success_ratio: f64,
}

impl WeightedRandomOutcome {
    /// `success_ratio` is clamped to `[0, 1]`
    pub fn new(success_ratio: f64) -> Self {
        let success_ratio = if success_ratio.is_nan() {
            0.0
        } else {
            success_ratio.clamp(0.0, 1.0)
        };
        Self { success_ratio }
    }

    pub fn success_ratio(&self) -> f64 {
        self.success_ratio
    }
}

impl Default for WeightedRandomOutcome {
    fn default() -> Self {
        Self::new(0.9)
    }
}

impl OutcomeDecider for WeightedRandomOutcome {
    fn decide(&self, _payment: &Payment) -> Outcome {
        if rand::thread_rng().gen_bool(self.success_ratio) {
            Outcome::Success
        } else {
            Outcome::Failed
        }
    }
}

/// Always returns the same outcome
#[derive(Debug, Clone, Copy)]
pub struct FixedOutcome(pub Outcome);

impl OutcomeDecider for FixedOutcome {
    fn decide(&self, _payment: &Payment) -> Outcome {
        self.0
    }
}
