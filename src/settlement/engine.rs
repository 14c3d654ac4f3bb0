//! Payment settlement engine
//!
//! A payment is created PENDING and reaches SUCCESS or FAILED exactly once.
//! Two independent triggers race for it:
//!
//! ```text
//! initiate ──▶ store.insert ──▶ scheduler.after(completion_delay) ──┐
//!                                                                   ├──▶ settle(id)
//! scheduler.every(sweep_interval) ──▶ sweep_stale_pending ──────────┘
//!                                                                        │
//!                                      store.compare_and_set_status(PENDING → outcome)
//! ```
//!
//! The conditional write in the store is the only synchronization: whichever
//! trigger writes first wins, the other observes a terminal status and does
//! nothing.

use super::outcome::OutcomeDecider;
use super::scheduler::{RecurringTask, ScheduleHandle, Scheduler, Task};
use crate::config::SettlementSection;
use crate::core::error::{ServiceError, ServiceResult};
use crate::core::events::{DomainEvent, EventBus, PaymentEvent, SettlementPath};
use crate::core::store::{RecordStore, StoreResult};
use crate::entities::dealer::Dealer;
use crate::entities::payment::{Payment, PaymentMethod, PaymentStatus, PaymentStore, StatusWrite};
use chrono::Utc;
use futures::FutureExt;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use uuid::Uuid;

/// Timing of the two settlement triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementPolicy {
    /// Delay of the one-shot completion armed by `initiate`
    pub completion_delay: Duration,
    /// Period of the reconciliation sweep
    pub sweep_interval: Duration,
    /// Minimum age of a PENDING payment before the sweep touches it
    pub stale_after: Duration,
}

impl Default for SettlementPolicy {
    fn default() -> Self {
        Self::from(&SettlementSection::default())
    }
}

impl From<&SettlementSection> for SettlementPolicy {
    fn from(section: &SettlementSection) -> Self {
        Self {
            completion_delay: section.completion_delay(),
            sweep_interval: section.sweep_interval(),
            stale_after: section.stale_after(),
        }
    }
}

/// Result of one settlement attempt
///
/// Losing a race is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    /// This call moved the payment out of PENDING
    Settled(Payment),
    /// The payment was already SUCCESS or FAILED
    AlreadyTerminal(PaymentStatus),
    /// No payment with this id
    Missing,
}

impl Settlement {
    pub fn is_settled(&self) -> bool {
        matches!(self, Settlement::Settled(_))
    }
}

/// Counters of one sweep pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Stale PENDING payments found by the scan
    pub scanned: usize,
    /// Payments this pass moved to a terminal status
    pub settled: usize,
    /// Payments settled by another trigger (or deleted) in the meantime
    pub skipped: usize,
    /// Payments whose settlement hit a store error
    pub failed: usize,
}

pub struct SettlementEngine {
    payments: Arc<dyn PaymentStore>,
    dealers: Arc<dyn RecordStore<Dealer>>,
    decider: Arc<dyn OutcomeDecider>,
    scheduler: Arc<dyn Scheduler>,
    events: EventBus,
    policy: SettlementPolicy,
    settlements: AtomicU64,
    overrides: AtomicU64,
}

impl SettlementEngine {
    pub fn new(
        payments: Arc<dyn PaymentStore>,
        dealers: Arc<dyn RecordStore<Dealer>>,
        decider: Arc<dyn OutcomeDecider>,
        scheduler: Arc<dyn Scheduler>,
        events: EventBus,
        policy: SettlementPolicy,
    ) -> Self {
        Self {
            payments,
            dealers,
            decider,
            scheduler,
            events,
            policy,
            settlements: AtomicU64::new(0),
            overrides: AtomicU64::new(0),
        }
    }

    pub fn policy(&self) -> &SettlementPolicy {
        &self.policy
    }

    /// PENDING → terminal transitions performed by this engine
    pub fn settlements(&self) -> u64 {
        self.settlements.load(Ordering::SeqCst)
    }

    /// Administrative overrides performed by this engine
    pub fn overrides(&self) -> u64 {
        self.overrides.load(Ordering::SeqCst)
    }

    /// Every status change performed by this engine
    pub fn transitions(&self) -> u64 {
        self.settlements() + self.overrides()
    }

    /// Create a PENDING payment and arm its delayed completion
    ///
    /// Nothing is persisted or armed when validation fails.
    pub async fn initiate(
        self: &Arc<Self>,
        dealer_id: Uuid,
        amount: Decimal,
        method: PaymentMethod,
    ) -> ServiceResult<Payment> {
        if amount <= Decimal::ZERO {
            return Err(ServiceError::invalid(format!(
                "Payment amount must be greater than 0, got {amount}"
            )));
        }
        if !self.dealers.exists(&dealer_id).await? {
            return Err(ServiceError::not_found("dealer", dealer_id));
        }

        let payment = self
            .payments
            .insert(Payment::pending(dealer_id, amount, method))
            .await?;

        tracing::info!(
            payment_id = %payment.id,
            transaction_id = %payment.transaction_id,
            dealer_id = %dealer_id,
            amount = %amount,
            "payment initiated"
        );
        self.events.publish(DomainEvent::created("payment", payment.id));

        // Individual timers are never cancelled; the handle is dropped.
        self.scheduler
            .after(self.policy.completion_delay, self.delayed_completion(payment.id));

        Ok(payment)
    }

    fn delayed_completion(self: &Arc<Self>, payment_id: Uuid) -> Task {
        let engine = Arc::clone(self);
        Box::new(move || {
            async move {
                // Store errors are already logged by `settle`
                let _ = engine.settle(payment_id, SettlementPath::Delayed).await;
            }
            .boxed()
        })
    }

    /// Settle a payment if it is still PENDING
    ///
    /// Missing and already terminal payments are reported, not raised.
    pub async fn complete_if_pending(&self, payment_id: Uuid) -> StoreResult<Settlement> {
        self.settle(payment_id, SettlementPath::Direct).await
    }

    async fn settle(&self, payment_id: Uuid, path: SettlementPath) -> StoreResult<Settlement> {
        self.try_settle(payment_id, path).await.inspect_err(|e| {
            tracing::error!(payment_id = %payment_id, ?path, error = %e, "settlement failed");
        })
    }

    async fn try_settle(&self, payment_id: Uuid, path: SettlementPath) -> StoreResult<Settlement> {
        let Some(payment) = self.payments.get(&payment_id).await? else {
            tracing::debug!(payment_id = %payment_id, ?path, "payment vanished before settlement");
            return Ok(Settlement::Missing);
        };
        if payment.status.is_terminal() {
            tracing::debug!(payment_id = %payment_id, status = %payment.status, ?path, "payment already settled");
            return Ok(Settlement::AlreadyTerminal(payment.status));
        }

        let next = PaymentStatus::from(self.decider.decide(&payment));
        let write = self
            .payments
            .compare_and_set_status(&payment_id, PaymentStatus::Pending, next, Utc::now())
            .await?;

        match write {
            StatusWrite::Applied(settled) => {
                self.settlements.fetch_add(1, Ordering::SeqCst);
                tracing::info!(
                    payment_id = %settled.id,
                    transaction_id = %settled.transaction_id,
                    status = %settled.status,
                    ?path,
                    "payment settled"
                );
                self.events.publish(DomainEvent::Payment(PaymentEvent::Settled {
                    payment_id: settled.id,
                    transaction_id: settled.transaction_id.clone(),
                    status: settled.status,
                    path,
                }));
                Ok(Settlement::Settled(settled))
            }
            StatusWrite::Rejected(current) => {
                tracing::debug!(payment_id = %payment_id, status = %current, ?path, "lost settlement race");
                Ok(Settlement::AlreadyTerminal(current))
            }
            StatusWrite::Missing => Ok(Settlement::Missing),
        }
    }

    /// Settle every PENDING payment created at least `older_than` ago
    ///
    /// Safe to run at any time, including concurrently with delayed
    /// completions and other sweeps.
    pub async fn sweep_stale_pending(&self, older_than: Duration) -> StoreResult<SweepReport> {
        let age = chrono::Duration::from_std(older_than).unwrap_or(chrono::Duration::MAX);
        let Some(cutoff) = Utc::now().checked_sub_signed(age) else {
            return Ok(SweepReport::default());
        };

        let ids: Vec<Uuid> = self
            .payments
            .pending_created_before(cutoff)
            .await?
            .into_iter()
            .map(|payment| payment.id)
            .collect();

        let mut report = SweepReport {
            scanned: ids.len(),
            ..SweepReport::default()
        };
        if ids.is_empty() {
            return Ok(report);
        }

        let results = futures::future::join_all(
            ids.into_iter()
                .map(|id| self.settle(id, SettlementPath::Sweep)),
        )
        .await;

        for result in results {
            match result {
                Ok(Settlement::Settled(_)) => report.settled += 1,
                Ok(_) => report.skipped += 1,
                Err(_) => report.failed += 1,
            }
        }

        tracing::info!(
            scanned = report.scanned,
            settled = report.settled,
            skipped = report.skipped,
            failed = report.failed,
            "settlement sweep finished"
        );
        Ok(report)
    }

    /// Administrative status change from any status to SUCCESS or FAILED
    ///
    /// PENDING is refused as a target: a terminal payment never reverts.
    pub async fn override_status(
        &self,
        payment_id: &Uuid,
        status: PaymentStatus,
    ) -> ServiceResult<Payment> {
        if !status.is_terminal() {
            return Err(ServiceError::invalid(format!(
                "cannot override payment status to {status}"
            )));
        }

        let (previous, payment) = self
            .payments
            .force_status(payment_id, status, Utc::now())
            .await?
            .ok_or_else(|| ServiceError::not_found("payment", payment_id))?;

        self.overrides.fetch_add(1, Ordering::SeqCst);
        tracing::warn!(
            payment_id = %payment_id,
            transaction_id = %payment.transaction_id,
            from = %previous,
            to = %status,
            "payment status overridden"
        );
        self.events
            .publish(DomainEvent::Payment(PaymentEvent::StatusOverridden {
                payment_id: *payment_id,
                from: previous,
                to: status,
            }));
        Ok(payment)
    }

    /// Register the periodic sweep with the scheduler
    pub fn start_sweeper(self: &Arc<Self>) -> ScheduleHandle {
        if self.policy.stale_after <= self.policy.completion_delay {
            tracing::warn!(
                stale_after_ms = self.policy.stale_after.as_millis() as u64,
                completion_delay_ms = self.policy.completion_delay.as_millis() as u64,
                "stale threshold does not exceed the completion delay; the sweep will race delayed completions"
            );
        }

        tracing::info!(
            interval_ms = self.policy.sweep_interval.as_millis() as u64,
            stale_after_ms = self.policy.stale_after.as_millis() as u64,
            "settlement sweeper started"
        );

        let engine = Arc::clone(self);
        let task: RecurringTask = Arc::new(move || {
            let engine = engine.clone();
            async move {
                let stale_after = engine.policy.stale_after;
                if let Err(e) = engine.sweep_stale_pending(stale_after).await {
                    tracing::error!(error = %e, "settlement sweep failed");
                }
            }
            .boxed()
        });
        self.scheduler.every(self.policy.sweep_interval, task)
    }
}
