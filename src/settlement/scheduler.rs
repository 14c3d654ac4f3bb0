//! Timers driving settlement
//!
//! [`TokioScheduler`] runs tasks on the tokio runtime. [`ManualScheduler`]
//! only records them so tests can fire them on demand.

use futures::future::BoxFuture;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Work run once by [`Scheduler::after`]
pub type Task = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Work run on every tick of [`Scheduler::every`]
pub type RecurringTask = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Handle to a scheduled task
///
/// Dropping the handle leaves the task running; call [`abort`](Self::abort)
/// to stop it.
#[derive(Debug, Default)]
pub struct ScheduleHandle {
    abort: Option<AbortHandle>,
}

impl ScheduleHandle {
    pub fn new(abort: AbortHandle) -> Self {
        Self { abort: Some(abort) }
    }

    /// A handle not bound to any runtime task
    pub fn detached() -> Self {
        Self { abort: None }
    }

    pub fn abort(&self) {
        if let Some(abort) = &self.abort {
            abort.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.abort.as_ref().is_none_or(AbortHandle::is_finished)
    }
}

/// Runs settlement work later or periodically
///
/// Delivery is at-least-once; tasks must tolerate running after the work
/// they target was already done.
pub trait Scheduler: Send + Sync {
    /// Run `task` once after `delay`
    fn after(&self, delay: Duration, task: Task) -> ScheduleHandle;

    /// Run `task` every `period`, the first run one `period` from now
    fn every(&self, period: Duration, task: RecurringTask) -> ScheduleHandle;
}

/// Scheduler backed by `tokio::spawn` and `tokio::time`
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn after(&self, delay: Duration, task: Task) -> ScheduleHandle {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task().await;
        });
        ScheduleHandle::new(handle.abort_handle())
    }

    fn every(&self, period: Duration, task: RecurringTask) -> ScheduleHandle {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                task().await;
            }
        });
        ScheduleHandle::new(handle.abort_handle())
    }
}

/// Scheduler that records tasks instead of running them
#[derive(Default)]
pub struct ManualScheduler {
    pending: Mutex<Vec<(Duration, Task)>>,
    recurring: Mutex<Vec<(Duration, RecurringTask)>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of one-shot tasks waiting to run
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Delays of the waiting one-shot tasks, in registration order
    pub fn pending_delays(&self) -> Vec<Duration> {
        lock(&self.pending).iter().map(|(delay, _)| *delay).collect()
    }

    pub fn recurring_count(&self) -> usize {
        lock(&self.recurring).len()
    }

    /// Run every waiting one-shot task; returns how many ran
    pub async fn run_pending(&self) -> usize {
        let tasks: Vec<_> = std::mem::take(&mut *lock(&self.pending));
        let count = tasks.len();
        for (_, task) in tasks {
            task().await;
        }
        count
    }

    /// Run every recurring task once; returns how many ran
    pub async fn tick(&self) -> usize {
        let tasks: Vec<RecurringTask> = lock(&self.recurring)
            .iter()
            .map(|(_, task)| task.clone())
            .collect();
        let count = tasks.len();
        for task in tasks {
            task().await;
        }
        count
    }
}

impl Scheduler for ManualScheduler {
    fn after(&self, delay: Duration, task: Task) -> ScheduleHandle {
        lock(&self.pending).push((delay, task));
        ScheduleHandle::detached()
    }

    fn every(&self, period: Duration, task: RecurringTask) -> ScheduleHandle {
        lock(&self.recurring).push((period, task));
        ScheduleHandle::detached()
    }
}
