//! Repeating timers behind an injectable trait.
//!
//! The session never spawns timers directly. It asks a [`Scheduler`] for a
//! repeating task and keeps the returned [`TaskHandle`] so it can cancel it
//! later. Production uses [`TokioScheduler`]; tests drive time by hand with
//! [`ManualScheduler`].

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Work run on every firing of a repeating timer.
pub type Task = Box<dyn FnMut() + Send + 'static>;

/// Identifies a scheduled task for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskHandle(u64);

/// A source of repeating timers.
pub trait Scheduler: Send + Sync {
    /// Run `task` every `interval`, first firing one interval from now.
    fn schedule_repeating(&self, interval: Duration, task: Task) -> TaskHandle;

    /// Stop a task. Unknown or already-cancelled handles are ignored.
    fn cancel(&self, handle: TaskHandle);

    /// Stop every task.
    fn cancel_all(&self);
}

/// Smallest interval a timer may run at.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

// ---------------------------------------------------------------------------
// Tokio
// ---------------------------------------------------------------------------

/// Timers backed by tokio interval tasks.
///
/// Each firing runs on tokio's blocking pool, one at a time per timer.
///
/// Must be used from within a tokio runtime. Outside one, scheduling logs a
/// warning and the task never runs.
#[derive(Debug, Default)]
pub struct TokioScheduler {
    next_id: AtomicU64,
    tasks: Mutex<BTreeMap<TaskHandle, JoinHandle<()>>>,
}

impl TokioScheduler {
    /// Create a scheduler with no tasks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&self, interval: Duration, mut task: Task) -> TaskHandle {
        let handle = TaskHandle(self.next_id.fetch_add(1, Ordering::Relaxed));
        let period = interval.max(MIN_INTERVAL);

        let Ok(runtime) = Handle::try_current() else {
            warn!(task = handle.0, "no tokio runtime; timer not started");
            return handle;
        };

        let join = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                // Tasks may block on locks or storage I/O.
                task = match tokio::task::spawn_blocking(move || {
                    task();
                    task
                })
                .await
                {
                    Ok(task) => task,
                    Err(err) => {
                        warn!(task = handle.0, error = %err, "timer task failed; timer stopped");
                        return;
                    }
                };
            }
        });

        debug!(task = handle.0, interval_ms = period.as_millis(), "timer scheduled");
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle, join);
        handle
    }

    fn cancel(&self, handle: TaskHandle) {
        let removed = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle);
        if let Some(join) = removed {
            join.abort();
            debug!(task = handle.0, "timer cancelled");
        }
    }

    fn cancel_all(&self) {
        let drained = std::mem::take(&mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner));
        for join in drained.into_values() {
            join.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

// ---------------------------------------------------------------------------
// Manual
// ---------------------------------------------------------------------------

struct ManualTask {
    interval: Duration,
    next_due: Duration,
    task: Arc<Mutex<Task>>,
}

#[derive(Default)]
struct ManualInner {
    now: Duration,
    next_id: u64,
    tasks: BTreeMap<TaskHandle, ManualTask>,
}

/// Deterministic timers driven by [`ManualScheduler::advance`].
///
/// Tasks fire in due-time order, ties broken by scheduling order. Tasks run
/// without the scheduler lock held, so a task may schedule or cancel other
/// tasks.
#[derive(Default)]
pub struct ManualScheduler {
    inner: Mutex<ManualInner>,
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("ManualScheduler")
            .field("now", &inner.now)
            .field("tasks", &inner.tasks.len())
            .finish()
    }
}

impl ManualScheduler {
    /// Create a scheduler at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).now
    }

    /// Number of live tasks.
    pub fn task_count(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).tasks.len()
    }

    /// Move time forward by `by`, running every firing that falls due.
    pub fn advance(&self, by: Duration) {
        let target = self.elapsed().saturating_add(by);
        while let Some((handle, task)) = self.next_due(target) {
            let mut run = task.lock().unwrap_or_else(PoisonError::into_inner);
            (*run)();
            debug!(task = handle.0, "manual timer fired");
        }
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).now = target;
    }

    /// Pop the earliest firing at or before `target`, rescheduling it.
    fn next_due(&self, target: Duration) -> Option<(TaskHandle, Arc<Mutex<Task>>)> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let (handle, due) = inner
            .tasks
            .iter()
            .map(|(handle, task)| (*handle, task.next_due))
            .filter(|(_, due)| *due <= target)
            .min_by_key(|(handle, due)| (*due, *handle))?;
        inner.now = due;
        let entry = inner.tasks.get_mut(&handle)?;
        entry.next_due = due.saturating_add(entry.interval);
        Some((handle, Arc::clone(&entry.task)))
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&self, interval: Duration, task: Task) -> TaskHandle {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let handle = TaskHandle(inner.next_id);
        inner.next_id = inner.next_id.saturating_add(1);
        let interval = interval.max(MIN_INTERVAL);
        let next_due = inner.now.saturating_add(interval);
        inner.tasks.insert(
            handle,
            ManualTask {
                interval,
                next_due,
                task: Arc::new(Mutex::new(task)),
            },
        );
        handle
    }

    fn cancel(&self, handle: TaskHandle) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tasks
            .remove(&handle);
    }

    fn cancel_all(&self) {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).tasks.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn counter() -> (Arc<AtomicUsize>, Task) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        let task: Task = Box::new(move || {
            inner.fetch_add(1, Ordering::SeqCst);
        });
        (count, task)
    }

    #[test]
    fn manual_fires_once_per_interval() {
        let scheduler = ManualScheduler::new();
        let (count, task) = counter();
        scheduler.schedule_repeating(Duration::from_secs(2), task);

        scheduler.advance(Duration::from_secs(1));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        scheduler.advance(Duration::from_secs(1));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        scheduler.advance(Duration::from_secs(10));
        assert_eq!(count.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn manual_cancel_stops_firing() {
        let scheduler = ManualScheduler::new();
        let (count, task) = counter();
        let handle = scheduler.schedule_repeating(Duration::from_secs(1), task);
        scheduler.advance(Duration::from_secs(3));
        scheduler.cancel(handle);
        scheduler.advance(Duration::from_secs(3));
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(scheduler.task_count(), 0);
    }

    #[test]
    fn manual_fires_in_due_order() {
        let scheduler = ManualScheduler::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for (label, secs) in [("slow", 3_u64), ("fast", 2)] {
            let order = Arc::clone(&order);
            scheduler.schedule_repeating(
                Duration::from_secs(secs),
                Box::new(move || order.lock().unwrap().push(label)),
            );
        }
        scheduler.advance(Duration::from_secs(6));
        assert_eq!(*order.lock().unwrap(), vec!["fast", "slow", "fast", "slow", "fast"]);
    }

    #[test]
    fn manual_cancel_all_clears_tasks() {
        let scheduler = ManualScheduler::new();
        let (_, a) = counter();
        let (_, b) = counter();
        scheduler.schedule_repeating(Duration::from_secs(1), a);
        scheduler.schedule_repeating(Duration::from_secs(1), b);
        scheduler.cancel_all();
        assert_eq!(scheduler.task_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_interval_fires_and_cancels() {
        let scheduler = TokioScheduler::new();
        let (count, task) = counter();
        let handle = scheduler.schedule_repeating(Duration::from_millis(100), task);

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        scheduler.cancel(handle);
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(scheduler.task_count(), 0);
    }

    #[tokio::test]
    async fn tokio_task_blocking_leaves_runtime_free() {
        let scheduler = TokioScheduler::new();
        let (release, released) = std::sync::mpsc::channel::<()>();
        let entered = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&entered);
        scheduler.schedule_repeating(
            Duration::from_millis(10),
            Box::new(move || {
                inner.fetch_add(1, Ordering::SeqCst);
                released.recv().ok();
            }),
        );

        // Single-threaded runtime: this loop only runs if the task is off it.
        tokio::time::timeout(Duration::from_secs(5), async {
            while entered.load(Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();

        release.send(()).unwrap();
        scheduler.cancel_all();
    }
}
