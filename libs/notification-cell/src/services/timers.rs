// libs/notification-cell/src/services/timers.rs
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Identity of a scheduled effect. Scheduling under a key that already has a
/// pending task replaces it, so each entity carries at most one live timer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimerKey {
    Toast(i64),
    Ticker,
    BudgetPulse,
}

struct ScheduledTask {
    generation: u64,
    handle: JoinHandle<()>,
}

struct TimerInner {
    seq: u64,
    tasks: HashMap<TimerKey, ScheduledTask>,
}

/// Deferred, cancellable, fire-once timers keyed by entity identity.
///
/// Effects must re-read current state when they fire rather than closing over
/// a snapshot; an entity dismissed by hand before its timer fires then sees
/// the late expiry as a no-op.
#[derive(Clone)]
pub struct TimerRegistry {
    inner: Arc<Mutex<TimerInner>>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(TimerInner {
                seq: 0,
                tasks: HashMap::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TimerInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Run `effect` once after `delay`, replacing any pending task under the
    /// same key.
    pub fn schedule<F>(&self, key: TimerKey, delay: Duration, effect: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut inner = self.lock();
        inner.seq += 1;
        let generation = inner.seq;

        let registry = Arc::clone(&self.inner);
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            effect.await;
            let mut inner = match registry.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            // A replacement may have been scheduled while this task slept.
            if inner
                .tasks
                .get(&task_key)
                .is_some_and(|task| task.generation == generation)
            {
                inner.tasks.remove(&task_key);
            }
        });

        if let Some(previous) = inner
            .tasks
            .insert(key.clone(), ScheduledTask { generation, handle })
        {
            debug!("Replacing pending timer for {:?}", key);
            previous.handle.abort();
        }
    }

    /// Invalidate a pending task; the effect will never fire.
    pub fn cancel(&self, key: &TimerKey) {
        if let Some(task) = self.lock().tasks.remove(key) {
            task.handle.abort();
        }
    }

    /// Abort every pending task. Called when the owning store is torn down so
    /// no late effect can mutate state nobody observes anymore.
    pub fn shutdown(&self) {
        let mut inner = self.lock();
        for (_, task) in inner.tasks.drain() {
            task.handle.abort();
        }
    }

    pub fn pending(&self) -> usize {
        self.lock().tasks.len()
    }
}

impl Default for TimerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_delay() {
        let registry = TimerRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        registry.schedule(TimerKey::Ticker, Duration::from_secs(5), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(4_999)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(10)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(registry.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_replaces_the_pending_task() {
        let registry = TimerRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let counter = Arc::clone(&fired);
            registry.schedule(TimerKey::BudgetPulse, Duration::from_secs(8), async move {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(registry.pending(), 1);

        tokio::time::sleep(Duration::from_secs(9)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_task_never_fires() {
        let registry = TimerRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        registry.schedule(TimerKey::Toast(7), Duration::from_secs(5), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        registry.cancel(&TimerKey::Toast(7));

        tokio::time::sleep(Duration::from_secs(6)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(registry.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_aborts_everything() {
        let registry = TimerRegistry::new();
        let fired = Arc::new(AtomicUsize::new(0));

        for id in 0..3 {
            let counter = Arc::clone(&fired);
            registry.schedule(TimerKey::Toast(id), Duration::from_secs(5), async move {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        registry.shutdown();

        tokio::time::sleep(Duration::from_secs(6)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
