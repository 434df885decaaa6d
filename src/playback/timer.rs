use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Opaque handle to a pending deferred callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Cancellable one-shot timer
///
/// Firing is reported back to the owner out of band (for example over a
/// channel), which then hands the handle to the controller that asked for it.
pub trait Scheduler {
    /// Arrange for a single firing after `delay`
    fn schedule(&mut self, delay: Duration) -> TimerHandle;

    /// Prevent a pending firing. Unknown or already fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

/// Timer backed by tokio tasks
///
/// Each scheduled handle is a task that sleeps and then posts the handle on
/// the channel returned by [`TokioScheduler::new`]. Run the receiving loop on
/// the same runtime to keep callbacks cooperative.
pub struct TokioScheduler {
    next_id: u64,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
    fired_tx: mpsc::UnboundedSender<TimerHandle>,
}

impl TokioScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerHandle>) {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            next_id: 0,
            tasks: HashMap::new(),
            fired_tx,
        };
        (scheduler, fired_rx)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.tasks.retain(|_, task| !task.is_finished());

        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        let fired_tx = self.fired_tx.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the event loop has shut down
            let _ = fired_tx.send(handle);
        });
        self.tasks.insert(handle, task);

        debug!("Scheduled timer {:?} in {:?}", handle, delay);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
            debug!("Cancelled timer {:?}", handle);
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

/// Deterministic scheduler driven by hand, with a virtual clock
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    now: Duration,
    pending: Vec<(TimerHandle, Duration)>,
    /// Every delay passed to `schedule`, in order
    pub requested: Vec<Duration>,
    /// Every handle passed to `cancel`, in order
    pub cancelled: Vec<TimerHandle>,
}

#[cfg(test)]
impl ManualScheduler {
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Fire the earliest pending timer and move the clock to its due time
    pub fn fire_next(&mut self) -> Option<TimerHandle> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .min_by_key(|(_, (handle, due))| (*due, *handle))
            .map(|(idx, _)| idx)?;
        let (handle, due) = self.pending.remove(idx);
        self.now = due;
        Some(handle)
    }
}

#[cfg(test)]
impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending.push((handle, self.now + delay));
        self.requested.push(delay);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.cancelled.push(handle);
        self.pending.retain(|(pending, _)| *pending != handle);
    }
}
