//! Worker supervision.
//!
//! The [`Supervisor`] owns one worker per distinct queue. Each worker loops
//! forever: run one poll cycle, log any failure with the queue name, start
//! over. Workers never share state beyond the service clients, so a failing
//! queue cannot stall another one.
//!
//! Workers are tokio tasks admitted by a [`WorkerPool`] and stopped through a
//! [`CancellationToken`] held by the [`SupervisorHandle`]. Cancellation
//! abandons any in-flight poll; there is no drain.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use swf_kinesis_bridge::backend::memory::{InMemoryCoordinator, RecordingStream};
//! use swf_kinesis_bridge::forwarder::TaskForwarder;
//! use swf_kinesis_bridge::poller::Poller;
//! use swf_kinesis_bridge::supervisor::Supervisor;
//! use swf_kinesis_bridge::TaskList;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let coordinator = Arc::new(InMemoryCoordinator::new().with_idle_poll(Duration::from_millis(1)));
//! let stream = Arc::new(RecordingStream::new());
//! let poller = Poller::new("orders", coordinator, TaskForwarder::new(stream, "records"));
//!
//! let supervisor = Supervisor::new(
//!     vec![TaskList::new("workers")],
//!     vec![TaskList::new("deciders"), TaskList::new("deciders")],
//!     poller,
//! );
//! assert_eq!(supervisor.pool_size(), 2);
//!
//! let handle = supervisor.start();
//! handle.shutdown();
//! handle.wait().await;
//! # }
//! ```

use std::any::Any;
use std::collections::HashSet;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info};

use crate::backend::{CoordinationService, EventStream};
use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::forwarder::TaskForwarder;
use crate::poller::{CycleOutcome, Poller};
use crate::types::{QueueDescriptor, TaskList};

/// Per-worker cycle counters.
///
/// Shared between the worker and the [`SupervisorHandle`]; all counters only
/// grow.
#[derive(Debug, Default)]
pub struct WorkerStats {
    cycles: AtomicU64,
    published: AtomicU64,
    empty: AtomicU64,
    failures: AtomicU64,
}

impl WorkerStats {
    /// Completed cycles, successful or not.
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// Cycles that published a record.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Cycles whose poll returned no task.
    pub fn empty(&self) -> u64 {
        self.empty.load(Ordering::Relaxed)
    }

    /// Cycles that ended in an error or a panic.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    fn record(&self, outcome: &BridgeResult<CycleOutcome>) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome {
            Ok(CycleOutcome::Published(_)) => &self.published,
            Ok(CycleOutcome::Empty) => &self.empty,
            Err(_) => &self.failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Fixed-size pool running worker futures on the tokio runtime.
///
/// Sized once at construction and never resized. A zero size is raised to
/// one.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    tracker: TaskTracker,
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// Creates a pool admitting `size` concurrent workers (at least one).
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            tracker: TaskTracker::new(),
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    /// Number of workers the pool runs concurrently.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Spawns `worker`. It starts once a slot is free.
    pub fn submit<F>(&self, worker: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        self.tracker.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            worker.await;
        });
    }

    /// Stops accepting work. Running workers are unaffected.
    pub fn close(&self) {
        self.tracker.close();
    }

    /// Resolves once the pool is closed and every worker has returned.
    pub async fn wait(&self) {
        self.tracker.wait().await;
    }
}

/// Starts and owns the poll workers.
pub struct Supervisor {
    queues: Vec<QueueDescriptor>,
    poller: Poller,
    pool: WorkerPool,
    retry_delay: Duration,
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("queues", &self.queues)
            .field("poller", &self.poller)
            .field("pool", &self.pool)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

impl Supervisor {
    /// Creates a supervisor for the given task lists.
    ///
    /// Activity lists come first, then decision lists, each in the given
    /// order. A name repeated under the same kind is kept once; the same
    /// name under both kinds yields two queues.
    pub fn new(
        activity_task_lists: impl IntoIterator<Item = TaskList>,
        decision_task_lists: impl IntoIterator<Item = TaskList>,
        poller: Poller,
    ) -> Self {
        let descriptors = activity_task_lists
            .into_iter()
            .map(QueueDescriptor::activity)
            .chain(decision_task_lists.into_iter().map(QueueDescriptor::decision));

        let mut seen = HashSet::new();
        let queues: Vec<QueueDescriptor> = descriptors
            .filter(|queue| seen.insert(queue.clone()))
            .collect();
        let pool = WorkerPool::new(queues.len());

        Self {
            queues,
            poller,
            pool,
            retry_delay: Duration::ZERO,
        }
    }

    /// Wires a supervisor from configuration and service clients.
    pub fn from_config(
        config: &BridgeConfig,
        coordinator: Arc<dyn CoordinationService>,
        stream: Arc<dyn EventStream>,
    ) -> Self {
        let forwarder = TaskForwarder::new(stream, config.stream_name.as_str());
        let poller = Poller::new(config.domain.as_str(), coordinator, forwarder)
            .with_identity(config.identity.clone());

        Self::new(
            config.activity_task_lists.iter().cloned(),
            config.decision_task_lists.iter().cloned(),
            poller,
        )
        .with_retry_delay(config.retry_delay)
    }

    /// Sets the pause after a failed cycle. Zero retries immediately.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Distinct queues, one worker each.
    pub fn queues(&self) -> &[QueueDescriptor] {
        &self.queues
    }

    /// Worker pool size: the distinct queue count, at least one.
    pub fn pool_size(&self) -> usize {
        self.pool.size()
    }

    /// Submits one worker per queue and returns immediately.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(self) -> SupervisorHandle {
        let pool = self.pool;
        let cancel = CancellationToken::new();

        info!(
            domain = %self.poller.domain(),
            queues = self.queues.len(),
            pool_size = pool.size(),
            "Starting bridge workers"
        );

        let mut workers = Vec::with_capacity(self.queues.len());
        for queue in self.queues {
            let stats = Arc::new(WorkerStats::default());
            pool.submit(run_worker(
                queue.clone(),
                self.poller.clone(),
                Arc::clone(&stats),
                cancel.clone(),
                self.retry_delay,
            ));
            workers.push((queue, stats));
        }
        pool.close();

        SupervisorHandle {
            workers,
            cancel,
            pool,
        }
    }
}

/// Control handle for running workers.
#[derive(Debug)]
pub struct SupervisorHandle {
    workers: Vec<(QueueDescriptor, Arc<WorkerStats>)>,
    cancel: CancellationToken,
    pool: WorkerPool,
}

impl SupervisorHandle {
    /// Queues with a running worker.
    pub fn queues(&self) -> impl Iterator<Item = &QueueDescriptor> {
        self.workers.iter().map(|(queue, _)| queue)
    }

    /// Counters of the worker serving `queue`.
    pub fn stats(&self, queue: &QueueDescriptor) -> Option<Arc<WorkerStats>> {
        self.workers
            .iter()
            .find(|(q, _)| q == queue)
            .map(|(_, stats)| Arc::clone(stats))
    }

    /// Cancels every worker at its next suspension point.
    pub fn shutdown(&self) {
        info!("Stopping bridge workers");
        self.cancel.cancel();
    }

    /// Resolves once every worker has exited.
    pub async fn wait(&self) {
        self.pool.wait().await;
    }
}

// ============================================================================
// Private helpers
// ============================================================================

async fn run_worker(
    queue: QueueDescriptor,
    poller: Poller,
    stats: Arc<WorkerStats>,
    cancel: CancellationToken,
    retry_delay: Duration,
) {
    info!(queue = %queue.name(), kind = %queue.kind, "Worker started");

    loop {
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            outcome = run_cycle(&poller, &queue) => outcome,
        };
        stats.record(&outcome);

        if let Err(err) = outcome {
            error!(
                queue = %queue.name(),
                kind = %queue.kind,
                category = err.category(),
                error = %err,
                "Poll cycle failed"
            );
            if !retry_delay.is_zero() {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(retry_delay) => continue,
                }
            }
        }

        tokio::task::yield_now().await;
    }

    info!(queue = %queue.name(), kind = %queue.kind, "Worker stopped");
}

async fn run_cycle(poller: &Poller, queue: &QueueDescriptor) -> BridgeResult<CycleOutcome> {
    match AssertUnwindSafe(poller.poll_and_forward(queue))
        .catch_unwind()
        .await
    {
        Ok(outcome) => outcome,
        Err(payload) => Err(BridgeError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
