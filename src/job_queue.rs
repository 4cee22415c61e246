use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{error, info, warn};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::errors::PipelineError;

// @module: Serialized execution of translation jobs

/// Retry settings for whole-job execution
#[derive(Debug, Clone, Copy)]
pub struct QueueOptions {
    /// Attempts per job before it is dropped
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub retry_delay_ms: u64,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_ms: 3000,
        }
    }
}

/// Executes the full pipeline for one dequeued job
#[async_trait]
pub trait JobProcessor<J>: Send + Sync + 'static {
    async fn process(&self, job: &J) -> Result<(), PipelineError>;

    /// Called once when a job has spent its whole retry budget and the
    /// queue is about to drop it. Tracking state that must not outlive
    /// the job gets cleared here.
    async fn on_abandoned(&self, _job: &J) {}
}

/// A job the queue can track: keyed for duplicate gating, describable
/// for logs
pub trait QueueJob: Send + Sync + 'static {
    /// Logical identity of the job target; two jobs with the same key are
    /// duplicates while one of them is still in flight
    fn key(&self) -> String;

    /// Human-readable description for log lines
    fn describe(&self) -> String;
}

/// Single-worker, FIFO, at-least-once job queue.
///
/// Exactly one job runs at a time; the rest wait in submission order. A
/// job that errors is retried whole up to `max_attempts` times with a
/// fixed delay, then dropped, leaving whatever partial state it already
/// wrote (e.g. a placeholder file) in place. Each instance owns its own
/// worker and in-flight set, so tests can construct isolated queues.
///
/// Pushing a job whose key is already in flight is rejected, gating the
/// duplicate work that concurrent identical requests would otherwise
/// trigger.
pub struct JobQueue<J> {
    tx: Option<mpsc::UnboundedSender<J>>,
    in_flight: Arc<Mutex<HashSet<String>>>,
    worker: Option<JoinHandle<()>>,
}

impl<J: QueueJob> JobQueue<J> {
    /// Start a queue with its single worker task
    pub fn start(processor: Arc<dyn JobProcessor<J>>, options: QueueOptions) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<J>();
        let in_flight = Arc::new(Mutex::new(HashSet::new()));
        let in_flight_worker = in_flight.clone();

        let worker = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let key = job.key();
                info!("Job running: {}", job.describe());

                Self::run_with_retries(processor.as_ref(), &job, options).await;

                in_flight_worker.lock().remove(&key);
            }
        });

        Self {
            tx: Some(tx),
            in_flight,
            worker: Some(worker),
        }
    }

    /// Execute one job, retrying the whole pipeline on any error
    async fn run_with_retries(processor: &dyn JobProcessor<J>, job: &J, options: QueueOptions) {
        let max_attempts = options.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match processor.process(job).await {
                Ok(()) => {
                    info!("Job succeeded: {}", job.describe());
                    return;
                }
                Err(e) => {
                    error!(
                        "Job attempt {}/{} failed for {}: {}",
                        attempt,
                        max_attempts,
                        job.describe(),
                        e
                    );

                    if attempt < max_attempts && options.retry_delay_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(options.retry_delay_ms)).await;
                    }
                }
            }
        }

        // Dropped, not requeued; partial artifacts stay for inspection
        error!(
            "Job failed after {} attempts, dropping: {}",
            max_attempts,
            job.describe()
        );
        processor.on_abandoned(job).await;
    }

    /// Enqueue a job. Returns false when a job with the same key is still
    /// pending or running, or when the queue has shut down.
    pub fn push(&self, job: J) -> bool {
        let key = job.key();

        {
            let mut in_flight = self.in_flight.lock();
            if in_flight.contains(&key) {
                warn!("Duplicate job rejected while in flight: {}", job.describe());
                return false;
            }
            in_flight.insert(key.clone());
        }

        info!("Job queued: {}", job.describe());
        match &self.tx {
            Some(tx) if tx.send(job).is_ok() => true,
            _ => {
                self.in_flight.lock().remove(&key);
                false
            }
        }
    }

    /// Number of jobs currently pending or running
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().len()
    }

    /// Whether a job with this key is currently pending or running
    pub fn is_in_flight(&self, key: &str) -> bool {
        self.in_flight.lock().contains(key)
    }

    /// Stop accepting jobs, drain the backlog, and wait for the worker
    pub async fn shutdown(mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.await;
        }
    }
}
