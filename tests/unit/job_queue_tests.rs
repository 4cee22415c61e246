/*!
 * Unit tests for the single-worker job queue
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use sublingo::errors::PipelineError;
use sublingo::job_queue::{JobProcessor, JobQueue, QueueJob, QueueOptions};

/// No real delays between retries in tests
fn fast_options(max_attempts: u32) -> QueueOptions {
    QueueOptions {
        max_attempts,
        retry_delay_ms: 0,
    }
}

#[derive(Clone)]
struct TestJob {
    key: String,
}

impl TestJob {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }
}

impl QueueJob for TestJob {
    fn key(&self) -> String {
        self.key.clone()
    }

    fn describe(&self) -> String {
        format!("test job {}", self.key)
    }
}

/// Processor that fails a scripted number of times per job key and
/// records every invocation and every abandonment
struct ScriptedProcessor {
    failures_left: Mutex<HashMap<String, u32>>,
    invocations: Mutex<Vec<String>>,
    abandoned: Mutex<Vec<String>>,
}

impl ScriptedProcessor {
    fn succeeding() -> Self {
        Self {
            failures_left: Mutex::new(HashMap::new()),
            invocations: Mutex::new(Vec::new()),
            abandoned: Mutex::new(Vec::new()),
        }
    }

    fn failing_times(key: &str, times: u32) -> Self {
        let processor = Self::succeeding();
        processor
            .failures_left
            .lock()
            .unwrap()
            .insert(key.to_string(), times);
        processor
    }

    fn invocations(&self) -> Vec<String> {
        self.invocations.lock().unwrap().clone()
    }

    fn abandoned(&self) -> Vec<String> {
        self.abandoned.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobProcessor<TestJob> for ScriptedProcessor {
    async fn process(&self, job: &TestJob) -> Result<(), PipelineError> {
        self.invocations.lock().unwrap().push(job.key.clone());

        let mut failures = self.failures_left.lock().unwrap();
        match failures.get_mut(&job.key) {
            Some(left) if *left > 0 => {
                *left -= 1;
                Err(PipelineError::NoUsableDownload)
            }
            _ => Ok(()),
        }
    }

    async fn on_abandoned(&self, job: &TestJob) {
        self.abandoned.lock().unwrap().push(job.key.clone());
    }
}

/// Processor that blocks every job until a permit is released, keeping
/// jobs in flight for as long as the test wants
struct BlockingProcessor {
    permits: Arc<Semaphore>,
    invocations: Mutex<Vec<String>>,
}

impl BlockingProcessor {
    fn new() -> (Self, Arc<Semaphore>) {
        let permits = Arc::new(Semaphore::new(0));
        (
            Self {
                permits: permits.clone(),
                invocations: Mutex::new(Vec::new()),
            },
            permits,
        )
    }
}

#[async_trait]
impl JobProcessor<TestJob> for BlockingProcessor {
    async fn process(&self, job: &TestJob) -> Result<(), PipelineError> {
        self.invocations.lock().unwrap().push(job.key.clone());
        if let Ok(permit) = self.permits.acquire().await {
            permit.forget();
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_push_withMultipleJobs_shouldProcessInFifoOrder() {
    let processor = Arc::new(ScriptedProcessor::succeeding());
    let queue = JobQueue::start(processor.clone(), fast_options(3));

    assert!(queue.push(TestJob::new("a")));
    assert!(queue.push(TestJob::new("b")));
    assert!(queue.push(TestJob::new("c")));

    queue.shutdown().await;

    assert_eq!(processor.invocations(), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_push_withTransientFailure_shouldRetryUntilSuccess() {
    let processor = Arc::new(ScriptedProcessor::failing_times("a", 2));
    let queue = JobQueue::start(processor.clone(), fast_options(3));

    queue.push(TestJob::new("a"));
    queue.shutdown().await;

    // Two failures plus the final success
    assert_eq!(processor.invocations(), vec!["a", "a", "a"]);
}

#[tokio::test]
async fn test_push_withPersistentFailure_shouldDropAfterMaxAttempts() {
    let processor = Arc::new(ScriptedProcessor::failing_times("a", 10));
    let queue = JobQueue::start(processor.clone(), fast_options(3));

    queue.push(TestJob::new("a"));
    queue.push(TestJob::new("b"));
    queue.shutdown().await;

    // Exactly three attempts for the failing job, then the next job runs
    assert_eq!(processor.invocations(), vec!["a", "a", "a", "b"]);
}

#[tokio::test]
async fn test_push_withPersistentFailure_shouldNotifyAbandonedOnce() {
    let processor = Arc::new(ScriptedProcessor::failing_times("a", 10));
    let queue = JobQueue::start(processor.clone(), fast_options(3));

    queue.push(TestJob::new("a"));
    queue.shutdown().await;

    assert_eq!(processor.abandoned(), vec!["a"]);
}

#[tokio::test]
async fn test_push_withEventualSuccess_shouldNotNotifyAbandoned() {
    let processor = Arc::new(ScriptedProcessor::failing_times("a", 2));
    let queue = JobQueue::start(processor.clone(), fast_options(3));

    queue.push(TestJob::new("a"));
    queue.shutdown().await;

    // Recovered on the last attempt, so the job was never dropped
    assert!(processor.abandoned().is_empty());
}

#[tokio::test]
async fn test_push_withZeroMaxAttempts_shouldStillRunOnce() {
    let processor = Arc::new(ScriptedProcessor::succeeding());
    let queue = JobQueue::start(processor.clone(), fast_options(0));

    queue.push(TestJob::new("a"));
    queue.shutdown().await;

    assert_eq!(processor.invocations(), vec!["a"]);
}

#[tokio::test]
async fn test_push_withDuplicateKeyInFlight_shouldRejectSecondPush() {
    let (processor, permits) = BlockingProcessor::new();
    let queue = JobQueue::start(Arc::new(processor), fast_options(3));

    assert!(queue.push(TestJob::new("a")));
    // First job is blocked inside the processor (or still queued); the
    // same key must be rejected either way
    assert!(!queue.push(TestJob::new("a")));
    assert!(queue.is_in_flight("a"));

    // A different key is accepted
    assert!(queue.push(TestJob::new("b")));
    assert_eq!(queue.in_flight_count(), 2);

    permits.add_permits(2);
    queue.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_withQueuedBacklog_shouldDrainBeforeReturning() {
    let processor = Arc::new(ScriptedProcessor::succeeding());
    let queue = JobQueue::start(processor.clone(), fast_options(3));

    for key in ["a", "b", "c", "d", "e"] {
        queue.push(TestJob::new(key));
    }
    queue.shutdown().await;

    assert_eq!(processor.invocations().len(), 5);
}
