use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use geo::Point;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};

use crate::amenities::{process_result, AmenityError, WalkSettings};
use crate::ors::Router;
use crate::overpass::entities::AmenityElement;
use crate::store::{ResultStore, StoreError};

#[derive(thiserror::Error, Debug)]
pub enum JobError {
    #[error("Aggregation error: {0}")]
    Amenity(#[from] AmenityError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Job worker has stopped")]
    WorkerStopped,

    #[error("Job queue is full ({0} waiting)")]
    QueueFull(usize),
}

pub type JobResult<T> = Result<T, JobError>;

/// Amenities around `origin` waiting to be filtered and counted
#[derive(Debug, Clone)]
pub struct AggregationJob {
    pub origin: Point,
    pub elements: Vec<AmenityElement>,
}

struct Queued {
    id: u64,
    job: AggregationJob,
    reply: oneshot::Sender<JobResult<u64>>,
}

/// Returned on submission. Dropping it doesn't cancel the job.
#[derive(Debug)]
pub struct JobHandle {
    pub id: u64,
    outcome: oneshot::Receiver<JobResult<u64>>,
}

impl JobHandle {
    /// Waits for the job, yielding the stored result version.
    /// `None` if the worker went away before finishing it.
    #[allow(dead_code)]
    pub async fn outcome(self) -> Option<JobResult<u64>> {
        self.outcome.await.ok()
    }
}

#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::Sender<Queued>,
    next_id: Arc<AtomicU64>,
}

pub struct JobWorker {
    rx: mpsc::Receiver<Queued>,
}

impl JobQueue {
    /// A queue holding at most `capacity` jobs that haven't started yet.
    /// `capacity` must be at least 1.
    pub fn channel(capacity: usize) -> (JobQueue, JobWorker) {
        let (tx, rx) = mpsc::channel(capacity);
        let queue = JobQueue {
            tx,
            next_id: Arc::new(AtomicU64::new(1)),
        };
        (queue, JobWorker { rx })
    }

    /// Queues a job without waiting, refusing it when the queue is full.
    pub fn submit(&self, job: AggregationJob) -> JobResult<JobHandle> {
        let (reply, outcome) = oneshot::channel();
        let permit = self.tx.try_reserve().map_err(|e| match e {
            TrySendError::Full(_) => JobError::QueueFull(self.tx.max_capacity()),
            TrySendError::Closed(_) => JobError::WorkerStopped,
        })?;

        // only numbered once accepted
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        permit.send(Queued { id, job, reply });

        log::debug!("Queued aggregation job {}", id);
        Ok(JobHandle { id, outcome })
    }
}

impl JobWorker {
    /// Runs jobs one after another until every queue handle is dropped.
    ///
    /// Failures are logged and reported to the job's handle, never retried.
    pub async fn run<R: Router>(mut self, router: R, store: ResultStore, settings: WalkSettings) {
        log::info!("Aggregation worker is running");

        while let Some(Queued { id, job, reply }) = self.rx.recv().await {
            log::info!(
                "Starting aggregation job {} ({} amenities)",
                id,
                job.elements.len()
            );

            let result = run_job(&router, &store, &settings, job).await;

            match &result {
                Ok(version) => log::info!("Aggregation job {} done, result v{}", id, version),
                Err(e) => log::error!("Aggregation job {} failed: {}", id, e),
            }

            // nobody may be waiting
            reply.send(result).ok();
        }

        log::info!("Aggregation worker stopped");
    }
}

async fn run_job<R: Router>(
    router: &R,
    store: &ResultStore,
    settings: &WalkSettings,
    job: AggregationJob,
) -> JobResult<u64> {
    let aggregation = process_result(router, job.origin, job.elements, settings).await?;
    for (category, count) in aggregation.count.iter() {
        log::debug!("{}: {}", category, count);
    }
    let version = store.put(&aggregation).await?;
    Ok(version)
}
