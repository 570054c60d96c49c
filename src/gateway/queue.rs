//! Request queue feeding the dispatch loop.
//!
//! Callers [`submit`](RequestQueue::submit) an operation under a bucket key
//! and await its result. Entries are handed to a dispatch lane over an
//! unbounded channel; the lane runs them one at a time, to completion, in
//! arrival order. Each entry resolves its own one-shot channel exactly once.
//!
//! With [`DispatchMode::Global`] every bucket shares one lane, so dispatch is
//! globally sequential and FIFO. [`DispatchMode::PerBucket`] gives each bucket
//! its own lane: buckets proceed concurrently while order inside a bucket is
//! unchanged.

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::str::FromStr;

use futures_util::FutureExt;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::GatewayError;
use crate::rate_limit::BucketKey;

type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Lane name used by [`DispatchMode::Global`].
const GLOBAL_LANE: &str = "*";

/// How queued requests are spread over dispatch loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// One dispatch loop for every bucket.
    #[default]
    Global,
    /// One dispatch loop per bucket.
    PerBucket,
}

impl FromStr for DispatchMode {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(DispatchMode::Global),
            "per-bucket" | "per_bucket" | "bucket" => Ok(DispatchMode::PerBucket),
            other => Err(GatewayError::InvalidArgument(format!(
                "unknown dispatch mode: {other}"
            ))),
        }
    }
}

/// A pending unit of work bound to one bucket.
struct QueuedRequest {
    bucket: BucketKey,
    job: Job,
    enqueued_at: Instant,
}

struct Lane {
    sender: mpsc::UnboundedSender<QueuedRequest>,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Lanes {
    open: HashMap<String, Lane>,
    closed: bool,
}

/// FIFO admission point for upstream calls.
///
/// Lanes are spawned lazily on the current tokio runtime the first time a
/// bucket (or, in global mode, any bucket) submits work.
pub struct RequestQueue {
    mode: DispatchMode,
    lanes: Mutex<Lanes>,
}

impl RequestQueue {
    /// Create an empty queue.
    pub fn new(mode: DispatchMode) -> Self {
        Self {
            mode,
            lanes: Mutex::new(Lanes::default()),
        }
    }

    /// Get the dispatch mode.
    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Queue `operation` on `bucket` and wait for its result.
    ///
    /// The operation starts only after every entry queued before it on the same
    /// lane has finished. A panicking operation rejects this entry with
    /// [`GatewayError::RequestDropped`] and leaves the lane running.
    pub async fn submit<T, F, Fut>(&self, bucket: BucketKey, operation: F) -> Result<T, GatewayError>
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, GatewayError>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job: Job = Box::pin(async move {
            let result = operation().await;
            // The caller may have stopped waiting.
            let _ = tx.send(result);
        });

        self.enqueue(QueuedRequest {
            bucket,
            job,
            enqueued_at: Instant::now(),
        })
        .await?;

        rx.await.map_err(|_| GatewayError::RequestDropped)?
    }

    /// Number of dispatch lanes started so far.
    pub async fn lanes(&self) -> usize {
        self.lanes.lock().await.open.len()
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub async fn is_closed(&self) -> bool {
        self.lanes.lock().await.closed
    }

    /// Stop accepting work, let queued entries finish, and join every lane.
    pub async fn shutdown(&self) {
        let lanes: Vec<(String, Lane)> = {
            let mut lanes = self.lanes.lock().await;
            lanes.closed = true;
            lanes.open.drain().collect()
        };

        for (name, lane) in lanes {
            drop(lane.sender);
            if let Err(e) = lane.handle.await {
                tracing::error!("Dispatch lane {} ended abnormally: {}", name, e);
            }
        }
        tracing::info!("Request queue shut down");
    }

    async fn enqueue(&self, request: QueuedRequest) -> Result<(), GatewayError> {
        let lane_name = match self.mode {
            DispatchMode::Global => GLOBAL_LANE.to_string(),
            DispatchMode::PerBucket => request.bucket.as_str().to_string(),
        };

        let mut lanes = self.lanes.lock().await;
        if lanes.closed {
            return Err(GatewayError::GatewayClosed);
        }

        let lane = lanes.open.entry(lane_name.clone()).or_insert_with(|| {
            let (sender, receiver) = mpsc::unbounded_channel();
            let handle = tokio::spawn(dispatch_loop(lane_name.clone(), receiver));
            tracing::debug!("Started dispatch lane {}", lane_name);
            Lane { sender, handle }
        });

        lane.sender
            .send(request)
            .map_err(|_| GatewayError::GatewayClosed)
    }
}

impl std::fmt::Debug for RequestQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestQueue")
            .field("mode", &self.mode)
            .finish()
    }
}

/// Drain one lane until every sender is gone.
async fn dispatch_loop(lane: String, mut receiver: mpsc::UnboundedReceiver<QueuedRequest>) {
    while let Some(request) = receiver.recv().await {
        tracing::debug!(
            "Dispatching request for bucket {} after {:?} in queue",
            request.bucket,
            request.enqueued_at.elapsed()
        );
        if AssertUnwindSafe(request.job).catch_unwind().await.is_err() {
            tracing::error!("Queued request for bucket {} panicked", request.bucket);
        }
    }
    tracing::debug!("Dispatch lane {} drained", lane);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    type Log = Arc<std::sync::Mutex<Vec<String>>>;

    fn record(log: &Log, entry: impl Into<String>) {
        log.lock().unwrap().push(entry.into());
    }

    #[tokio::test]
    async fn test_fifo_within_bucket() {
        let queue = RequestQueue::new(DispatchMode::Global);
        let log: Log = Arc::default();
        let bucket = BucketKey::new("match", "americas");

        let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
        let (r1, r2, r3) = tokio::join!(
            queue.submit(bucket.clone(), move || async move {
                tokio::time::sleep(Duration::from_millis(30)).await;
                record(&l1, "r1");
                Ok(1)
            }),
            queue.submit(bucket.clone(), move || async move {
                record(&l2, "r2");
                Ok(2)
            }),
            queue.submit(bucket.clone(), move || async move {
                record(&l3, "r3");
                Ok(3)
            }),
        );

        assert_eq!((r1.unwrap(), r2.unwrap(), r3.unwrap()), (1, 2, 3));
        assert_eq!(*log.lock().unwrap(), vec!["r1", "r2", "r3"]);
    }

    #[tokio::test]
    async fn test_failure_rejects_only_its_entry() {
        let queue = RequestQueue::new(DispatchMode::Global);
        let bucket = BucketKey::named("ddragon");

        let (bad, good) = tokio::join!(
            queue.submit(bucket.clone(), || async {
                Err::<u32, _>(GatewayError::ServiceUnavailable)
            }),
            queue.submit(bucket.clone(), || async { Ok(5u32) }),
        );

        assert!(matches!(bad, Err(GatewayError::ServiceUnavailable)));
        assert_eq!(good.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_panic_rejects_entry_and_lane_survives() {
        let queue = RequestQueue::new(DispatchMode::Global);
        let bucket = BucketKey::named("ddragon");

        let panicked = queue
            .submit(bucket.clone(), || async {
                if true {
                    panic!("operation blew up");
                }
                Ok(0u32)
            })
            .await;
        assert!(matches!(panicked, Err(GatewayError::RequestDropped)));

        let next = queue.submit(bucket, || async { Ok(9u32) }).await;
        assert_eq!(next.unwrap(), 9);
        assert_eq!(queue.lanes().await, 1);
    }

    #[tokio::test]
    async fn test_global_mode_serializes_buckets() {
        let queue = RequestQueue::new(DispatchMode::Global);
        let log: Log = Arc::default();

        let (l1, l2) = (log.clone(), log.clone());
        let (a, b) = tokio::join!(
            queue.submit(BucketKey::new("summoner", "na1"), move || async move {
                tokio::time::sleep(Duration::from_millis(30)).await;
                record(&l1, "na1");
                Ok(())
            }),
            queue.submit(BucketKey::new("summoner", "euw1"), move || async move {
                record(&l2, "euw1");
                Ok(())
            }),
        );

        a.unwrap();
        b.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["na1", "euw1"]);
        assert_eq!(queue.lanes().await, 1);
    }

    #[tokio::test]
    async fn test_per_bucket_mode_runs_buckets_independently() {
        let queue = RequestQueue::new(DispatchMode::PerBucket);
        let log: Log = Arc::default();

        let (l1, l2) = (log.clone(), log.clone());
        let (a, b) = tokio::join!(
            queue.submit(BucketKey::new("summoner", "na1"), move || async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                record(&l1, "na1");
                Ok(())
            }),
            queue.submit(BucketKey::new("summoner", "euw1"), move || async move {
                record(&l2, "euw1");
                Ok(())
            }),
        );

        a.unwrap();
        b.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["euw1", "na1"]);
        assert_eq!(queue.lanes().await, 2);
    }

    #[tokio::test]
    async fn test_shutdown_drains_and_rejects_new_work() {
        let queue = Arc::new(RequestQueue::new(DispatchMode::Global));
        let bucket = BucketKey::named("ddragon");

        let pending = {
            let queue = queue.clone();
            let bucket = bucket.clone();
            tokio::spawn(async move {
                queue
                    .submit(bucket, || async {
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok(42u32)
                    })
                    .await
            })
        };
        // Let the spawned submit reach the lane.
        tokio::time::sleep(Duration::from_millis(5)).await;

        queue.shutdown().await;
        assert_eq!(pending.await.unwrap().unwrap(), 42);
        assert!(queue.is_closed().await);

        let rejected = queue.submit(bucket, || async { Ok(1u32) }).await;
        assert!(matches!(rejected, Err(GatewayError::GatewayClosed)));
    }

    #[test]
    fn test_dispatch_mode_parsing() {
        assert_eq!("global".parse::<DispatchMode>().unwrap(), DispatchMode::Global);
        assert_eq!("Per-Bucket".parse::<DispatchMode>().unwrap(), DispatchMode::PerBucket);
        assert!("fastest".parse::<DispatchMode>().is_err());
    }
}
