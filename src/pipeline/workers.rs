//! Scoring stage: a fixed pool of workers draining the transfer channel.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{MatchError, Result};
use crate::pipeline::channel::BatchReceiver;
use crate::pipeline::messages::{Batch, Transfer};
use crate::pipeline::store::ResultShard;
use crate::progress::{self, ProgressCallback, ProgressEvent};
use crate::requirements::RequirementSet;
use crate::scoring;

/// What one worker produced.
#[derive(Debug)]
pub struct WorkerReport {
    /// Worker index.
    pub worker: usize,
    /// Scores this worker recorded.
    pub shard: ResultShard,
    /// Batches this worker scored.
    pub batches: usize,
}

/// Run one scoring worker until it observes the completion signal.
///
/// Each batch is scored on the blocking pool so CPU-bound work never stalls
/// the async executor.
///
/// # Errors
///
/// Returns [`MatchError::Cancelled`] if the token fires while waiting for a
/// batch, or [`MatchError::Pipeline`] if scoring fails.
pub async fn run_worker(
    worker: usize,
    receiver: BatchReceiver,
    requirements: Arc<RequirementSet>,
    progress: Option<ProgressCallback>,
    cancel: CancellationToken,
) -> Result<WorkerReport> {
    debug!(worker, "scoring worker started");
    let mut shard = ResultShard::default();
    let mut batches = 0;

    loop {
        let batch = match receiver.pop(&cancel).await? {
            Transfer::Done => break,
            Transfer::Batch(batch) => batch,
        };
        let seq = batch.seq;
        let len = batch.len();

        let reqs = Arc::clone(&requirements);
        let scored = tokio::task::spawn_blocking(move || score_batch(batch, &reqs))
            .await
            .map_err(|e| MatchError::Pipeline(format!("scoring task failed: {e}")))?;
        for (id, score) in scored {
            shard.insert(id, score)?;
        }

        batches += 1;
        debug!(worker, seq, len, "batch scored");
        progress::emit(
            progress.as_ref(),
            ProgressEvent::BatchScored { seq, worker, len },
        );
    }

    info!(worker, batches, documents = shard.len(), "scoring worker finished");
    Ok(WorkerReport {
        worker,
        shard,
        batches,
    })
}

fn score_batch(batch: Batch, requirements: &RequirementSet) -> Vec<(String, f64)> {
    batch
        .records
        .into_iter()
        .map(|record| {
            let score = scoring::score(&record.text, requirements);
            (record.id, score)
        })
        .collect()
}
