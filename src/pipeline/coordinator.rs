//! Main pipeline orchestrator that wires all stages together.

use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use docmatch_extract::{Document, Extractor, list_documents};
use futures_util::FutureExt;
use serde::{Serialize, Serializer};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::MatchConfig;
use crate::error::{MatchError, Result};
use crate::pipeline::aggregate::{BestMatch, best_match};
use crate::pipeline::channel::transfer_channel;
use crate::pipeline::ingest::{IngestOutcome, Ingestion, panic_message};
use crate::pipeline::limiter::AdmissionLimiter;
use crate::pipeline::store::ResultStore;
use crate::pipeline::workers::{WorkerReport, run_worker};
use crate::progress::{self, ProgressCallback, ProgressEvent};

/// Counters and timings for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Documents ingested and scored.
    pub documents: usize,
    /// Batches pushed onto the transfer channel.
    pub batches: usize,
    /// Documents recorded as empty text after a failed extraction.
    pub extraction_failures: usize,
    /// Scoring workers.
    pub workers: usize,
    /// Workers that observed the completion signal.
    pub completion_observations: usize,
    /// Highest number of concurrent admissions.
    pub peak_in_flight: usize,
    /// From the start of the run until the producer has pushed the
    /// completion signal and exited.
    #[serde(serialize_with = "as_secs")]
    pub load: Duration,
    /// Time from the completion signal to the final ranking.
    #[serde(serialize_with = "as_secs")]
    pub analyze: Duration,
    /// Whole run.
    #[serde(serialize_with = "as_secs")]
    pub total: Duration,
}

fn as_secs<S: Serializer>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    /// Score per document.
    pub scores: ResultStore,
    /// Maximum score and the documents attaining it.
    pub best: BestMatch,
    /// Counters and timings.
    pub summary: RunSummary,
}

/// Wires ingestion, scoring and aggregation for one requirement set.
///
/// The pipeline is reusable: each [`run`](Self::run) builds fresh stages.
pub struct MatchPipeline<E> {
    config: MatchConfig,
    extractor: Arc<E>,
    cancel: CancellationToken,
    progress: Option<ProgressCallback>,
}

impl<E: Extractor + 'static> MatchPipeline<E> {
    /// Create a pipeline with the given configuration and extractor.
    pub fn new(config: MatchConfig, extractor: E) -> Self {
        Self {
            config,
            extractor: Arc::new(extractor),
            cancel: CancellationToken::new(),
            progress: None,
        }
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Receive progress events.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Returns a clone of the cancellation token.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Signal the pipeline to stop.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Enumerate `dir` and run over every document in it.
    ///
    /// # Errors
    ///
    /// Configuration errors are raised before the directory is read.
    /// Otherwise as [`run`](Self::run), plus enumeration failures.
    pub async fn run_directory(&self, dir: &Path) -> Result<MatchReport> {
        self.config.validate()?;
        let documents = list_documents(dir).await?;
        info!(dir = %dir.display(), documents = documents.len(), "documents enumerated");
        self.run(documents).await
    }

    /// Run the pipeline over `documents`.
    ///
    /// # Errors
    ///
    /// - [`MatchError::Config`] for an invalid configuration or duplicate
    ///   document ids, before any document is extracted
    /// - [`MatchError::Cancelled`] if the token fires first
    /// - [`MatchError::EmptyResult`] if there were no documents
    /// - [`MatchError::Pipeline`] if a stage dies or loses a document
    pub async fn run(&self, documents: Vec<Document>) -> Result<MatchReport> {
        let requirements = Arc::new(self.config.validate()?);
        check_unique_ids(&documents)?;

        let pipeline = &self.config.pipeline;
        let workers = pipeline.effective_workers();
        let expected = documents.len();
        let run_cancel = self.cancel.child_token();
        // Stops any stage still running if this future is dropped.
        let _stop_stages = run_cancel.clone().drop_guard();
        let started = Instant::now();

        info!(
            documents = expected,
            requirements = %requirements,
            workers,
            "match pipeline started"
        );
        progress::emit(
            self.progress.as_ref(),
            ProgressEvent::Enumerated { total: expected },
        );

        let limiter = AdmissionLimiter::new(pipeline.admission_limit)?;
        let (sender, receiver) = transfer_channel(pipeline.queue_capacity, workers)?;

        let producer: JoinHandle<Result<IngestOutcome>> = {
            let ingestion = Ingestion {
                extractor: Arc::clone(&self.extractor),
                limiter: limiter.clone(),
                batch_size: pipeline.batch_size,
                progress: self.progress.clone(),
                cancel: run_cancel.clone(),
            };
            let cancel = run_cancel.clone();
            tokio::spawn(async move {
                let result = ingestion.run(documents, sender).await;
                if result.is_err() {
                    // Workers would otherwise wait for a completion signal
                    // that never comes.
                    cancel.cancel();
                }
                result
            })
        };

        let consumers: Vec<JoinHandle<Result<WorkerReport>>> = (0..workers)
            .map(|worker| {
                let cancel = run_cancel.clone();
                let scoring = run_worker(
                    worker,
                    receiver.clone(),
                    Arc::clone(&requirements),
                    self.progress.clone(),
                    run_cancel.clone(),
                );
                tokio::spawn(async move {
                    let result = AssertUnwindSafe(scoring)
                        .catch_unwind()
                        .await
                        .unwrap_or_else(|panic| {
                            Err(MatchError::Pipeline(format!(
                                "scoring worker {worker} panicked: {}",
                                panic_message(&*panic)
                            )))
                        });
                    if result.is_err() {
                        // The producer would otherwise wait on a full
                        // channel that nobody drains.
                        cancel.cancel();
                    }
                    result
                })
            })
            .collect();

        let produced = join_stage(producer, "ingestion").await;
        let loaded = Instant::now();
        if produced.is_err() {
            run_cancel.cancel();
        }

        let mut errors: Vec<MatchError> =
            produced.as_ref().err().map(clone_error).into_iter().collect();
        let mut shards = Vec::with_capacity(workers);
        for handle in consumers {
            match join_stage(handle, "scoring").await {
                Ok(report) => shards.push(report.shard),
                Err(err) => {
                    run_cancel.cancel();
                    errors.push(err);
                }
            }
        }

        if self.cancel.is_cancelled() {
            info!("match pipeline cancelled");
            return Err(MatchError::Cancelled);
        }
        if let Some(err) = root_cause(errors) {
            error!(error = %err, "match pipeline failed");
            return Err(err);
        }
        let outcome = produced?;

        let scores = ResultStore::merge(shards)?;
        if scores.len() != expected {
            return Err(MatchError::Pipeline(format!(
                "scored {} of {expected} documents",
                scores.len()
            )));
        }
        let completion_observations = receiver.completion_observations();
        if completion_observations != workers {
            return Err(MatchError::Pipeline(format!(
                "{completion_observations} of {workers} workers observed completion"
            )));
        }
        let best = best_match(&scores)?;
        let finished = Instant::now();

        let summary = RunSummary {
            documents: outcome.documents,
            batches: outcome.batches,
            extraction_failures: outcome.extraction_failures,
            workers,
            completion_observations,
            peak_in_flight: limiter.peak(),
            load: loaded.duration_since(started),
            analyze: finished.duration_since(loaded),
            total: finished.duration_since(started),
        };
        info!(
            documents = summary.documents,
            best_score = best.score,
            best = ?best.documents,
            total_ms = summary.total.as_millis() as u64,
            "match pipeline finished"
        );

        Ok(MatchReport {
            scores,
            best,
            summary,
        })
    }
}

/// The first error that is not a knock-on cancellation of another stage.
fn root_cause(errors: Vec<MatchError>) -> Option<MatchError> {
    let mut cancelled = None;
    for err in errors {
        if matches!(err, MatchError::Cancelled) {
            cancelled.get_or_insert(err);
        } else {
            return Some(err);
        }
    }
    cancelled
}

async fn join_stage<T>(handle: JoinHandle<Result<T>>, stage: &str) -> Result<T> {
    handle
        .await
        .map_err(|e| MatchError::Pipeline(format!("{stage} task failed: {e}")))?
}

// `MatchError` wraps non-Clone sources, so keep the variant and message.
fn clone_error(err: &MatchError) -> MatchError {
    match err {
        MatchError::Config(msg) => MatchError::Config(msg.clone()),
        MatchError::EmptyResult => MatchError::EmptyResult,
        MatchError::Cancelled => MatchError::Cancelled,
        other => MatchError::Pipeline(other.to_string()),
    }
}

fn check_unique_ids(documents: &[Document]) -> Result<()> {
    let mut seen = HashSet::with_capacity(documents.len());
    for document in documents {
        if !seen.insert(document.id.as_str()) {
            return Err(MatchError::Config(format!(
                "duplicate document id: {}",
                document.id
            )));
        }
    }
    Ok(())
}
