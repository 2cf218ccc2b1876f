//! Ingestion stage: extract every document under the admission limit and
//! hand the results to the scoring stage in batches.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use docmatch_extract::{Document, ExtractionError, Extractor};
use futures_util::FutureExt;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::error::{MatchError, Result};
use crate::pipeline::channel::BatchSender;
use crate::pipeline::limiter::{Admission, AdmissionLimiter};
use crate::pipeline::messages::ExtractedRecord;
use crate::progress::{self, ProgressCallback, ProgressEvent};

/// What the ingestion stage did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOutcome {
    /// Records appended to batches.
    pub documents: usize,
    /// Batches pushed onto the transfer channel.
    pub batches: usize,
    /// Documents whose extraction failed and were recorded as empty text.
    pub extraction_failures: usize,
}

/// Settings and collaborators for one ingestion run.
pub struct Ingestion<E> {
    pub extractor: Arc<E>,
    pub limiter: AdmissionLimiter,
    /// Records per full batch.
    pub batch_size: usize,
    pub progress: Option<ProgressCallback>,
    pub cancel: CancellationToken,
}

type Extracted = (String, std::result::Result<String, ExtractionError>, Admission);

impl<E: Extractor + 'static> Ingestion<E> {
    /// Extract `documents` and push them through `sender`, ending with the
    /// completion signal.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Cancelled`] if the token fires, or
    /// [`MatchError::Pipeline`] if the channel closes or a task dies. The
    /// completion signal is not pushed in either case.
    pub async fn run(self, documents: Vec<Document>, sender: BatchSender) -> Result<IngestOutcome> {
        info!(
            documents = documents.len(),
            admission_limit = self.limiter.capacity(),
            batch_size = self.batch_size,
            extractor = self.extractor.name(),
            "ingestion started"
        );

        let mut tasks = JoinSet::new();
        for document in documents {
            let extractor = Arc::clone(&self.extractor);
            let limiter = self.limiter.clone();
            let cancel = self.cancel.clone();
            tasks.spawn(async move {
                let admission = limiter.acquire(&cancel).await?;
                trace!(id = %document.id, "extraction admitted");
                let text = AssertUnwindSafe(extractor.extract(&document))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|panic| Err(ExtractionError::Panicked(panic_message(&*panic))));
                Ok::<Extracted, MatchError>((document.id, text, admission))
            });
        }

        let result = self.drain(&mut tasks, sender).await;
        if result.is_err() {
            tasks.shutdown().await;
        }
        result
    }

    async fn drain(
        &self,
        tasks: &mut JoinSet<Result<Extracted>>,
        mut sender: BatchSender,
    ) -> Result<IngestOutcome> {
        let mut outcome = IngestOutcome::default();
        let mut batch = Vec::with_capacity(self.batch_size);

        loop {
            let joined = tokio::select! {
                biased;
                () = self.cancel.cancelled() => return Err(MatchError::Cancelled),
                joined = tasks.join_next() => joined,
            };
            let Some(joined) = joined else {
                break;
            };
            let (id, text, admission) = joined
                .map_err(|e| MatchError::Pipeline(format!("extraction task failed: {e}")))??;

            let failed = text.is_err();
            let text = text.unwrap_or_else(|err| {
                warn!(id = %id, error = %err, "extraction failed; scoring as empty text");
                String::new()
            });
            if failed {
                outcome.extraction_failures += 1;
            }
            progress::emit(
                self.progress.as_ref(),
                ProgressEvent::DocumentExtracted {
                    id: id.clone(),
                    failed,
                },
            );
            batch.push(ExtractedRecord { id, text });
            outcome.documents += 1;
            drop(admission);

            if batch.len() == self.batch_size {
                let full = std::mem::replace(&mut batch, Vec::with_capacity(self.batch_size));
                self.push(&mut sender, full).await?;
            }
        }

        if !batch.is_empty() {
            self.push(&mut sender, batch).await?;
        }
        outcome.batches = sender.finish(&self.cancel).await?;

        info!(
            documents = outcome.documents,
            batches = outcome.batches,
            failures = outcome.extraction_failures,
            peak_in_flight = self.limiter.peak(),
            "ingestion finished"
        );
        Ok(outcome)
    }

    async fn push(&self, sender: &mut BatchSender, records: Vec<ExtractedRecord>) -> Result<()> {
        let len = records.len();
        let seq = sender.push(records, &self.cancel).await?;
        debug!(seq, len, "batch queued");
        progress::emit(self.progress.as_ref(), ProgressEvent::BatchQueued { seq, len });
        Ok(())
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "task panicked".to_owned()
    }
}
