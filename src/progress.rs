//! Progress event types for a matching run.
//!
//! Provides callback-based progress reporting that decouples the pipeline
//! from presentation (the CLI drives an indicatif bar from these).

use std::sync::Arc;

/// Progress events emitted while the pipeline runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Documents were enumerated and are about to be ingested.
    Enumerated {
        /// Number of documents in the run.
        total: usize,
    },
    /// One document finished extraction and was appended to a batch.
    DocumentExtracted {
        /// Document id.
        id: String,
        /// Whether extraction failed and the text was recorded as empty.
        failed: bool,
    },
    /// A batch was pushed onto the transfer channel.
    BatchQueued {
        /// Push order, starting at 0.
        seq: usize,
        /// Records in the batch.
        len: usize,
    },
    /// A worker finished scoring a batch.
    BatchScored {
        /// Push order of the scored batch.
        seq: usize,
        /// Worker that scored it.
        worker: usize,
        /// Records in the batch.
        len: usize,
    },
}

/// Callback type for receiving progress events.
///
/// Invoked from the producer and from every worker, so it must be cheap and
/// thread-safe.
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Invoke `callback` if one is installed.
pub(crate) fn emit(callback: Option<&ProgressCallback>, event: ProgressEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use std::sync::Mutex;

    #[test]
    fn callback_receives_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = Arc::clone(&events);

        let callback: ProgressCallback = Arc::new(move |event| {
            let Ok(mut guard) = events_clone.lock() else {
                return;
            };
            guard.push(event);
        });

        emit(Some(&callback), ProgressEvent::Enumerated { total: 3 });
        emit(
            Some(&callback),
            ProgressEvent::BatchQueued { seq: 0, len: 3 },
        );
        emit(None, ProgressEvent::Enumerated { total: 9 });

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0], ProgressEvent::Enumerated { total: 3 });
        assert_eq!(captured[1], ProgressEvent::BatchQueued { seq: 0, len: 3 });
    }

    #[test]
    fn callback_is_shareable_across_threads() {
        let count = Arc::new(Mutex::new(0usize));
        let count_clone = Arc::clone(&count);
        let callback: ProgressCallback = Arc::new(move |_| {
            if let Ok(mut n) = count_clone.lock() {
                *n += 1;
            }
        });

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let cb = Arc::clone(&callback);
                std::thread::spawn(move || {
                    cb(ProgressEvent::BatchScored { seq: worker, worker, len: 1 });
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(*count.lock().unwrap(), 4);
    }
}
