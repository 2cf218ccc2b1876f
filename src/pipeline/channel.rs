//! Bounded transfer channel between ingestion and scoring.
//!
//! One producer pushes [`Transfer::Batch`] values followed by a single
//! [`Transfer::Done`]. `N` consumers share the receiving end. A consumer that
//! pops `Done` relays it for the next consumer, except the last of the `N`,
//! so every consumer observes it exactly once and the channel ends empty.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use crate::error::{MatchError, Result};
use crate::pipeline::messages::{Batch, ExtractedRecord, Transfer};

/// Create a channel holding at most `capacity` values, drained by
/// `consumers` workers.
///
/// # Errors
///
/// Returns [`MatchError::Config`] if either argument is 0.
pub fn transfer_channel(
    capacity: usize,
    consumers: usize,
) -> Result<(BatchSender, BatchReceiver)> {
    if capacity == 0 {
        return Err(MatchError::Config(
            "queue_capacity must be greater than 0".into(),
        ));
    }
    if consumers == 0 {
        return Err(MatchError::Config("workers must be greater than 0".into()));
    }
    let (tx, rx) = mpsc::channel(capacity);
    let sender = BatchSender {
        tx: tx.clone(),
        next_seq: 0,
    };
    let receiver = BatchReceiver {
        rx: Arc::new(Mutex::new(rx)),
        relay: tx,
        consumers,
        observed: Arc::new(AtomicUsize::new(0)),
    };
    Ok((sender, receiver))
}

/// Producing end. Owned by the ingestion stage.
#[derive(Debug)]
pub struct BatchSender {
    tx: mpsc::Sender<Transfer>,
    next_seq: usize,
}

impl BatchSender {
    /// Push a batch, waiting while the channel is full. Returns the batch's
    /// sequence number.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Cancelled`] if `cancel` fires while waiting, or
    /// [`MatchError::Pipeline`] for an empty batch or a closed channel.
    pub async fn push(
        &mut self,
        records: Vec<ExtractedRecord>,
        cancel: &CancellationToken,
    ) -> Result<usize> {
        if records.is_empty() {
            return Err(MatchError::Pipeline("refusing to push an empty batch".into()));
        }
        let seq = self.next_seq;
        self.send(Transfer::Batch(Batch { seq, records }), cancel)
            .await?;
        self.next_seq += 1;
        Ok(seq)
    }

    /// Push the completion signal. No further pushes are possible.
    ///
    /// # Errors
    ///
    /// Same as [`push`](Self::push).
    pub async fn finish(self, cancel: &CancellationToken) -> Result<usize> {
        self.send(Transfer::Done, cancel).await?;
        Ok(self.next_seq)
    }

    /// Batches pushed so far.
    pub fn pushed(&self) -> usize {
        self.next_seq
    }

    async fn send(&self, value: Transfer, cancel: &CancellationToken) -> Result<()> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(MatchError::Cancelled),
            sent = self.tx.send(value) => {
                sent.map_err(|_| MatchError::Pipeline("transfer channel closed".into()))
            }
        }
    }
}

/// Consuming end. Cloned once per worker.
#[derive(Debug, Clone)]
pub struct BatchReceiver {
    rx: Arc<Mutex<mpsc::Receiver<Transfer>>>,
    relay: mpsc::Sender<Transfer>,
    consumers: usize,
    observed: Arc<AtomicUsize>,
}

impl BatchReceiver {
    /// Pop the next value, waiting while the channel is empty.
    ///
    /// On [`Transfer::Done`] the signal is relayed unless every registered
    /// consumer has now seen it.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Cancelled`] if `cancel` fires while waiting.
    pub async fn pop(&self, cancel: &CancellationToken) -> Result<Transfer> {
        let mut rx = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(MatchError::Cancelled),
            guard = self.rx.lock() => guard,
        };
        let value = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(MatchError::Cancelled),
            value = rx.recv() => value,
        };
        match value {
            Some(Transfer::Done) => {
                let seen = self.observed.fetch_add(1, Ordering::AcqRel) + 1;
                if seen < self.consumers {
                    // The lock is still held and `Done` was the only value
                    // left, so the slot it vacated is free.
                    self.relay.try_send(Transfer::Done).map_err(|e| {
                        MatchError::Pipeline(format!("failed to relay completion signal: {e}"))
                    })?;
                }
                Ok(Transfer::Done)
            }
            Some(batch) => Ok(batch),
            None => Err(MatchError::Pipeline("transfer channel closed".into())),
        }
    }

    /// Consumers that have observed the completion signal.
    pub fn completion_observations(&self) -> usize {
        self.observed.load(Ordering::Acquire)
    }

    /// Values currently buffered.
    pub fn buffered(&self) -> usize {
        self.relay.max_capacity() - self.relay.capacity()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use std::time::Duration;

    fn record(id: &str) -> ExtractedRecord {
        ExtractedRecord {
            id: id.into(),
            text: String::new(),
        }
    }

    #[test]
    fn zero_sizes_rejected() {
        assert!(transfer_channel(0, 1).is_err());
        assert!(transfer_channel(1, 0).is_err());
    }

    #[tokio::test]
    async fn fifo_with_sequence_numbers() {
        let (mut tx, rx) = transfer_channel(4, 1).unwrap();
        let cancel = CancellationToken::new();
        assert_eq!(tx.push(vec![record("a")], &cancel).await.unwrap(), 0);
        assert_eq!(tx.push(vec![record("b")], &cancel).await.unwrap(), 1);
        assert_eq!(tx.finish(&cancel).await.unwrap(), 2);

        let Transfer::Batch(first) = rx.pop(&cancel).await.unwrap() else {
            panic!("expected batch");
        };
        let Transfer::Batch(second) = rx.pop(&cancel).await.unwrap() else {
            panic!("expected batch");
        };
        assert_eq!((first.seq, first.records[0].id.as_str()), (0, "a"));
        assert_eq!((second.seq, second.records[0].id.as_str()), (1, "b"));
        assert_eq!(rx.pop(&cancel).await.unwrap(), Transfer::Done);
        assert_eq!(rx.completion_observations(), 1);
        assert_eq!(rx.buffered(), 0);
    }

    #[tokio::test]
    async fn empty_batch_rejected() {
        let (mut tx, _rx) = transfer_channel(1, 1).unwrap();
        let err = tx.push(Vec::new(), &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, MatchError::Pipeline(_)));
        assert_eq!(tx.pushed(), 0);
    }

    #[tokio::test]
    async fn done_is_relayed_to_every_consumer_once() {
        let (tx, rx) = transfer_channel(1, 3).unwrap();
        let cancel = CancellationToken::new();
        tx.finish(&cancel).await.unwrap();

        for expected in 1..=3 {
            assert_eq!(rx.pop(&cancel).await.unwrap(), Transfer::Done);
            assert_eq!(rx.completion_observations(), expected);
        }
        assert_eq!(rx.buffered(), 0);
    }

    #[tokio::test]
    async fn full_channel_applies_backpressure() {
        let (mut tx, rx) = transfer_channel(1, 1).unwrap();
        let cancel = CancellationToken::new();
        tx.push(vec![record("a")], &cancel).await.unwrap();

        let blocked = tokio::time::timeout(
            Duration::from_millis(30),
            tx.push(vec![record("b")], &cancel),
        )
        .await;
        assert!(blocked.is_err(), "push into a full channel must wait");

        rx.pop(&cancel).await.unwrap();
        tx.push(vec![record("b")], &cancel).await.unwrap();
    }

    #[tokio::test]
    async fn cancel_unblocks_pop_on_empty_channel() {
        let (_tx, rx) = transfer_channel(1, 1).unwrap();
        let cancel = CancellationToken::new();
        let popper = {
            let cancel = cancel.clone();
            tokio::spawn(async move { rx.pop(&cancel).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        let result = tokio::time::timeout(Duration::from_secs(1), popper)
            .await
            .expect("pop returns promptly")
            .unwrap();
        assert!(matches!(result, Err(MatchError::Cancelled)));
    }

    #[tokio::test]
    async fn cancel_unblocks_push_into_full_channel() {
        let (mut tx, _rx) = transfer_channel(1, 1).unwrap();
        let cancel = CancellationToken::new();
        tx.push(vec![record("a")], &cancel).await.unwrap();

        let pusher = {
            let cancel = cancel.clone();
            tokio::spawn(async move { tx.push(vec![record("b")], &cancel).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        let result = tokio::time::timeout(Duration::from_secs(1), pusher)
            .await
            .expect("push returns promptly")
            .unwrap();
        assert!(matches!(result, Err(MatchError::Cancelled)));
    }
}
