//! Admission limiter for the extraction stage.
//!
//! A counting semaphore of capacity `K`. An [`Admission`] is held for as
//! long as a document is being extracted or waiting to be appended to a
//! batch; dropping it frees the slot.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

use crate::error::{MatchError, Result};

#[derive(Debug)]
struct Counters {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

/// Bounds the number of documents in the extract-and-append section.
#[derive(Debug, Clone)]
pub struct AdmissionLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    counters: Arc<Counters>,
}

/// A held admission slot. Released on drop.
#[derive(Debug)]
pub struct Admission {
    _permit: OwnedSemaphorePermit,
    counters: Arc<Counters>,
}

impl Drop for Admission {
    fn drop(&mut self) {
        self.counters.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

impl AdmissionLimiter {
    /// Create a limiter with `capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Config`] if `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(MatchError::Config(
                "admission_limit must be greater than 0".into(),
            ));
        }
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            counters: Arc::new(Counters {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }),
        })
    }

    /// Wait for a free slot.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Cancelled`] if `cancel` fires first.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<Admission> {
        let permit = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(MatchError::Cancelled),
            permit = Arc::clone(&self.semaphore).acquire_owned() => permit,
        };
        let permit = permit.map_err(|_| MatchError::Pipeline("admission limiter closed".into()))?;

        let now = self.counters.in_flight.fetch_add(1, Ordering::AcqRel) + 1;
        self.counters.peak.fetch_max(now, Ordering::AcqRel);
        Ok(Admission {
            _permit: permit,
            counters: Arc::clone(&self.counters),
        })
    }

    /// Configured number of slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently held.
    pub fn in_flight(&self) -> usize {
        self.counters.in_flight.load(Ordering::Acquire)
    }

    /// Highest number of slots held at once since creation.
    pub fn peak(&self) -> usize {
        self.counters.peak.load(Ordering::Acquire)
    }
}
