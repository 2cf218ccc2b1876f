//! The ingestion-and-scoring pipeline.
//!
//! ```text
//! documents ─▶ ingest (≤ K extractions) ─▶ transfer channel (≤ Q batches)
//!                                             │
//!                      ┌──────────────────────┼──────────────────────┐
//!                      ▼                      ▼                      ▼
//!                  worker 0               worker 1       …       worker N-1
//!                      └──────── shards ──────┴──────────────────────┘
//!                                             ▼
//!                                   aggregate ─▶ MatchReport
//! ```

pub mod aggregate;
pub mod channel;
pub mod coordinator;
pub mod ingest;
pub mod limiter;
pub mod messages;
pub mod store;
pub mod workers;
