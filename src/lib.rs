//! docmatch: concurrent document ingestion and keyword matching.
//!
//! Scores every document in a directory against a set of requirement
//! keywords and reports the best-matching document(s).
//!
//! # Architecture
//!
//! The pipeline is built from independent stages connected by a bounded
//! channel:
//! - **Ingestion**: extracts text via [`docmatch_extract`] with at most `K`
//!   documents in flight, grouping records into batches of `B`
//! - **Transfer channel**: holds up to `Q` batches, then a completion signal
//!   that every worker observes once
//! - **Scoring**: `N` workers score batches on the blocking pool into
//!   worker-local shards
//! - **Aggregation**: merges the shards and picks the best score, keeping ties
//!
//! Extraction failures never abort a run; the document scores `0`.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod requirements;
pub mod scoring;

pub use config::{ExtractSettings, MatchConfig, PipelineConfig};
pub use error::{MatchError, Result};
pub use pipeline::aggregate::BestMatch;
pub use pipeline::coordinator::{MatchPipeline, MatchReport, RunSummary};
pub use pipeline::store::ResultStore;
pub use progress::{ProgressCallback, ProgressEvent};
pub use requirements::RequirementSet;

pub use docmatch_extract::{Document, DocumentExtractor, Extractor};
