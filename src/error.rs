//! Error types for the docmatch pipeline.

use docmatch_extract::ExtractionError;

/// Top-level error type for the matching pipeline.
///
/// Per-document extraction failures never surface here; they are recovered
/// inside the ingestion stage as empty text.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// Invalid configuration (empty requirements, zero-sized knobs, bad
    /// TOML). Raised before the pipeline starts.
    #[error("config error: {0}")]
    Config(String),

    /// No documents were processed, so there is nothing to rank.
    #[error("no documents were processed")]
    EmptyResult,

    /// The pipeline was cancelled before it drained.
    #[error("pipeline cancelled")]
    Cancelled,

    /// Pipeline coordination error (task failure or broken invariant).
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// Document enumeration failed.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, MatchError>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn display_config() {
        let err = MatchError::Config("batch_size must be greater than 0".into());
        assert_eq!(err.to_string(), "config error: batch_size must be greater than 0");
    }

    #[test]
    fn display_empty_result() {
        assert_eq!(MatchError::EmptyResult.to_string(), "no documents were processed");
    }

    #[test]
    fn extraction_error_converts() {
        let err: MatchError = ExtractionError::Io("resumes: not found".into()).into();
        assert!(matches!(err, MatchError::Extraction(_)));
        assert_eq!(err.to_string(), "extraction error: I/O error: resumes: not found");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MatchError>();
    }
}
