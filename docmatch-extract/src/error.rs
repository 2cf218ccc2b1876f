//! Error types for the docmatch-extract crate.
//!
//! Messages are stable strings suitable for logs and user-facing summaries.
//! Every variant is recoverable from the pipeline's point of view: a failed
//! extraction yields empty text for that one document.

/// Errors that can occur while enumerating or extracting documents.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// Reading a file or directory failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// The document's format is not one the extractor understands.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The PDF could not be loaded or a page could not be read.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Tesseract ran but failed to recognise the input.
    #[error("OCR error: {0}")]
    Ocr(String),

    /// No tesseract binary was found, so OCR-backed formats cannot be read.
    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),

    /// An extraction step exceeded its time limit.
    #[error("extraction timed out: {0}")]
    Timeout(String),

    /// Invalid extraction configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The extractor panicked while handling the document.
    #[error("extractor panicked: {0}")]
    Panicked(String),
}

/// Convenience type alias for docmatch-extract results.
pub type Result<T> = std::result::Result<T, ExtractionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_io() {
        let err = ExtractionError::Io("permission denied".into());
        assert_eq!(err.to_string(), "I/O error: permission denied");
    }

    #[test]
    fn display_unsupported_format() {
        let err = ExtractionError::UnsupportedFormat("notes.docx".into());
        assert_eq!(err.to_string(), "unsupported format: notes.docx");
    }

    #[test]
    fn display_ocr_unavailable() {
        let err = ExtractionError::OcrUnavailable("tesseract not found".into());
        assert_eq!(err.to_string(), "OCR unavailable: tesseract not found");
    }

    #[test]
    fn display_timeout() {
        let err = ExtractionError::Timeout("tesseract exceeded 120s".into());
        assert_eq!(err.to_string(), "extraction timed out: tesseract exceeded 120s");
    }

    #[test]
    fn display_config() {
        let err = ExtractionError::Config("ocr_language must not be empty".into());
        assert_eq!(
            err.to_string(),
            "config error: ocr_language must not be empty"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExtractionError>();
    }
}
