//! Trait definition for pluggable text extractors.
//!
//! The ingestion pipeline only ever talks to an [`Extractor`]; the default
//! [`DocumentExtractor`](crate::extractors::DocumentExtractor) routes by
//! content kind, and tests substitute in-memory implementations.

use crate::error::ExtractionError;
use crate::types::Document;

/// A pluggable text extractor.
///
/// Implementations may block on disk I/O or spend long CPU bursts on OCR;
/// callers must not assume uniform cost. Extraction has no side effects on
/// the document, so calling it twice for the same document is safe.
///
/// All implementations must be `Send + Sync` so one extractor can be shared
/// by every concurrent extraction task.
pub trait Extractor: Send + Sync {
    /// Extract the textual content of `document`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError`] if the file cannot be read, the format is
    /// not supported, or OCR fails.
    fn extract(
        &self,
        document: &Document,
    ) -> impl std::future::Future<Output = Result<String, ExtractionError>> + Send;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentKind;
    use std::path::PathBuf;

    /// Echoes the document id back as its text.
    struct EchoExtractor;

    impl Extractor for EchoExtractor {
        async fn extract(&self, document: &Document) -> Result<String, ExtractionError> {
            if document.kind == ContentKind::Unsupported {
                return Err(ExtractionError::UnsupportedFormat(document.id.clone()));
            }
            Ok(document.id.clone())
        }

        fn name(&self) -> &'static str {
            "echo"
        }
    }

    fn doc(id: &str, kind: ContentKind) -> Document {
        Document {
            id: id.into(),
            kind,
            path: PathBuf::from(id),
        }
    }

    #[test]
    fn echo_extractor_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EchoExtractor>();
    }

    #[tokio::test]
    async fn extractor_returns_text() {
        let text = EchoExtractor
            .extract(&doc("a.txt", ContentKind::Text))
            .await
            .expect("should succeed");
        assert_eq!(text, "a.txt");
    }

    #[tokio::test]
    async fn extractor_propagates_errors() {
        let result = EchoExtractor
            .extract(&doc("a.docx", ContentKind::Unsupported))
            .await;
        assert!(result.unwrap_err().to_string().contains("a.docx"));
    }

    #[test]
    fn extractor_name() {
        assert_eq!(EchoExtractor.name(), "echo");
    }
}
