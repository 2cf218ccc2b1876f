//! # docmatch-extract
//!
//! Text extraction for docmatch's ingestion pipeline.
//!
//! This crate is the pipeline's extraction collaborator: it enumerates a
//! directory of candidate documents and turns each one into plain text. It
//! compiles into docmatch as a library dependency.
//!
//! ## Design
//!
//! - Content kind is inferred from the file suffix (`.txt`, `.pdf`, `.jpg`,
//!   `.jpeg`, `.png`); anything else extracts to empty text
//! - PDFs use selectable text where a page has it, and OCR otherwise
//! - OCR shells out to the `tesseract` binary, with a per-call timeout
//! - A missing tesseract disables OCR instead of failing construction
//! - Every failure is per-document; callers decide how to recover

pub mod config;
pub mod error;
pub mod extractor;
pub mod extractors;
pub mod listing;
pub mod ocr;
pub mod types;

pub use config::ExtractConfig;
pub use error::{ExtractionError, Result};
pub use extractor::Extractor;
pub use extractors::DocumentExtractor;
pub use listing::list_documents;
pub use types::{ContentKind, Document};

/// Extract a single file with the default extractor.
///
/// Convenience wrapper that builds a [`DocumentExtractor`] for one call.
/// Prefer constructing the extractor once when processing many files.
///
/// # Errors
///
/// Returns [`ExtractionError::UnsupportedFormat`] if `path` has no file
/// name, or any error from [`DocumentExtractor::extract`](Extractor::extract).
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> docmatch_extract::Result<()> {
/// let text = docmatch_extract::extract_file(
///     std::path::Path::new("resumes/alice.pdf"),
///     &docmatch_extract::ExtractConfig::default(),
/// )
/// .await?;
/// println!("{} characters", text.len());
/// # Ok(())
/// # }
/// ```
pub async fn extract_file(path: &std::path::Path, config: &ExtractConfig) -> Result<String> {
    let document = Document::from_path(path)
        .ok_or_else(|| ExtractionError::UnsupportedFormat(path.display().to_string()))?;
    let extractor = DocumentExtractor::new(config.clone())?;
    extractor.extract(&document).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn extract_file_reads_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("note.txt");
        std::fs::write(&path, "hello world").expect("write");
        let text = extract_file(&path, &ExtractConfig::default())
            .await
            .expect("extract");
        assert_eq!(text, "hello world");
    }

    #[tokio::test]
    async fn extract_file_validates_config() {
        let config = ExtractConfig {
            ocr_language: String::new(),
            ..Default::default()
        };
        let result = extract_file(std::path::Path::new("note.txt"), &config).await;
        assert!(result.unwrap_err().to_string().contains("ocr_language"));
    }
}
