//! Extraction configuration with sensible defaults.
//!
//! [`ExtractConfig`] controls where tesseract is found, which OCR language
//! pack is used, and how scanned PDF pages are rasterised.

use std::path::PathBuf;

use crate::error::ExtractionError;

/// Configuration for the default document extractor.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Explicit path to the `tesseract` binary. If `None`, the binary is
    /// looked up on `PATH` and in well-known install locations.
    pub tesseract_path: Option<PathBuf>,
    /// Tesseract language pack(s), e.g. `"eng"` or `"eng+fra"`.
    pub ocr_language: String,
    /// Time limit for a single tesseract invocation, in seconds.
    pub ocr_timeout_seconds: u64,
    /// Target width in pixels when rendering a PDF page without selectable
    /// text for OCR.
    pub pdf_render_width: u32,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            tesseract_path: None,
            ocr_language: "eng".to_owned(),
            ocr_timeout_seconds: 120,
            pdf_render_width: 2000,
        }
    }
}

impl ExtractConfig {
    /// Validates this configuration.
    ///
    /// Checks:
    /// - `ocr_language` must not be blank
    /// - `ocr_timeout_seconds` must be greater than 0
    /// - `pdf_render_width` must be in `1..=10_000`
    pub fn validate(&self) -> Result<(), ExtractionError> {
        if self.ocr_language.trim().is_empty() {
            return Err(ExtractionError::Config(
                "ocr_language must not be empty".into(),
            ));
        }
        if self.ocr_timeout_seconds == 0 {
            return Err(ExtractionError::Config(
                "ocr_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.pdf_render_width == 0 || self.pdf_render_width > 10_000 {
            return Err(ExtractionError::Config(
                "pdf_render_width must be between 1 and 10000".into(),
            ));
        }
        Ok(())
    }
}
