//! Concrete extractor implementations.
//!
//! Each content kind has its own module; [`DocumentExtractor`] routes a
//! [`Document`] to the right one.

pub mod image;
pub mod pdf;
pub mod text;

use crate::config::ExtractConfig;
use crate::error::ExtractionError;
use crate::extractor::Extractor;
use crate::ocr::TesseractOcr;
use crate::types::{ContentKind, Document};

/// Default extractor: plain text, PDF (selectable text + OCR fallback), and
/// image OCR.
///
/// Construction never fails because of a missing tesseract binary; OCR-only
/// documents then fail individually with
/// [`ExtractionError::OcrUnavailable`], which the pipeline records as empty
/// text.
#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    config: ExtractConfig,
    ocr: Option<TesseractOcr>,
}

impl DocumentExtractor {
    /// Build an extractor, probing for tesseract.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Config`] if `config` is invalid.
    pub fn new(config: ExtractConfig) -> Result<Self, ExtractionError> {
        config.validate()?;
        let ocr = match TesseractOcr::discover(&config) {
            Ok(ocr) => Some(ocr),
            Err(err) => {
                tracing::warn!(error = %err, "OCR disabled; image and scanned PDF pages will extract as empty");
                None
            }
        };
        Ok(Self { config, ocr })
    }

    /// Build an extractor that never runs OCR.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Config`] if `config` is invalid.
    pub fn without_ocr(config: ExtractConfig) -> Result<Self, ExtractionError> {
        config.validate()?;
        Ok(Self { config, ocr: None })
    }

    /// Whether a tesseract binary is available.
    pub fn ocr_available(&self) -> bool {
        self.ocr.is_some()
    }
}

impl Extractor for DocumentExtractor {
    async fn extract(&self, document: &Document) -> Result<String, ExtractionError> {
        tracing::trace!(id = %document.id, kind = %document.kind, "extracting");
        match document.kind {
            ContentKind::Text => text::read_text(&document.path).await,
            ContentKind::Pdf => {
                pdf::extract_pdf(
                    &document.path,
                    self.config.pdf_render_width,
                    self.ocr.as_ref(),
                )
                .await
            }
            ContentKind::Image => image::extract_image(&document.path, self.ocr.as_ref()).await,
            ContentKind::Unsupported => Ok(String::new()),
        }
    }

    fn name(&self) -> &'static str {
        "document"
    }
}
