//! Raster images: OCR of the whole file.

use std::path::Path;

use crate::error::ExtractionError;
use crate::ocr::TesseractOcr;

/// OCR an image file. Fails with [`ExtractionError::OcrUnavailable`] when
/// no tesseract binary was found.
pub async fn extract_image(
    path: &Path,
    ocr: Option<&TesseractOcr>,
) -> Result<String, ExtractionError> {
    let ocr = ocr.ok_or_else(|| {
        ExtractionError::OcrUnavailable(format!(
            "{} is an image and no tesseract binary was found",
            path.display()
        ))
    })?;
    ocr.recognize_file(path).await
}
