//! PDF documents: selectable text first, OCR for pages without any.
//!
//! Pdfium is synchronous and not thread-safe across documents, so all Pdfium
//! work for one document happens inside a single blocking task. Pages that
//! carry no selectable text are rendered to PNG there and OCR'd afterwards
//! on the async side.

use std::env;
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use pdfium_render::prelude::{PdfRenderConfig, Pdfium, PdfiumError};

use crate::error::ExtractionError;
use crate::ocr::TesseractOcr;

/// Environment variable naming the Pdfium library file or its directory.
pub const PDFIUM_LIBRARY_ENV: &str = "PDFIUM_LIBRARY_PATH";

/// Content of a single PDF page as read by Pdfium.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContent {
    /// The page had selectable text.
    Text(String),
    /// The page had no selectable text; PNG rendering for OCR.
    Scanned(Vec<u8>),
}

/// Extract the text of the PDF at `path`, OCR-ing pages that have no
/// selectable text.
///
/// Scanned pages are skipped with a warning when `ocr` is `None`; if that
/// leaves no text at all the document fails with
/// [`ExtractionError::OcrUnavailable`].
pub async fn extract_pdf(
    path: &Path,
    render_width: u32,
    ocr: Option<&TesseractOcr>,
) -> Result<String, ExtractionError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ExtractionError::Io(format!("{}: {e}", path.display())))?;

    let pages = tokio::task::spawn_blocking(move || read_pages(&bytes, render_width))
        .await
        .map_err(|e| ExtractionError::Pdf(format!("page reader task failed: {e}")))??;

    let mut buffer = String::new();
    let mut skipped = 0usize;

    for (page_index, page) in pages.into_iter().enumerate() {
        let page_text = match page {
            PageContent::Text(text) => text,
            PageContent::Scanned(png) => match ocr {
                Some(ocr) => {
                    tracing::trace!(path = %path.display(), page_index, "OCR on scanned page");
                    ocr.recognize_bytes(&png).await?
                }
                None => {
                    skipped += 1;
                    continue;
                }
            },
        };
        append_page(&mut buffer, &page_text);
    }

    if skipped > 0 {
        if buffer.trim().is_empty() {
            return Err(ExtractionError::OcrUnavailable(format!(
                "{} has {skipped} scanned page(s) and no tesseract binary",
                path.display()
            )));
        }
        tracing::warn!(path = %path.display(), skipped, "skipped scanned PDF pages without OCR");
    }

    Ok(buffer)
}

/// Read every page of a PDF held in memory.
///
/// # Errors
///
/// Returns [`ExtractionError::Pdf`] if Pdfium cannot be loaded, the
/// document cannot be parsed, or a page cannot be read or rendered.
pub fn read_pages(bytes: &[u8], render_width: u32) -> Result<Vec<PageContent>, ExtractionError> {
    let pdfium = load_pdfium()
        .map_err(|e| ExtractionError::Pdf(format!("failed to load Pdfium runtime: {e}")))?;
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| ExtractionError::Pdf(format!("failed to load PDF document: {e}")))?;

    let render_config = PdfRenderConfig::new().set_target_width(render_width as i32);
    let mut pages = Vec::new();

    for (page_index, page) in document.pages().iter().enumerate() {
        let text = page
            .text()
            .map_err(|e| {
                ExtractionError::Pdf(format!("failed to extract text for page {page_index}: {e}"))
            })?
            .all();

        if !text.trim().is_empty() {
            pages.push(PageContent::Text(text));
            continue;
        }

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            ExtractionError::Pdf(format!("failed to render page {page_index}: {e}"))
        })?;
        let width = bitmap.width() as u32;
        let height = bitmap.height() as u32;
        let rgba = bitmap.as_rgba_bytes();

        let mut encoded = Vec::new();
        PngEncoder::new(&mut encoded)
            .write_image(&rgba, width, height, ExtendedColorType::Rgba8)
            .map_err(|e| {
                ExtractionError::Pdf(format!("failed to encode page {page_index} as PNG: {e}"))
            })?;
        pages.push(PageContent::Scanned(encoded));
    }

    Ok(pages)
}

fn append_page(buffer: &mut String, page_text: &str) {
    if page_text.is_empty() {
        return;
    }
    if !buffer.is_empty() {
        buffer.push_str("\n\n");
    }
    buffer.push_str(page_text);
}

fn load_pdfium() -> Result<Pdfium, PdfiumError> {
    if let Some(value) = env::var_os(PDFIUM_LIBRARY_ENV) {
        let path = PathBuf::from(value);
        let lib_path = if path.is_dir() {
            Pdfium::pdfium_platform_library_name_at_path(&path)
        } else {
            path
        };
        return Pdfium::bind_to_library(lib_path).map(Pdfium::new);
    }

    match Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./")) {
        Ok(bindings) => Ok(Pdfium::new(bindings)),
        Err(primary_err) => match Pdfium::bind_to_system_library() {
            Ok(bindings) => Ok(Pdfium::new(bindings)),
            Err(_) => Err(primary_err),
        },
    }
}
